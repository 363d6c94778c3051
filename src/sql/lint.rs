// Copyright 2024 BlancLog Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// How serious a lint finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Advisory,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Advisory => f.write_str("advisory"),
            Severity::Warning => f.write_str("warning"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// A heuristic anti-pattern check.
///
/// Rules are purely advisory substring checks against a whitespace-normalized
/// lowercase copy of the query, not a correctness guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    SelectStar,
    JoinWithoutOn,
    LeadingWildcardLike,
}

impl Rule {
    /// The stable identifier of this rule.
    pub fn id(&self) -> &'static str {
        match self {
            Rule::SelectStar => "select-star",
            Rule::JoinWithoutOn => "join-without-on",
            Rule::LeadingWildcardLike => "leading-wildcard-like",
        }
    }

    /// The severity this rule reports at.
    pub fn severity(&self) -> Severity {
        match self {
            Rule::SelectStar => Severity::Advisory,
            Rule::JoinWithoutOn => Severity::Warning,
            Rule::LeadingWildcardLike => Severity::Critical,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Rule::SelectStar => "⚠️ Avoid SELECT * - specify columns explicitly",
            Rule::JoinWithoutOn => "❗ JOIN without ON clause detected",
            Rule::LeadingWildcardLike => "🚨 Leading % in LIKE can cause full table scan",
        }
    }

    fn fires(&self, simplified: &str) -> bool {
        match self {
            Rule::SelectStar => simplified.contains("select *"),
            Rule::JoinWithoutOn => {
                simplified.contains("join") && !simplified.contains(" on ")
            }
            Rule::LeadingWildcardLike => simplified.contains("like '%"),
        }
    }
}

/// One detected anti-pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Warning {
    pub rule: Rule,
    pub severity: Severity,
    pub message: &'static str,
}

/// Check a query against all lint rules.
///
/// Rules are checked in declaration order, every rule is independent, and all
/// of them may fire for a single query. Never fails and never modifies the
/// query; an empty query yields no warnings.
pub fn analyze(query: &str) -> Vec<Warning> {
    let simplified = normalize(query);

    const RULES: [Rule; 3] = [
        Rule::SelectStar,
        Rule::JoinWithoutOn,
        Rule::LeadingWildcardLike,
    ];

    RULES
        .iter()
        .filter(|rule| rule.fires(&simplified))
        .map(|&rule| Warning {
            rule,
            severity: rule.severity(),
            message: rule.message(),
        })
        .collect()
}

/// Lowercase the query and collapse every whitespace run to a single space.
fn normalize(query: &str) -> String {
    let lowered = query.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_star() {
        let warnings = analyze("SELECT * FROM t");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule.id(), "select-star");
        assert_eq!(warnings[0].severity, Severity::Advisory);
    }

    #[test]
    fn test_join_without_on() {
        let warnings = analyze("SELECT a FROM t JOIN u");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule.id(), "join-without-on");
        assert_eq!(warnings[0].severity, Severity::Warning);

        assert!(analyze("SELECT a FROM t JOIN u ON t.id = u.id").is_empty());
    }

    #[test]
    fn test_leading_wildcard_like() {
        let warnings = analyze("WHERE name LIKE '%smith'");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule.id(), "leading-wildcard-like");
        assert_eq!(warnings[0].severity, Severity::Critical);

        assert!(analyze("WHERE name LIKE 'smith%'").is_empty());
    }

    #[test]
    fn test_all_rules_fire_in_declaration_order() {
        let warnings = analyze("SELECT * FROM t JOIN u WHERE name LIKE '%x'");
        let ids: Vec<_> = warnings.iter().map(|w| w.rule.id()).collect();
        assert_eq!(
            ids,
            vec!["select-star", "join-without-on", "leading-wildcard-like"]
        );
    }

    #[test]
    fn test_whitespace_normalization() {
        // Newlines and runs of spaces collapse, so patterns spanning them
        // still match.
        let warnings = analyze("SELECT a FROM t JOIN u\n   ON t.id = u.id");
        assert!(warnings.is_empty());

        let warnings = analyze("select\t*\nfrom t");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, Rule::SelectStar);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(analyze("Select * From T").len(), 1);
        assert_eq!(analyze("where NAME like '%X'").len(), 1);
    }

    #[test]
    fn test_empty_query_yields_no_warnings() {
        assert!(analyze("").is_empty());
    }
}
