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

use colored::Color;
use colored::Colorize;

use crate::sql::lint::Severity;

/// Keywords recognized by the highlighter.
///
/// Multi-word entries (`INNER JOIN`, `ORDER BY`, ...) can never match a single
/// token because tokenization is boundary-based; their single-word halves
/// (`JOIN`, `ORDER` is absent, `BY` is absent) match on their own where listed.
const KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "INSERT",
    "INTO",
    "UPDATE",
    "DELETE",
    "CREATE",
    "TABLE",
    "INDEX",
    "DROP",
    "ORDER BY",
    "GROUP BY",
    "LIMIT",
    "OFFSET",
    "HAVING",
    "VALUES",
    "SET",
    "EXPLAIN",
    "AND",
    "OR",
    "AS",
    "IN",
];

/// The lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// A keyword from the fixed keyword set.
    Keyword,
    /// An integer or decimal numeral.
    Number,
    /// A single- or double-quoted string.
    Str,
    /// A C-style identifier.
    Ident,
    /// Whitespace, punctuation, and operator runs.
    Other,
}

/// A maximal substring produced by boundary-based splitting, tagged with its
/// lexical class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub class: TokenClass,
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_number(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => is_all_digits(int) && is_all_digits(frac),
        None => is_all_digits(s),
    }
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\''))
            || (s.starts_with('"') && s.ends_with('"')))
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_word)
}

fn classify(text: &str) -> TokenClass {
    if KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(text)) {
        TokenClass::Keyword
    } else if is_number(text) {
        TokenClass::Number
    } else if is_quoted(text) {
        TokenClass::Str
    } else if is_ident(text) {
        TokenClass::Ident
    } else {
        TokenClass::Other
    }
}

/// Split a query into classified tokens.
///
/// Splitting happens at word boundaries: maximal runs of word characters
/// (`[A-Za-z0-9_]`) and maximal runs of everything else each form one token,
/// so no token mixes the two and concatenating all tokens reproduces the
/// input exactly.
///
/// One refinement over plain boundary splitting: a digit run, a `.`, and
/// another digit run merge into a single token, so decimal numerals such as
/// `10.5` classify as numbers instead of decaying into three tokens.
pub fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (i, c) in sql.char_indices() {
        if let Some(p) = prev {
            if is_word(p) != is_word(c) {
                ranges.push((start, i));
                start = i;
            }
        }
        prev = Some(c);
    }
    if prev.is_some() {
        ranges.push((start, sql.len()));
    }

    // Merge `digits . digits` triples into a single numeric range.
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    let mut i = 0;
    while i < ranges.len() {
        let (lo, hi) = ranges[i];
        if i + 2 < ranges.len()
            && is_all_digits(&sql[lo..hi])
            && &sql[ranges[i + 1].0..ranges[i + 1].1] == "."
            && is_all_digits(&sql[ranges[i + 2].0..ranges[i + 2].1])
        {
            merged.push((lo, ranges[i + 2].1));
            i += 3;
        } else {
            merged.push((lo, hi));
            i += 1;
        }
    }

    merged
        .into_iter()
        .map(|(lo, hi)| {
            let text = &sql[lo..hi];
            Token {
                text,
                class: classify(text),
            }
        })
        .collect()
}

/// Styles applied to classified tokens and lint messages.
///
/// The tokenizer and linter never touch styling themselves; a palette is a
/// pure post-processing pass from (text, class) to styled text. Use
/// [`SqlPalette::plain`] to render without any styling.
#[derive(Debug, Clone)]
pub struct SqlPalette {
    pub keyword: Color,
    pub number: Color,
    pub string: Color,
    pub ident: Color,
    pub params: Color,
    no_color: bool,
}

impl Default for SqlPalette {
    fn default() -> Self {
        Self {
            keyword: Color::BrightBlue,
            number: Color::Yellow,
            string: Color::Green,
            // steel blue
            ident: Color::TrueColor {
                r: 0x46,
                g: 0x82,
                b: 0xB4,
            },
            // sea green
            params: Color::TrueColor {
                r: 0x2E,
                g: 0x8B,
                b: 0x57,
            },
            no_color: false,
        }
    }
}

impl SqlPalette {
    /// A palette that renders everything as plain text.
    pub fn plain() -> Self {
        Self {
            no_color: true,
            ..Self::default()
        }
    }

    /// Whether this palette renders plain text only.
    pub fn is_plain(&self) -> bool {
        self.no_color
    }

    /// Style a token according to its class.
    pub fn paint(&self, class: TokenClass, text: &str) -> String {
        if self.no_color {
            return text.to_string();
        }
        match class {
            TokenClass::Keyword => text.color(self.keyword).bold().to_string(),
            TokenClass::Number => text.color(self.number).to_string(),
            TokenClass::Str => text.color(self.string).to_string(),
            TokenClass::Ident => text.color(self.ident).to_string(),
            TokenClass::Other => text.to_string(),
        }
    }

    /// Style a rendered parameter list.
    pub fn paint_params(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.color(self.params).to_string()
        }
    }

    /// Style a lint message according to its severity.
    pub fn paint_warning(&self, severity: Severity, text: &str) -> String {
        if self.no_color {
            return text.to_string();
        }
        let color = match severity {
            Severity::Advisory => Color::BrightYellow,
            Severity::Warning => Color::BrightRed,
            Severity::Critical => Color::BrightMagenta,
        };
        text.color(color).to_string()
    }

    pub(crate) fn dim(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    }
}

/// Highlight a query with the default palette.
///
/// Total over all inputs; stripping the styling from the output yields the
/// input byte-for-byte.
pub fn highlight(sql: &str) -> String {
    highlight_with(sql, &SqlPalette::default())
}

/// Highlight a query with the given palette.
pub fn highlight_with(sql: &str, palette: &SqlPalette) -> String {
    let mut out = String::with_capacity(sql.len());
    for token in tokenize(sql) {
        out.push_str(&palette.paint(token.class, token.text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(sql: &str) -> Vec<(String, TokenClass)> {
        tokenize(sql)
            .into_iter()
            .map(|t| (t.text.to_string(), t.class))
            .collect()
    }

    #[test]
    fn test_tokenize_roundtrip() {
        let queries = [
            "",
            "SELECT id FROM users",
            "SELECT * FROM t WHERE name LIKE '%smith'",
            "  weird   spacing\t\tand\nnewlines  ",
            "INSERT INTO t (a, b) VALUES (1, 'x')",
            "LIMIT 10.5 OFFSET 3",
            "渋谷 SELECT * FROM ユーザー",
        ];
        for query in queries {
            let joined: String = tokenize(query).iter().map(|t| t.text).collect();
            assert_eq!(joined, query);
        }
    }

    #[test]
    fn test_keyword_and_ident_classification() {
        let tokens = classes("SELECT id FROM users");
        assert_eq!(tokens[0], ("SELECT".to_string(), TokenClass::Keyword));
        assert_eq!(tokens[2], ("id".to_string(), TokenClass::Ident));
        assert_eq!(tokens[4], ("FROM".to_string(), TokenClass::Keyword));
        assert_eq!(tokens[6], ("users".to_string(), TokenClass::Ident));
    }

    #[test]
    fn test_keywords_match_case_insensitively() {
        let tokens = classes("select id from users");
        assert_eq!(tokens[0].1, TokenClass::Keyword);
        assert_eq!(tokens[4].1, TokenClass::Keyword);
    }

    #[test]
    fn test_numeric_classification() {
        let tokens = classes("LIMIT 10");
        assert_eq!(tokens[2], ("10".to_string(), TokenClass::Number));

        let tokens = classes("LIMIT 10.5");
        assert_eq!(tokens[2], ("10.5".to_string(), TokenClass::Number));

        // `10a` is one word token but neither a numeral nor an identifier.
        let tokens = classes("LIMIT 10a");
        assert_eq!(tokens[2], ("10a".to_string(), TokenClass::Other));
    }

    #[test]
    fn test_decimal_merge_requires_digits_on_both_sides() {
        let tokens = classes("a.5");
        assert_eq!(tokens[0].0, "a");
        assert_eq!(tokens[1].0, ".");
        assert_eq!(tokens[2].0, "5");

        let tokens = classes("10.");
        assert_eq!(tokens[0], ("10".to_string(), TokenClass::Number));
        assert_eq!(tokens[1].0, ".");
    }

    #[test]
    fn test_multi_word_keywords_never_match() {
        // Boundary-based splitting can never yield `INNER JOIN` as one token,
        // so only the `JOIN` half highlights as a keyword. Documented latent
        // behavior carried over from the original formatter.
        let tokens = classes("SELECT a FROM t INNER JOIN u");
        let inner = tokens.iter().find(|(text, _)| text == "INNER").unwrap();
        assert_eq!(inner.1, TokenClass::Ident);
        let join = tokens.iter().find(|(text, _)| text == "JOIN").unwrap();
        assert_eq!(join.1, TokenClass::Keyword);

        let tokens = classes("ORDER BY name");
        assert_eq!(tokens[0].1, TokenClass::Ident);
        assert_eq!(tokens[2].1, TokenClass::Ident);
    }

    #[test]
    fn test_quoted_symbol_runs_classify_as_strings() {
        // A quoted run of word characters splits at the quotes, so it never
        // classifies as a string; an all-symbol quoted run stays intact.
        let tokens = classes("'%'");
        assert_eq!(tokens[0], ("'%'".to_string(), TokenClass::Str));

        let tokens = classes("'abc'");
        assert_eq!(tokens[0].0, "'");
        assert_eq!(tokens[1], ("abc".to_string(), TokenClass::Ident));
    }

    #[test]
    fn test_plain_palette_highlight_is_identity() {
        let palette = SqlPalette::plain();
        let queries = ["", "SELECT * FROM t", "WHERE x = 'y' AND n > 10.5"];
        for query in queries {
            assert_eq!(highlight_with(query, &palette), query);
        }
    }

    #[test]
    fn test_highlight_empty_is_empty() {
        assert_eq!(highlight(""), "");
    }

    #[test]
    fn test_strip_styling_yields_input() {
        colored::control::set_override(true);
        let query = "SELECT id, name FROM users WHERE age > 21 LIMIT 10";
        let styled = highlight(query);
        colored::control::unset_override();

        assert_eq!(strip_ansi(&styled), query);
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for esc in chars.by_ref() {
                    if esc == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
