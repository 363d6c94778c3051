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

use serde_json::Value;

use crate::sql::highlight_with;
use crate::sql::lint::analyze;
use crate::sql::token::SqlPalette;

pub(crate) const QUERY_HEADER: &str = "╔═ SQL Query ═════════════════════════════════";
pub(crate) const PARAMS_HEADER: &str = "╠═ Parameters ═══════════════════════════════";
pub(crate) const ANALYSIS_HEADER: &str = "╠═ Analysis ═════════════════════════════════";
pub(crate) const FOOTER: &str = "╚═════════════════════════════════════════════";

/// Indent every line of `text` (empty lines included) by `width` spaces.
///
/// Total and side-effect-free; the number of lines never changes.
pub fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render bind parameters as a single JSON array, styled with the default
/// palette. An empty slice renders as the empty string.
pub fn render_parameters(params: &[Value]) -> String {
    render_parameters_with(params, &SqlPalette::default())
}

/// Render bind parameters with the given palette.
pub fn render_parameters_with(params: &[Value], palette: &SqlPalette) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered = match serde_json::to_string(params) {
        Ok(json) => json,
        Err(_) => format!("{params:?}"),
    };
    palette.paint_params(&rendered)
}

/// A boxed, styled rendering of one query: the highlighted query text, its
/// bind parameters (when present), and any lint findings (when present).
///
/// Sections appear in fixed order and absent sections contribute no lines.
#[derive(Debug)]
pub struct QueryReport<'a> {
    query: &'a str,
    parameters: &'a [Value],
    palette: SqlPalette,
}

impl<'a> QueryReport<'a> {
    /// Create a report for the given query with no parameters.
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            parameters: &[],
            palette: SqlPalette::default(),
        }
    }

    /// Attach bind parameters to the report.
    pub fn parameters(mut self, parameters: &'a [Value]) -> Self {
        self.parameters = parameters;
        self
    }

    /// Replace the palette used for styling.
    pub fn palette(mut self, palette: SqlPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Render the report as a multi-line block.
    pub fn render(&self) -> String {
        let palette = &self.palette;
        let mut lines: Vec<String> = Vec::new();

        lines.push(palette.dim(QUERY_HEADER));
        lines.push(indent(&highlight_with(self.query, palette), 4));

        let params = render_parameters_with(self.parameters, palette);
        if !params.is_empty() {
            lines.push(palette.dim(PARAMS_HEADER));
            lines.push(indent(&params, 4));
        }

        let warnings = analyze(self.query);
        if !warnings.is_empty() {
            lines.push(palette.dim(ANALYSIS_HEADER));
            let analysis = warnings
                .iter()
                .map(|w| palette.paint_warning(w.severity, w.message))
                .collect::<Vec<_>>()
                .join("\n");
            lines.push(indent(&analysis, 4));
        }

        lines.push(palette.dim(FOOTER));

        lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_indent_prefixes_every_line() {
        let text = "a\n\nb";
        let indented = indent(text, 4);
        let lines: Vec<_> = indented.split('\n').collect();
        assert_eq!(lines, vec!["    a", "    ", "    b"]);
    }

    #[test]
    fn test_indent_preserves_line_count() {
        for text in ["", "one", "a\nb\nc", "\n\n"] {
            for width in [0, 1, 4, 8] {
                let indented = indent(text, width);
                assert_eq!(
                    indented.split('\n').count(),
                    text.split('\n').count(),
                    "text={text:?} width={width}"
                );
                for (out, original) in indented.split('\n').zip(text.split('\n')) {
                    assert_eq!(out, format!("{}{}", " ".repeat(width), original));
                }
            }
        }
    }

    #[test]
    fn test_render_parameters_empty() {
        assert_eq!(render_parameters(&[]), "");
    }

    #[test]
    fn test_render_parameters_json_array() {
        let params = vec![json!(1), json!("smith"), json!(null)];
        let rendered = render_parameters_with(&params, &SqlPalette::plain());
        assert_eq!(rendered, r#"[1,"smith",null]"#);
    }

    #[test]
    fn test_report_sections_present_and_ordered() {
        let params = vec![json!(42)];
        let report = QueryReport::new("SELECT * FROM t")
            .parameters(&params)
            .palette(SqlPalette::plain())
            .render();

        let query_pos = report.find("SQL Query").unwrap();
        let params_pos = report.find("Parameters").unwrap();
        let analysis_pos = report.find("Analysis").unwrap();
        assert!(query_pos < params_pos);
        assert!(params_pos < analysis_pos);
        assert!(report.contains("    SELECT * FROM t"));
        assert!(report.contains("    [42]"));
        assert!(report.contains("Avoid SELECT *"));
    }

    #[test]
    fn test_report_omits_absent_sections() {
        let report = QueryReport::new("SELECT id FROM t")
            .palette(SqlPalette::plain())
            .render();

        assert!(!report.contains("Parameters"));
        assert!(!report.contains("Analysis"));
        // No blank lines anywhere in the block.
        assert!(report.split('\n').all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_report_on_empty_query_is_minimal() {
        let report = QueryReport::new("").palette(SqlPalette::plain()).render();
        let lines: Vec<_> = report.split('\n').collect();
        assert_eq!(lines, vec![QUERY_HEADER, FOOTER]);
    }
}
