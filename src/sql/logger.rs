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
use std::time::Duration;

use colored::Colorize;
use log::Level;
use serde_json::Value;

use crate::sql::QueryReport;
use crate::sql::highlight_with;
use crate::sql::report::FOOTER;
use crate::sql::report::PARAMS_HEADER;
use crate::sql::report::indent;
use crate::sql::report::render_parameters_with;
use crate::sql::token::SqlPalette;

/// The log target all query records are emitted under.
pub const SQL_TARGET: &str = "blanclog::sql";

/// A query logger in the shape ORM logging hooks expect: one method per
/// event, each rendering a boxed report and emitting it through the [`log`]
/// facade under [`SQL_TARGET`].
#[derive(Debug)]
pub struct QueryLogger {
    slow_threshold: Duration,
    palette: SqlPalette,
}

impl Default for QueryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryLogger {
    pub fn new() -> Self {
        Self {
            slow_threshold: Duration::from_millis(100),
            palette: SqlPalette::default(),
        }
    }

    /// Set the duration above which [`QueryLogger::log_query_timed`] reports
    /// a query as slow.
    pub fn slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Replace the palette used for styling.
    pub fn palette(mut self, palette: SqlPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Log an executed query at info level.
    pub fn log_query(&self, query: &str, parameters: &[Value]) {
        let report = self.report(query, parameters);
        log::info!(target: SQL_TARGET, "[SQL Execute]\n{report}");
    }

    /// Log a failed query at error level, with the error message leading the
    /// block.
    pub fn log_query_error(&self, error: impl fmt::Display, query: &str, parameters: &[Value]) {
        let palette = &self.palette;
        let error = error.to_string();
        let error = if self.is_plain() {
            error
        } else {
            error.bright_red().bold().to_string()
        };
        let message = [
            palette.dim("╔═ SQL Error ════════════════════════════════"),
            format!("Error: {error}"),
            self.report(query, parameters),
            palette.dim(FOOTER),
        ]
        .join("\n");
        log::error!(target: SQL_TARGET, "{message}");
    }

    /// Log a query that exceeded the slow threshold at warn level.
    pub fn log_query_slow(&self, elapsed: Duration, query: &str, parameters: &[Value]) {
        let palette = &self.palette;
        let elapsed_ms = elapsed.as_millis();
        let elapsed = format!("{elapsed_ms}ms");
        let elapsed = if self.is_plain() {
            elapsed
        } else {
            elapsed.magenta().to_string()
        };

        let mut lines = vec![
            palette.dim(&format!(
                "╔═ Slow Query Warning (threshold {}ms) ═══════",
                self.slow_threshold.as_millis()
            )),
            format!("Execution Time: {elapsed}"),
            palette.dim("╠═ SQL Query ═════════════════════════════════"),
            indent(&highlight_with(query, palette), 4),
        ];
        let params = render_parameters_with(parameters, palette);
        if !params.is_empty() {
            lines.push(palette.dim(PARAMS_HEADER));
            lines.push(indent(&params, 4));
        }
        lines.push(palette.dim(FOOTER));

        let message = lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        log::warn!(target: SQL_TARGET, "{message}");
    }

    /// Log a query and pick the level from its execution time: queries above
    /// the slow threshold go through [`QueryLogger::log_query_slow`].
    pub fn log_query_timed(&self, elapsed: Duration, query: &str, parameters: &[Value]) {
        if elapsed > self.slow_threshold {
            self.log_query_slow(elapsed, query, parameters);
        } else {
            self.log_query(query, parameters);
        }
    }

    /// Log a schema build message at info level.
    pub fn log_schema_build(&self, message: &str) {
        self.boxed_notice("╔═ Schema Build ═════════════════════════════", message);
    }

    /// Log a migration message at info level.
    pub fn log_migration(&self, message: &str) {
        self.boxed_notice("╔═ Database Migration ═════════════════════", message);
    }

    /// Log a free-form ORM message in a boxed block at the given level.
    pub fn log(&self, level: Level, message: &str) {
        let palette = &self.palette;
        let header = palette.dim(&format!(
            "╔═ ORM {} ═════════════════════",
            level.as_str().to_uppercase()
        ));
        let body = if self.is_plain() {
            message.to_string()
        } else if level == Level::Warn {
            message.yellow().to_string()
        } else {
            message.white().to_string()
        };
        let footer = palette.dim(FOOTER);
        log::log!(target: SQL_TARGET, level, "{header}\n{body}\n{footer}");
    }

    fn report(&self, query: &str, parameters: &[Value]) -> String {
        QueryReport::new(query)
            .parameters(parameters)
            .palette(self.palette.clone())
            .render()
    }

    fn boxed_notice(&self, header: &str, message: &str) {
        let palette = &self.palette;
        let body = if self.is_plain() {
            message.to_string()
        } else {
            message.green().to_string()
        };
        let message = [palette.dim(header), body, palette.dim(FOOTER)].join("\n");
        log::info!(target: SQL_TARGET, "{message}");
    }

    fn is_plain(&self) -> bool {
        self.palette.is_plain()
    }
}
