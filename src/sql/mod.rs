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

//! SQL query pretty-printing and heuristic linting.
//!
//! Everything here is a pure, total text transformer: tokenize a raw query,
//! classify each token, colorize the result, and pattern-match the query
//! against a few fixed anti-pattern rules. Stripping the styling from any
//! output always yields the input text unchanged.
//!
//! ```
//! use blanclog::sql;
//!
//! let styled = sql::highlight("SELECT id FROM users LIMIT 10");
//! let warnings = sql::analyze("SELECT * FROM users");
//! assert_eq!(warnings[0].rule.id(), "select-star");
//! ```

pub use self::lint::Rule;
pub use self::lint::Severity;
pub use self::lint::Warning;
pub use self::lint::analyze;
pub use self::logger::QueryLogger;
pub use self::logger::SQL_TARGET;
pub use self::report::QueryReport;
pub use self::report::indent;
pub use self::report::render_parameters;
pub use self::report::render_parameters_with;
pub use self::token::SqlPalette;
pub use self::token::Token;
pub use self::token::TokenClass;
pub use self::token::highlight;
pub use self::token::highlight_with;
pub use self::token::tokenize;

mod lint;
mod logger;
mod report;
mod token;
