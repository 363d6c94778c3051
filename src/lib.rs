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

//! BlancLog is a decorative logging layer for Rust applications: colorful
//! console output with correlation ids, JSON file logs with rolling, and a
//! SQL query reporter with syntax highlighting and anti-pattern linting.
//!
//! # Overview
//!
//! BlancLog lets you set up multiple log dispatches with different filters
//! and appenders on top of the `log` crate. The `sql` module adds a query
//! logger that pretty-prints SQL with heuristic analysis attached.
//!
//! # Examples
//!
//! Simple setup with the default stdout appender:
//!
//! ```
//! blanclog::stdout().apply();
//!
//! log::info!("This is an info message.");
//! ```
//!
//! The full console-plus-files topology in one call:
//!
//! ```no_run
//! use blanclog::LoggingConfig;
//!
//! let _guards = LoggingConfig::default().apply().unwrap();
//!
//! log::info!("Application started.");
//! ```
//!
//! Highlighted and linted SQL reports:
//!
//! ```
//! use blanclog::sql::QueryLogger;
//!
//! blanclog::stdout().apply();
//!
//! let queries = QueryLogger::default();
//! let params = vec![serde_json::json!("%smith")];
//! queries.log_query("SELECT * FROM users WHERE name LIKE '%smith'", &params);
//! ```

pub mod append;
pub mod config;
pub mod correlation;
pub mod diagnostic;
pub mod filter;
pub mod layout;
pub mod non_blocking;
pub mod sql;

pub use append::Append;
pub use config::LoggingConfig;
pub use diagnostic::Diagnostic;
pub use filter::Filter;
pub use layout::Layout;

mod error;
pub use error::Error;

mod logger;
pub use logger::*;
