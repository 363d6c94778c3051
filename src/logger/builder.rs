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

use log::LevelFilter;

use super::log_impl::Dispatch;
use super::log_impl::Logger;
use crate::append;
use crate::append::Append;
use crate::diagnostic::Diagnostic;
use crate::filter::Filter;

/// Create a new empty [builder][Builder].
///
/// The builder must be configured before initializing the global logger. At least one append
/// should be added:
///
/// ```rust
/// use blanclog::append;
/// use log::LevelFilter;
///
/// blanclog::builder()
///     .filter(LevelFilter::Info)
///     .append(append::Stdout::default())
///     .apply();
/// ```
///
/// Multiple dispatches can be added:
///
/// ```rust
/// use blanclog::append;
/// use log::LevelFilter;
///
/// blanclog::builder()
///     .filter(LevelFilter::Info)
///     .append(append::Stdout::default())
///     .dispatch() // finish the current dispatch and start a new staging dispatch
///     .filter(LevelFilter::Debug)
///     .append(append::Stderr::default())
///     .apply();
/// ```
pub fn builder() -> Builder<false> {
    Builder::new()
}

/// Create a new [`Builder`] with a default `Stdout` append configured.
///
/// ```rust
/// blanclog::stdout().apply();
/// ```
pub fn stdout() -> Builder<true> {
    builder().append(append::Stdout::default())
}

/// Create a new [`Builder`] with a default `Stderr` append configured.
///
/// ```rust
/// blanclog::stderr().apply();
/// ```
pub fn stderr() -> Builder<true> {
    builder().append(append::Stderr::default())
}

/// A builder for configuring the global logger. See also [`builder`] for a fluent API.
///
/// * `READY=false`: The staging state. You can configure [`Filter`]s, [`Diagnostic`]s, and
///   [`Append`]s for the current staging dispatch. Once at least one append is configured, the
///   builder transits to `READY=true`.
/// * `READY=true`: The builder can be [applied][Builder::apply] to set up the global logger. Or,
///   you can start a new staging dispatch by calling [dispatch][Builder::dispatch].
#[must_use = "call `apply` to set the global logger"]
#[derive(Debug)]
pub struct Builder<const READY: bool = true> {
    // for the current staging dispatch
    filters: Vec<Filter>,
    diagnostics: Vec<Box<dyn Diagnostic>>,
    appends: Vec<Box<dyn Append>>,

    // stashed dispatches
    dispatches: Vec<Dispatch>,

    // default to trace - the global default is OFF
    max_level: LevelFilter,
}

impl Default for Builder<false> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const READY: bool> Builder<READY> {
    /// Add an [`Append`] to the staging dispatch.
    pub fn append(mut self, append: impl Append) -> Builder<true> {
        self.appends.push(Box::new(append));

        Builder {
            filters: self.filters,
            diagnostics: self.diagnostics,
            appends: self.appends,
            dispatches: self.dispatches,
            max_level: self.max_level,
        }
    }

    /// Set the global maximum log level.
    ///
    /// This will be passed to [`log::set_max_level`] on [`Builder::apply`].
    pub fn max_level(mut self, max_level: LevelFilter) -> Self {
        self.max_level = max_level;
        self
    }
}

impl Builder<false> {
    /// Create a new empty [`Builder`].
    pub fn new() -> Self {
        Self {
            filters: vec![],
            diagnostics: vec![],
            appends: vec![],
            dispatches: vec![],
            max_level: LevelFilter::Trace,
        }
    }

    /// Add a [`Filter`] to the staging dispatch.
    pub fn filter(mut self, filter: impl Into<Filter>) -> Builder<false> {
        self.filters.push(filter.into());
        self
    }

    /// Add a [`Diagnostic`] to the staging dispatch.
    pub fn diagnostic(mut self, diagnostic: impl Into<Box<dyn Diagnostic>>) -> Builder<false> {
        self.diagnostics.push(diagnostic.into());
        self
    }
}

impl Builder<true> {
    /// Construct a new `Dispatch` with the configured [`Filter`]s, [`Diagnostic`]s, and
    /// [`Append`]s, and start a new staging dispatch.
    pub fn dispatch(mut self) -> Builder<false> {
        let dispatch = Dispatch::new(self.filters, self.diagnostics, self.appends);
        self.dispatches.push(dispatch);

        Builder {
            filters: vec![],
            diagnostics: vec![],
            appends: vec![],
            dispatches: self.dispatches,
            max_level: self.max_level,
        }
    }

    /// Set up the global logger with all the dispatches configured.
    ///
    /// This should be called early in the execution of a Rust program. Any log events that occur
    /// before initialization will be ignored.
    ///
    /// # Errors
    ///
    /// This function will fail if it is called more than once, or if another library has already
    /// initialized a global logger.
    pub fn try_apply(mut self) -> Result<(), log::SetLoggerError> {
        // finish the current staging dispatch
        let dispatch = Dispatch::new(self.filters, self.diagnostics, self.appends);
        self.dispatches.push(dispatch);

        let logger = Logger::new(self.dispatches);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(self.max_level);
        Ok(())
    }

    /// Set up the global logger with all the dispatches configured.
    ///
    /// This should be called early in the execution of a Rust program. Any log events that occur
    /// before initialization will be ignored.
    ///
    /// # Panics
    ///
    /// This function will panic if it is called more than once, or if another library has already
    /// initialized a global logger.
    pub fn apply(self) {
        self.try_apply()
            .expect("Builder::apply should not be called after the global logger initialized");
    }
}
