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

//! One-call assembly of the full console-plus-files logging topology.

use std::path::PathBuf;

use log::LevelFilter;

use crate::Error;
use crate::append::Stdout;
use crate::append::rolling_file;
use crate::append::rolling_file::RollingFile;
use crate::append::rolling_file::RollingFileWriter;
use crate::append::rolling_file::Rotation;
use crate::logger::builder;
use crate::non_blocking::WorkerGuard;

/// An immutable description of the logging topology.
///
/// `apply` installs three dispatches: a console appender at `console_level`,
/// a daily `combined` rolling file at `file_level`, and a daily `error`
/// rolling file capturing errors only. Build a modified config with the
/// `with_*` methods; each returns a new value.
///
/// ```no_run
/// use blanclog::LoggingConfig;
///
/// let _guards = LoggingConfig::default()
///     .with_console_level(log::LevelFilter::Debug)
///     .apply()
///     .unwrap();
///
/// log::info!("logging set up");
/// ```
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    log_dir: PathBuf,
    console_level: LevelFilter,
    file_level: LevelFilter,
    max_log_files: usize,
    max_file_size: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            console_level: LevelFilter::Info,
            file_level: LevelFilter::Error,
            max_log_files: 30,
            max_file_size: 20 * 1024 * 1024,
        }
    }
}

impl LoggingConfig {
    /// Returns a config writing file logs under the given directory.
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Returns a config with the console verbosity set.
    pub fn with_console_level(mut self, level: LevelFilter) -> Self {
        self.console_level = level;
        self
    }

    /// Returns a config with the combined file verbosity set.
    pub fn with_file_level(mut self, level: LevelFilter) -> Self {
        self.file_level = level;
        self
    }

    /// Returns a config keeping at most `n` rolled files per appender.
    pub fn with_max_log_files(mut self, n: usize) -> Self {
        self.max_log_files = n;
        self
    }

    /// Returns a config rolling files over once they reach `n` bytes.
    pub fn with_max_file_size(mut self, n: usize) -> Self {
        self.max_file_size = n;
        self
    }

    fn rolling_writer(&self, prefix: &str) -> Result<RollingFileWriter, Error> {
        RollingFileWriter::builder()
            .rotation(Rotation::Daily)
            .filename_prefix(prefix)
            .filename_suffix("log")
            .max_log_files(self.max_log_files)
            .max_file_size(self.max_file_size)
            .build(&self.log_dir)
    }

    /// Sets up the global logger with the described topology.
    ///
    /// Returns the [`WorkerGuard`]s of the file appenders. Hold them for the
    /// lifetime of the program so buffered file logs are flushed on exit.
    pub fn apply(self) -> Result<Vec<WorkerGuard>, Error> {
        let (combined, combined_guard) =
            rolling_file::non_blocking_builder(self.rolling_writer("combined")?).build();
        let (errors, errors_guard) =
            rolling_file::non_blocking_builder(self.rolling_writer("error")?).build();

        builder()
            .filter(self.console_level)
            .append(Stdout::default())
            .dispatch()
            .filter(self.file_level)
            .append(RollingFile::new(combined))
            .dispatch()
            .filter(LevelFilter::Error)
            .append(RollingFile::new(errors))
            .try_apply()
            .map_err(|err| Error::new("failed to set the global logger").with_source(err))?;

        Ok(vec![combined_guard, errors_guard])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.console_level, LevelFilter::Info);
        assert_eq!(config.file_level, LevelFilter::Error);
        assert_eq!(config.max_log_files, 30);
        assert_eq!(config.max_file_size, 20 * 1024 * 1024);
    }

    #[test]
    fn test_with_methods_return_new_values() {
        let config = LoggingConfig::default()
            .with_log_dir("/tmp/app-logs")
            .with_console_level(LevelFilter::Debug)
            .with_file_level(LevelFilter::Warn)
            .with_max_log_files(7)
            .with_max_file_size(1024);

        assert_eq!(config.log_dir, PathBuf::from("/tmp/app-logs"));
        assert_eq!(config.console_level, LevelFilter::Debug);
        assert_eq!(config.file_level, LevelFilter::Warn);
        assert_eq!(config.max_log_files, 7);
        assert_eq!(config.max_file_size, 1024);
    }
}
