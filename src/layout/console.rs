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

use std::collections::BTreeMap;

use colored::Color;
use colored::Colorize;
use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Level;

use crate::Error;
use crate::correlation;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::ModuleContext;
use crate::layout::KvDisplay;
use crate::layout::Layout;

/// A layout that formats log records for human eyes.
///
/// Output format:
///
/// ```text
/// [0d9fb1ac] 2024-08-11 22:44:57 🍀 INFO  [users] - request accepted
/// [5c1e772b] 2024-08-11 22:44:58 🚨 ERROR [orders → checkout] - payment rejected
/// ```
///
/// Each record carries a correlation id stamp (taken from the `log_id`
/// diagnostic value when present, freshly derived otherwise), a dim
/// timestamp, an emoji-decorated level, and the module hierarchy rendered
/// with arrows. Use [`ConsoleLayout::no_color`] to degrade to plain text.
///
/// The timezone of the timestamp can be customized with
/// [`ConsoleLayout::timezone`]; the system timezone is used otherwise.
#[derive(Default, Debug, Clone)]
pub struct ConsoleLayout {
    pub colors: LevelColor,
    no_color: bool,
    tz: Option<TimeZone>,
}

/// Customize the color of each log level.
#[derive(Debug, Clone)]
pub struct LevelColor {
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
    pub trace: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: Color::TrueColor {
                r: 0xFF,
                g: 0x6B,
                b: 0x6B,
            },
            warn: Color::TrueColor {
                r: 0xFF,
                g: 0xD9,
                b: 0x3D,
            },
            info: Color::TrueColor {
                r: 0x84,
                g: 0x5E,
                b: 0xC2,
            },
            debug: Color::TrueColor {
                r: 0x4D,
                g: 0x96,
                b: 0xFF,
            },
            trace: Color::TrueColor {
                r: 0x6B,
                g: 0xCB,
                b: 0x77,
            },
        }
    }
}

fn level_emoji(level: Level) -> &'static str {
    match level {
        Level::Error => "🚨",
        Level::Warn => "⚠️",
        Level::Info => "🍀",
        Level::Debug => "🐛",
        Level::Trace => "📢",
    }
}

impl ConsoleLayout {
    /// Customize the color of each log level.
    pub fn colors(mut self, colors: LevelColor) -> Self {
        self.colors = colors;
        self
    }

    /// Render plain text without any styling.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Sets the timezone of the timestamp.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.color(color).to_string()
        }
    }

    fn render_module(&self, context: &ModuleContext) -> String {
        let name = match context {
            ModuleContext::Label(label) => label.as_str(),
            ModuleContext::Module { name } => name.as_str(),
        };
        if self.no_color {
            return name.replace('/', " → ");
        }
        name.split('/')
            .map(|part| part.cyan().to_string())
            .collect::<Vec<_>>()
            .join(&" → ".dimmed().to_string())
    }
}

impl Layout for ConsoleLayout {
    fn format(
        &self,
        record: &log::Record,
        diags: &[Box<dyn Diagnostic>],
    ) -> Result<Vec<u8>, Error> {
        let diags = collect_diagnostics(diags)?;

        let log_id = match diags.get("log_id") {
            Some(id) => id.clone(),
            None => correlation::log_id(None),
        };
        let stamp = format!("[{}]", log_id.get(..8).unwrap_or(&log_id));
        let stamp = self.paint(
            &stamp,
            Color::TrueColor {
                r: 0x00,
                g: 0x00,
                b: 0x8B,
            },
        );

        let time = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        }
        .strftime("%Y-%m-%d %H:%M:%S")
        .to_string();
        let time = if self.no_color {
            time
        } else {
            time.dimmed().to_string()
        };

        let level = record.level();
        let level_text = format!("{} {:<5}", level_emoji(level), level.as_str().to_uppercase());
        let color = match level {
            Level::Error => self.colors.error,
            Level::Warn => self.colors.warn,
            Level::Info => self.colors.info,
            Level::Debug => self.colors.debug,
            Level::Trace => self.colors.trace,
        };
        let level_text = self.paint(&level_text, color);

        let context = match diags.get("module") {
            Some(module) => ModuleContext::Module {
                name: module.clone(),
            },
            None => ModuleContext::Label(
                record
                    .module_path()
                    .unwrap_or_else(|| record.target())
                    .to_string(),
            ),
        };
        let module = self.render_module(&context);

        let message = record.args().to_string();
        let message = if self.no_color {
            message
        } else {
            message.bright_blue().to_string()
        };

        let kvs = KvDisplay::new(record.key_values());

        let mut line = format!("{stamp} {time} {level_text} [{module}] - {message}{kvs}");
        for (key, value) in diags.iter() {
            if key != "log_id" && key != "module" {
                line.push_str(&format!(" {key}={value}"));
            }
        }

        Ok(line.into_bytes())
    }
}

pub(crate) fn collect_diagnostics(
    diags: &[Box<dyn Diagnostic>],
) -> Result<BTreeMap<String, String>, Error> {
    struct Collect {
        kvs: BTreeMap<String, String>,
    }

    impl crate::diagnostic::Visitor for Collect {
        fn visit(
            &mut self,
            key: std::borrow::Cow<'_, str>,
            value: std::borrow::Cow<'_, str>,
        ) -> Result<(), Error> {
            self.kvs.insert(key.into_owned(), value.into_owned());
            Ok(())
        }
    }

    let mut collect = Collect {
        kvs: BTreeMap::new(),
    };
    for diag in diags {
        diag.visit(&mut collect)?;
    }
    Ok(collect.kvs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ThreadLocalDiagnostic;

    fn format_record(layout: &ConsoleLayout, diags: &[Box<dyn Diagnostic>]) -> String {
        let record = log::Record::builder()
            .args(format_args!("hello"))
            .level(Level::Info)
            .target("app")
            .module_path(Some("app::server"))
            .build();
        let bytes = layout.format(&record, diags).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_plain_format_shape() {
        let layout = ConsoleLayout::default().no_color();
        let line = format_record(&layout, &[]);

        assert!(line.starts_with('['), "line={line:?}");
        assert!(line.contains("🍀 INFO"));
        assert!(line.contains("[app::server]"));
        assert!(line.ends_with("- hello"));
    }

    #[test]
    fn test_correlation_stamp_is_eight_hex_chars() {
        let layout = ConsoleLayout::default().no_color();
        let line = format_record(&layout, &[]);
        let stamp = &line[1..9];
        assert_eq!(stamp.len(), 8);
        assert!(stamp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_module_diagnostic_wins_over_module_path() {
        ThreadLocalDiagnostic::insert("module", "users/detail");
        let layout = ConsoleLayout::default().no_color();
        let line = format_record(&layout, &[Box::new(ThreadLocalDiagnostic::default())]);
        ThreadLocalDiagnostic::remove("module");

        assert!(line.contains("[users → detail]"), "line={line:?}");
        assert!(!line.contains("app::server"));
    }

    #[test]
    fn test_log_id_diagnostic_stamps_record() {
        ThreadLocalDiagnostic::insert("log_id", "feedc0dedeadbeef");
        let layout = ConsoleLayout::default().no_color();
        let line = format_record(&layout, &[Box::new(ThreadLocalDiagnostic::default())]);
        ThreadLocalDiagnostic::remove("log_id");

        assert!(line.starts_with("[feedc0de]"), "line={line:?}");
    }
}
