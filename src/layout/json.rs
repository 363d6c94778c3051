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

use std::fmt::Arguments;

use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Record;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::diagnostic::Diagnostic;
use crate::layout::Layout;
use crate::layout::console::collect_diagnostics;
use crate::layout::kv::collect_kvs;

/// A layout that formats log records as one JSON object per line, the format
/// the rolling file appenders write by default.
///
/// Output format:
///
/// ```json
/// {"timestamp":"2024-08-11 22:44:57","level":"INFO","target":"app","module_path":"app::server","file":"src/main.rs","line":12,"message":"started","kvs":{}}
/// ```
///
/// Diagnostic key-values are merged into `kvs`; a `log_id` diagnostic value,
/// when present, is lifted into its own top-level field.
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    tz: Option<TimeZone>,
}

impl JsonLayout {
    /// Sets the timezone of the timestamp.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: Zoned,
    level: &'a str,
    target: &'a str,
    module_path: &'a str,
    file: &'a str,
    line: u32,
    #[serde(serialize_with = "serialize_args")]
    message: &'a Arguments<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_id: Option<String>,
    kvs: Map<String, Value>,
}

fn serialize_timestamp<S>(timestamp: &Zoned, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&timestamp.strftime("%Y-%m-%d %H:%M:%S"))
}

fn serialize_args<S>(args: &Arguments, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(args)
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record, diags: &[Box<dyn Diagnostic>]) -> Result<Vec<u8>, Error> {
        let mut kvs = Map::new();
        for (key, value) in collect_kvs(record.key_values()) {
            kvs.insert(key, value.into());
        }

        let mut log_id = None;
        for (key, value) in collect_diagnostics(diags)? {
            if key == "log_id" {
                log_id = Some(value);
            } else {
                kvs.insert(key, value.into());
            }
        }

        let record_line = RecordLine {
            timestamp: match self.tz.clone() {
                Some(tz) => Timestamp::now().to_zoned(tz),
                None => Zoned::now(),
            },
            level: record.level().as_str(),
            target: record.target(),
            module_path: record.module_path().unwrap_or_default(),
            file: record.file().unwrap_or_default(),
            line: record.line().unwrap_or_default(),
            message: record.args(),
            log_id,
            kvs,
        };

        serde_json::to_vec(&record_line)
            .map_err(|err| Error::new("failed to serialize log record").with_source(err))
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;
    use crate::diagnostic::ThreadLocalDiagnostic;

    #[test]
    fn test_json_line_fields() {
        let kvs = [("span", "db")];
        let record = log::Record::builder()
            .args(format_args!("started"))
            .level(Level::Info)
            .target("app")
            .module_path(Some("app::server"))
            .file(Some("src/main.rs"))
            .line(Some(12))
            .key_values(&kvs)
            .build();
        let bytes = JsonLayout::default().format(&record, &[]).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["level"], "INFO");
        assert_eq!(value["target"], "app");
        assert_eq!(value["module_path"], "app::server");
        assert_eq!(value["kvs"]["span"], "db");
        assert_eq!(value["file"], "src/main.rs");
        assert_eq!(value["line"], 12);
        assert_eq!(value["message"], "started");
        assert!(value.get("log_id").is_none());
    }

    #[test]
    fn test_log_id_diagnostic_is_lifted() {
        ThreadLocalDiagnostic::insert("log_id", "feedc0de");
        let record = log::Record::builder()
            .args(format_args!("x"))
            .level(Level::Warn)
            .target("app")
            .build();
        let diags: Vec<Box<dyn Diagnostic>> = vec![Box::new(ThreadLocalDiagnostic::default())];
        let bytes = JsonLayout::default().format(&record, &diags).unwrap();
        ThreadLocalDiagnostic::remove("log_id");

        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["log_id"], "feedc0de");
    }
}
