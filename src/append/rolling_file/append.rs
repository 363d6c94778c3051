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

use log::Record;

use crate::Error;
use crate::append::Append;
use crate::append::rolling_file::RollingFileWriter;
use crate::diagnostic::Diagnostic;
use crate::layout::JsonLayout;
use crate::layout::Layout;
use crate::non_blocking::NonBlocking;

/// An appender that writes log records to rolling files.
#[derive(Debug)]
pub struct RollingFile {
    layout: Box<dyn Layout>,
    writer: NonBlocking<RollingFileWriter>,
}

impl RollingFile {
    /// Creates a new [`RollingFile`] appender.
    ///
    /// This appender by default formats log records as JSON lines.
    pub fn new(writer: NonBlocking<RollingFileWriter>) -> Self {
        Self {
            layout: Box::new(JsonLayout::default()),
            writer,
        }
    }

    /// Sets the layout used to format log records.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for RollingFile {
    fn append(&self, record: &Record, diags: &[Box<dyn Diagnostic>]) -> Result<(), Error> {
        let mut bytes = self.layout.format(record, diags)?;
        bytes.push(b'\n');
        self.writer.send(bytes)
    }
}
