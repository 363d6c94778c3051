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

//! A non-blocking writer that offloads file writes to a dedicated thread.

mod builder;
mod worker;

pub use self::builder::NonBlocking;
pub use self::builder::NonBlockingBuilder;
pub use self::builder::WorkerGuard;

#[derive(Debug)]
enum Message {
    Record(Vec<u8>),
    Shutdown,
}
