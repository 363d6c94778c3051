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

use blanclog::LoggingConfig;
use log::LevelFilter;

fn main() {
    // console at debug, plus daily `combined` and `error` files under logs/
    let _guards = LoggingConfig::default()
        .with_console_level(LevelFilter::Debug)
        .with_file_level(LevelFilter::Info)
        .with_max_log_files(10)
        .apply()
        .unwrap();

    log::error!("Hello error!");
    log::warn!("Hello warn!");
    log::info!("Hello info!");
    log::debug!("Hello debug!");
    log::trace!("Hello trace!");
}
