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

//! Correlation identifiers for tying together log records of one operation.

use uuid::Uuid;

/// Derives a correlation id as a 32-char lowercase hex string.
///
/// Equal seeds always derive the same id (UUIDv5 in the DNS namespace), so
/// records carrying the same seed can be grouped after the fact. Without a
/// seed, a random id is derived.
///
/// ```
/// use blanclog::correlation::log_id;
///
/// assert_eq!(log_id(Some("req-42")), log_id(Some("req-42")));
/// assert_eq!(log_id(None).len(), 32);
/// ```
pub fn log_id(seed: Option<&str>) -> String {
    let id = match seed {
        Some(seed) => Uuid::new_v5(&Uuid::NAMESPACE_DNS, seed.as_bytes()),
        None => Uuid::new_v5(&Uuid::NAMESPACE_DNS, Uuid::new_v4().as_bytes()),
    };
    id.simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_id_deterministic_for_equal_seeds() {
        assert_eq!(log_id(Some("users")), log_id(Some("users")));
    }

    #[test]
    fn test_log_id_distinct_seeds_differ() {
        assert_ne!(log_id(Some("users")), log_id(Some("orders")));
    }

    #[test]
    fn test_log_id_shape() {
        for id in [log_id(None), log_id(Some("users"))] {
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(!id.contains('-'));
            assert_eq!(id, id.to_lowercase());
        }
    }

    #[test]
    fn test_log_id_random_without_seed() {
        assert_ne!(log_id(None), log_id(None));
    }
}
