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

use std::time::Duration;

use blanclog::sql::QueryLogger;
use serde_json::json;

fn main() {
    blanclog::stdout().apply();

    let queries = QueryLogger::new();

    queries.log_query(
        "SELECT id, name FROM users WHERE created_at > $1 LIMIT 10",
        &[json!("2024-01-01")],
    );

    // fires all three lint rules
    queries.log_query(
        "SELECT * FROM users u JOIN orders o WHERE u.name LIKE '%smith'",
        &[],
    );

    queries.log_query_slow(
        Duration::from_millis(250),
        "SELECT id FROM orders ORDER BY total DESC",
        &[],
    );

    queries.log_query_error(
        "duplicate key value violates unique constraint",
        "INSERT INTO users (id, name) VALUES ($1, $2)",
        &[json!(1), json!("smith")],
    );

    queries.log_schema_build("schema synchronized");
    queries.log_migration("migration 20240810120000 applied");
}
