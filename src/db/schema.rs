//! SQL DDL for the account table.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `username` UNIQUE (creates an index implicitly)
/// - `password` holding the 64-char hex digest, never plaintext
/// - `role` as `'user'` or `'admin'`
///
/// Existing databases created with this exact table stay readable, so keep the
/// column names and types unchanged.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username VARCHAR(30) NOT NULL UNIQUE,
    password VARCHAR(64) NOT NULL,
    role VARCHAR(10) NOT NULL DEFAULT 'user'
)
"#;
