//! SQL for the inventory database.
//!
//! The package table and its column names are also quoted to the model in the
//! query-formulation prompt, so renaming anything here changes what the model
//! is told to generate.

/// One row per installed package, keyed by name.
pub const CREATE_PACKAGES_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS packages (
        name TEXT PRIMARY KEY,
        version TEXT,
        description TEXT,
        depends_on TEXT
    )
";

/// Append-only log of suggestions shown to the user.
pub const CREATE_SUGGESTIONS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS command_suggestions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_input TEXT NOT NULL,
        command TEXT NOT NULL,
        explanation TEXT NOT NULL,
        timestamp TEXT NOT NULL
    )
";

pub const ALL_TABLE_CREATION_SQL: &[&str] =
    &[CREATE_PACKAGES_TABLE_SQL, CREATE_SUGGESTIONS_TABLE_SQL];

pub const UPSERT_PACKAGE_SQL: &str = "
    INSERT OR REPLACE INTO packages (name, version, description, depends_on)
    VALUES (?1, ?2, ?3, ?4)
";

pub const SELECT_PACKAGE_SQL: &str =
    "SELECT name, version, description, depends_on FROM packages WHERE name = ?1";

pub const COUNT_PACKAGES_SQL: &str = "SELECT COUNT(*) FROM packages";

pub const INSERT_SUGGESTION_SQL: &str = "
    INSERT INTO command_suggestions (user_input, command, explanation, timestamp)
    VALUES (?1, ?2, ?3, ?4)
";

pub const SELECT_HISTORY_SQL: &str = "
    SELECT id, user_input, command, explanation, timestamp
    FROM command_suggestions
    ORDER BY timestamp DESC, id DESC
";

pub const CLEAR_HISTORY_SQL: &str = "DELETE FROM command_suggestions";

/// Separator used to flatten `depends_on` into a single TEXT column.
pub const DEPENDS_SEPARATOR: &str = ", ";
