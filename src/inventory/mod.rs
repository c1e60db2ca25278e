//! Local SQLite store: the installed-package inventory and the suggestion log.
//!
//! Every operation opens its own connection and drops it before returning,
//! so a refresh running in another process never sees a handle held open by
//! an interactive session.

pub mod schema;
pub mod types;

use crate::error::{Result, SnapshellError};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};

pub use types::{PackageRecord, SuggestionRecord};

/// Upper bound on rows returned by a generated lookup query.
pub const MAX_LOOKUP_ROWS: usize = 30;

pub struct InventoryStore {
    db_path: PathBuf,
}

impl InventoryStore {
    /// Open (creating if needed) the store at `db_path`.
    ///
    /// Fails with `StoreUnavailable` when the directory or database cannot be
    /// created, which callers treat as fatal at start-up.
    pub fn open<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SnapshellError::StoreUnavailable(format!("{}: {}", parent.display(), e))
            })?;
        }

        let store = InventoryStore { db_path };
        store.init()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        for sql in schema::ALL_TABLE_CREATION_SQL {
            conn.execute(sql, [])
                .map_err(|e| SnapshellError::StoreUnavailable(e.to_string()))?;
        }
        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).map_err(|e| {
            SnapshellError::StoreUnavailable(format!("{}: {}", self.db_path.display(), e))
        })
    }

    fn connect_read_only(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SnapshellError::StoreUnavailable(format!("{}: {}", self.db_path.display(), e)))
    }

    /// Insert or overwrite packages by name. Returns the number written.
    pub fn upsert_packages(&self, packages: &[PackageRecord]) -> Result<usize> {
        self.upsert_packages_with_progress(packages, |_| {})
    }

    /// Like `upsert_packages`, calling `on_written` with each package as it
    /// is written. Nothing is visible to readers until the whole batch commits.
    pub fn upsert_packages_with_progress<F>(
        &self,
        packages: &[PackageRecord],
        mut on_written: F,
    ) -> Result<usize>
    where
        F: FnMut(&PackageRecord),
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(schema::UPSERT_PACKAGE_SQL)?;
            for pkg in packages {
                stmt.execute(params![
                    pkg.name,
                    pkg.version,
                    pkg.description,
                    pkg.depends_on.join(schema::DEPENDS_SEPARATOR),
                ])?;
                on_written(pkg);
            }
        }
        tx.commit()?;

        info!("Upserted {} packages into {}", packages.len(), self.db_path.display());
        Ok(packages.len())
    }

    pub fn get_package(&self, name: &str) -> Result<Option<PackageRecord>> {
        let conn = self.connect()?;
        let pkg = conn
            .query_row(schema::SELECT_PACKAGE_SQL, params![name], |row| {
                package_from_row(row, 4)
            })
            .optional()?;
        Ok(pkg)
    }

    pub fn package_count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(schema::COUNT_PACKAGES_SQL, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Run a generated query and map its rows to packages.
    ///
    /// Never fails: any error (bad SQL, unknown column, a statement that would
    /// write, a missing database) is logged and yields an empty result.
    pub fn lookup(&self, query: &str) -> Vec<PackageRecord> {
        match self.try_lookup(query) {
            Ok(rows) => rows,
            Err(e) => {
                debug!("Inventory lookup failed for {:?}: {}", query, e);
                Vec::new()
            }
        }
    }

    fn try_lookup(&self, query: &str) -> Result<Vec<PackageRecord>> {
        let conn = self.connect_read_only()?;
        let mut stmt = conn.prepare(query)?;

        if !stmt.readonly() {
            return Err(SnapshellError::StoreExecution(
                "refusing to execute a statement that modifies the database".to_string(),
            ));
        }

        let columns = stmt.column_count();
        if columns < 2 {
            return Err(SnapshellError::StoreExecution(format!(
                "expected at least name and version columns, got {}",
                columns
            )));
        }

        let rows = stmt.query_map([], |row| package_from_row(row, columns))?;
        let packages = rows
            .take(MAX_LOOKUP_ROWS)
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(packages)
    }

    pub fn record_suggestion(
        &self,
        user_input: &str,
        command: &str,
        explanation: &str,
    ) -> Result<SuggestionRecord> {
        let conn = self.connect()?;
        // Stored with microsecond precision; truncate so the returned record
        // equals what history() reads back.
        let now = Utc::now().trunc_subsecs(6);
        conn.execute(
            schema::INSERT_SUGGESTION_SQL,
            params![
                user_input,
                command,
                explanation,
                now.to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )?;

        Ok(SuggestionRecord {
            id: conn.last_insert_rowid(),
            user_input: user_input.to_string(),
            command: command.to_string(),
            explanation: explanation.to_string(),
            timestamp: now,
        })
    }

    /// All recorded suggestions, newest first.
    pub fn history(&self) -> Result<Vec<SuggestionRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(schema::SELECT_HISTORY_SQL)?;
        let rows = stmt.query_map([], |row| {
            let raw_timestamp: String = row.get(4)?;
            Ok(SuggestionRecord {
                id: row.get(0)?,
                user_input: row.get(1)?,
                command: row.get(2)?,
                explanation: row.get(3)?,
                timestamp: parse_timestamp(&raw_timestamp).unwrap_or_else(|| {
                    debug!("Unparseable suggestion timestamp {:?}", raw_timestamp);
                    DateTime::<Utc>::MIN_UTC
                }),
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete the whole suggestion log. Returns the number of rows removed.
    pub fn clear_history(&self) -> Result<usize> {
        let conn = self.connect()?;
        let removed = conn.execute(schema::CLEAR_HISTORY_SQL, [])?;
        info!("Cleared {} suggestion records", removed);
        Ok(removed)
    }
}

fn package_from_row(row: &Row<'_>, columns: usize) -> rusqlite::Result<PackageRecord> {
    let name: String = row.get(0)?;
    let version: Option<String> = row.get(1)?;
    let description: Option<String> = if columns > 2 { row.get(2)? } else { None };
    let depends_on: Option<String> = if columns > 3 { row.get(3)? } else { None };

    Ok(PackageRecord {
        name,
        version: version.unwrap_or_default(),
        description: description.unwrap_or_default(),
        depends_on: depends_on
            .map(|deps| {
                deps.split(schema::DEPENDS_SEPARATOR)
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

/// RFC 3339, or SQLite's `CURRENT_TIMESTAMP` format for rows written by
/// older versions of the tool.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
