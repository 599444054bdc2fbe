use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

use crate::store::SnapshotStore;

/// SQLite file holding the session's view-state snapshots.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            path: PathBuf::from(":memory:"),
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
            proj_dirs.data_dir().join("jobtrack.db")
        } else {
            PathBuf::from("jobtrack.db")
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS view_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='view_state'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!(
                "Database not initialized. Run 'jobtrack init' first."
            ));
        }
        Ok(())
    }

    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM view_state WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read view state timestamp")
    }
}

impl SnapshotStore for Database {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM view_state WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read view state")
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO view_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE
                 SET value = excluded.value, updated_at = datetime('now')",
                params![key, value],
            )
            .context("Failed to write view state")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ViewState;
    use crate::filter::FilterCategory;
    use crate::sort::{SortDirection, SortField, SortState};
    use crate::store::{Persistence, SNAPSHOT_KEY};

    #[test]
    fn test_read_missing_key() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.read(SNAPSHOT_KEY).unwrap(), None);
        assert_eq!(db.updated_at(SNAPSHOT_KEY).unwrap(), None);
    }

    #[test]
    fn test_write_overwrites() {
        let mut db = Database::open_in_memory().unwrap();
        db.write("k", "one").unwrap();
        db.write("k", "two").unwrap();
        assert_eq!(db.read("k").unwrap(), Some("two".to_string()));
        assert!(db.updated_at("k").unwrap().is_some());
    }

    #[test]
    fn test_uninitialized_database_is_reported() {
        let conn = Connection::open_in_memory().unwrap();
        let db = Database {
            conn,
            path: PathBuf::from(":memory:"),
        };
        assert!(db.ensure_initialized().is_err());
        db.init().unwrap();
        assert!(db.ensure_initialized().is_ok());
    }

    #[test]
    fn test_persistence_round_trip_through_sqlite() {
        let mut state = ViewState::default();
        state.filters.toggle(FilterCategory::Visa, "false");
        state.sort = SortState::by(SortField::Company, SortDirection::Desc);

        let mut persistence = Persistence::new(Database::open_in_memory().unwrap());
        persistence.save(&state);
        assert_eq!(persistence.load(), Some(state));
    }

    #[test]
    fn test_persistence_on_missing_table_falls_back() {
        let conn = Connection::open_in_memory().unwrap();
        let db = Database {
            conn,
            path: PathBuf::from(":memory:"),
        };
        let mut persistence = Persistence::new(db);
        persistence.save(&ViewState::default());
        assert_eq!(persistence.load(), Some(ViewState::default()));
    }
}
