//! SQLite-backed table store.

use crate::error::StoreError;
use crate::table::{NormalizedRow, TableKind, TableStore};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

/// Table store on a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;
        debug!(path = %path.display(), "Opened SQLite store");
        Ok(Self { conn })
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    fn write(&mut self, table: TableKind, rows: &[NormalizedRow], conflict: &str) -> Result<usize, StoreError> {
        let sql = format!(
            "INSERT INTO {} (instrument_id, synthetic_id, value, observation_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(synthetic_id, observation_date) {}",
            table.table_name(),
            conflict
        );

        let tx = self.conn.transaction()?;
        let mut affected = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                affected += stmt.execute(params![
                    &row.instrument_id,
                    &row.synthetic_id,
                    row.value,
                    &row.observation_date,
                ])?;
            }
        }
        tx.commit()?;
        Ok(affected)
    }
}

impl TableStore for SqliteStore {
    fn ensure_table(&mut self, table: TableKind) -> Result<(), StoreError> {
        let name = table.table_name();
        let value_column = match table.value_check() {
            Some(check) => format!("value REAL NOT NULL CHECK ({})", check),
            None => "value REAL NOT NULL".to_string(),
        };
        self.conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {name} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                instrument_id TEXT NOT NULL,
                synthetic_id TEXT NOT NULL,
                {value_column},
                observation_date TEXT NOT NULL,
                UNIQUE (synthetic_id, observation_date)
            );

            CREATE INDEX IF NOT EXISTS idx_{name}_instrument
                ON {name}(instrument_id, observation_date);
            "#
        ))?;
        Ok(())
    }

    fn insert_ignore(&mut self, table: TableKind, rows: &[NormalizedRow]) -> Result<usize, StoreError> {
        self.write(table, rows, "DO NOTHING")
    }

    fn upsert(&mut self, table: TableKind, rows: &[NormalizedRow]) -> Result<usize, StoreError> {
        self.write(table, rows, "DO UPDATE SET value = excluded.value")
    }

    fn delete_all(&mut self, table: TableKind) -> Result<usize, StoreError> {
        let deleted = self
            .conn
            .execute(&format!("DELETE FROM {}", table.table_name()), [])?;
        Ok(deleted)
    }

    fn compact(&mut self, table: TableKind) -> Result<(), StoreError> {
        let name = table.table_name();
        self.conn
            .execute_batch(&format!("VACUUM; ANALYZE {name}; REINDEX {name};"))
            .map_err(|e| StoreError::Compaction {
                table: name.to_string(),
                message: e.to_string(),
            })
    }

    fn count(&self, table: TableKind) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.table_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn rows(&self, table: TableKind) -> Result<Vec<NormalizedRow>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT instrument_id, synthetic_id, value, observation_date FROM {}
             ORDER BY observation_date, synthetic_id",
            table.table_name()
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(NormalizedRow {
                    instrument_id: row.get(0)?,
                    synthetic_id: row.get(1)?,
                    value: row.get(2)?,
                    observation_date: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
