//! In-memory table store with the same constraint semantics as SQLite.

use crate::error::StoreError;
use crate::table::{NormalizedRow, TableKind, TableStore};
use std::collections::BTreeMap;

type RowKey = (String, String);

#[derive(Debug, Default)]
struct MemoryTable {
    // Keyed by (observation_date, synthetic_id) so iteration matches `rows()` ordering
    rows: BTreeMap<RowKey, NormalizedRow>,
    compactions: usize,
}

/// Table store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<TableKind, MemoryTable>,
    fail_compaction: bool,
}

impl MemoryStore {
    /// Empty store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of compactions run on `table`.
    pub fn compactions(&self, table: TableKind) -> usize {
        self.tables.get(&table).map_or(0, |t| t.compactions)
    }

    /// Make every subsequent compaction fail.
    pub fn set_compaction_failure(&mut self, fail: bool) {
        self.fail_compaction = fail;
    }

    fn table(&self, table: TableKind) -> Result<&MemoryTable, StoreError> {
        self.tables
            .get(&table)
            .ok_or_else(|| StoreError::MissingTable(table.table_name().to_string()))
    }

    fn table_mut(&mut self, table: TableKind) -> Result<&mut MemoryTable, StoreError> {
        self.tables
            .get_mut(&table)
            .ok_or_else(|| StoreError::MissingTable(table.table_name().to_string()))
    }

    fn write(&mut self, table: TableKind, rows: &[NormalizedRow], overwrite: bool) -> Result<usize, StoreError> {
        // Validate first so a failing call leaves the table untouched
        if let Some(bad) = rows.iter().find(|r| !table.accepts(r.value)) {
            return Err(StoreError::constraint(
                table.table_name(),
                format!(
                    "{} ({}) rejected value {}",
                    table.value_check().unwrap_or("value NOT NULL"),
                    bad.synthetic_id,
                    bad.value
                ),
            ));
        }

        let target = self.table_mut(table)?;
        let mut affected = 0;
        for row in rows {
            let key = (row.observation_date.clone(), row.synthetic_id.clone());
            match target.rows.get_mut(&key) {
                Some(existing) if overwrite => {
                    existing.value = row.value;
                    affected += 1;
                }
                Some(_) => {}
                None => {
                    target.rows.insert(key, row.clone());
                    affected += 1;
                }
            }
        }
        Ok(affected)
    }
}

impl TableStore for MemoryStore {
    fn ensure_table(&mut self, table: TableKind) -> Result<(), StoreError> {
        self.tables.entry(table).or_default();
        Ok(())
    }

    fn insert_ignore(&mut self, table: TableKind, rows: &[NormalizedRow]) -> Result<usize, StoreError> {
        self.write(table, rows, false)
    }

    fn upsert(&mut self, table: TableKind, rows: &[NormalizedRow]) -> Result<usize, StoreError> {
        self.write(table, rows, true)
    }

    fn delete_all(&mut self, table: TableKind) -> Result<usize, StoreError> {
        let target = self.table_mut(table)?;
        let deleted = target.rows.len();
        target.rows.clear();
        Ok(deleted)
    }

    fn compact(&mut self, table: TableKind) -> Result<(), StoreError> {
        if self.fail_compaction {
            return Err(StoreError::Compaction {
                table: table.table_name().to_string(),
                message: "compaction disabled".to_string(),
            });
        }
        self.table_mut(table)?.compactions += 1;
        Ok(())
    }

    fn count(&self, table: TableKind) -> Result<usize, StoreError> {
        Ok(self.table(table)?.rows.len())
    }

    fn rows(&self, table: TableKind) -> Result<Vec<NormalizedRow>, StoreError> {
        Ok(self.table(table)?.rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(synthetic: &str, date: &str, value: f64) -> NormalizedRow {
        NormalizedRow::new("FR0000120271", synthetic, value, date)
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.ensure_table(TableKind::Forward).unwrap();
        store
    }

    // ========================================
    // Conflict policies
    // ========================================

    #[test]
    fn test_insert_ignore_first_writer_wins() {
        let mut store = store();
        let t = TableKind::Forward;
        let written = store
            .insert_ignore(t, &[row("X 1Y", "2024-03-15", 100.0), row("X 1Y", "2024-03-15", 99.0)])
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(store.rows(t).unwrap()[0].value, 100.0);
    }

    #[test]
    fn test_upsert_last_writer_wins() {
        let mut store = store();
        let t = TableKind::Forward;
        store.upsert(t, &[row("X 1Y", "2024-03-15", 100.0)]).unwrap();
        store.upsert(t, &[row("X 1Y", "2024-03-15", 101.0)]).unwrap();
        assert_eq!(store.rows(t).unwrap()[0].value, 101.0);
        assert_eq!(store.count(t).unwrap(), 1);
    }

    #[test]
    fn test_same_id_different_date_is_distinct() {
        let mut store = store();
        let t = TableKind::Forward;
        store
            .insert_ignore(t, &[row("X 1Y", "2024-03-15", 100.0), row("X 1Y", "2024-03-16", 100.0)])
            .unwrap();
        assert_eq!(store.count(t).unwrap(), 2);
    }

    // ========================================
    // Constraints and atomicity
    // ========================================

    #[test]
    fn test_constraint_failure_is_atomic() {
        let mut store = store();
        let t = TableKind::Forward;
        let result = store.insert_ignore(
            t,
            &[row("X 1Y", "2024-03-15", 100.0), row("X 2Y", "2024-03-15", -0.5)],
        );
        assert!(matches!(result, Err(StoreError::Constraint { .. })));
        assert_eq!(store.count(t).unwrap(), 0);
    }

    #[test]
    fn test_missing_table() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.count(TableKind::Spot),
            Err(StoreError::MissingTable(_))
        ));
        assert!(store.insert_ignore(TableKind::Spot, &[]).is_err());
    }

    #[test]
    fn test_compaction_counter_and_failure() {
        let mut store = store();
        store.compact(TableKind::Forward).unwrap();
        assert_eq!(store.compactions(TableKind::Forward), 1);

        store.set_compaction_failure(true);
        assert!(store.compact(TableKind::Forward).is_err());
        assert_eq!(store.compactions(TableKind::Forward), 1);
    }

    #[test]
    fn test_rows_sorted_by_date_then_id() {
        let mut store = store();
        let t = TableKind::Forward;
        store
            .insert_ignore(
                t,
                &[
                    row("X 2Y", "2024-03-16", 1.0),
                    row("X 1Y", "2024-03-16", 1.0),
                    row("X 9Y", "2024-03-15", 1.0),
                ],
            )
            .unwrap();
        let ids: Vec<_> = store
            .rows(t)
            .unwrap()
            .into_iter()
            .map(|r| (r.observation_date, r.synthetic_id))
            .collect();
        assert_eq!(ids[0], ("2024-03-15".to_string(), "X 9Y".to_string()));
        assert_eq!(ids[1].1, "X 1Y");
    }
}
