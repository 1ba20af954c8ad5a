//! Destination tables and the store abstraction over them.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the destination tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKind {
    /// Normalised forward prices, `value >= 0`
    Forward,
    /// Normalised implied volatilities, `value > 0`
    Volatility,
    /// Raw spot prices keyed by instrument
    Spot,
    /// Raw forward prices keyed by instrument and maturity date
    RawForward,
    /// Raw implied volatilities keyed by instrument, maturity date and strike
    RawVolatility,
}

impl TableKind {
    /// Every table, in creation order.
    pub const ALL: [TableKind; 5] = [
        TableKind::Forward,
        TableKind::Volatility,
        TableKind::Spot,
        TableKind::RawForward,
        TableKind::RawVolatility,
    ];

    /// SQL table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            TableKind::Forward => "asset_forward_normalized",
            TableKind::Volatility => "asset_volatility_normalized",
            TableKind::Spot => "asset_spot",
            TableKind::RawForward => "asset_forward",
            TableKind::RawVolatility => "asset_volatility",
        }
    }

    /// SQL `CHECK` expression on the value column, if any.
    pub fn value_check(&self) -> Option<&'static str> {
        match self {
            TableKind::Forward => Some("value >= 0"),
            TableKind::Volatility => Some("value > 0"),
            TableKind::Spot | TableKind::RawForward | TableKind::RawVolatility => None,
        }
    }

    /// Whether `value` satisfies the column constraints (`NOT NULL` and `CHECK`).
    ///
    /// SQLite stores NaN as NULL, so NaN never satisfies `NOT NULL`.
    pub fn accepts(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        match self {
            TableKind::Forward => value >= 0.0,
            TableKind::Volatility => value > 0.0,
            TableKind::Spot | TableKind::RawForward | TableKind::RawVolatility => true,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// One output row. The key is `(synthetic_id, observation_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Instrument identifier
    pub instrument_id: String,
    /// Instrument plus grid coordinates
    pub synthetic_id: String,
    /// Normalised value
    pub value: f64,
    /// Observation date, `YYYY-MM-DD`
    pub observation_date: String,
}

impl NormalizedRow {
    /// Create a row.
    pub fn new(
        instrument_id: impl Into<String>,
        synthetic_id: impl Into<String>,
        value: f64,
        observation_date: impl Into<String>,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            synthetic_id: synthetic_id.into(),
            value,
            observation_date: observation_date.into(),
        }
    }

    /// Uniqueness key.
    pub fn key(&self) -> (&str, &str) {
        (&self.synthetic_id, &self.observation_date)
    }
}

/// A store of destination tables.
///
/// Each bulk write runs in one transaction: either every row of the call is
/// applied or none is. Rows within one call are applied in order, so under
/// [`insert_ignore`](TableStore::insert_ignore) the first of two rows sharing
/// a key wins and under [`upsert`](TableStore::upsert) the last one does.
pub trait TableStore {
    /// Create `table` if it does not exist.
    fn ensure_table(&mut self, table: TableKind) -> Result<(), StoreError>;

    /// Insert rows, ignoring those whose key already exists.
    ///
    /// Returns the number of rows inserted.
    fn insert_ignore(&mut self, table: TableKind, rows: &[NormalizedRow]) -> Result<usize, StoreError>;

    /// Insert rows, replacing the value of those whose key already exists.
    ///
    /// Returns the number of rows inserted or updated.
    fn upsert(&mut self, table: TableKind, rows: &[NormalizedRow]) -> Result<usize, StoreError>;

    /// Delete every row. Returns the number deleted.
    fn delete_all(&mut self, table: TableKind) -> Result<usize, StoreError>;

    /// Reclaim space, refresh statistics and rebuild indexes.
    fn compact(&mut self, table: TableKind) -> Result<(), StoreError>;

    /// Number of rows.
    fn count(&self, table: TableKind) -> Result<usize, StoreError>;

    /// All rows ordered by observation date then synthetic id.
    fn rows(&self, table: TableKind) -> Result<Vec<NormalizedRow>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_constraints() {
        assert!(TableKind::Forward.accepts(0.0));
        assert!(!TableKind::Forward.accepts(-1e-9));
        assert!(!TableKind::Volatility.accepts(0.0));
        assert!(TableKind::Volatility.accepts(0.2));
        assert!(TableKind::Spot.accepts(-3.0));
        assert!(!TableKind::Spot.accepts(f64::NAN));
        assert!(TableKind::RawForward.accepts(-0.5));
        assert!(!TableKind::RawVolatility.accepts(f64::NAN));
    }

    #[test]
    fn test_table_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            TableKind::ALL.iter().map(|t| t.table_name()).collect();
        assert_eq!(names.len(), TableKind::ALL.len());
        assert_eq!(TableKind::Spot.to_string(), "asset_spot");
        assert_eq!(TableKind::RawForward.to_string(), "asset_forward");
    }
}
