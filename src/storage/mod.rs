//! Table storage
//!
//! A table store is addressed by table name and supports two operations:
//! replace-writes (the new table fully supersedes the old one) and full
//! reads. Access goes through a connection obtained from [`TableStore::open`];
//! the connection holds the store's writer lock until it is dropped.

mod memory;
mod parquet_store;

pub use memory::MemoryTableStore;
pub use parquet_store::ParquetTableStore;

use crate::error::{PipelineError, Result};
use polars::prelude::DataFrame;

/// A store of named tables
pub trait TableStore: Send + Sync {
    /// Acquire a connection; released when the returned value is dropped
    fn open(&self) -> Result<Box<dyn TableConnection + '_>>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// An open connection to a [`TableStore`]
pub trait TableConnection {
    /// Replace `table` with `frame`. Either the whole frame lands or the
    /// previous table is left untouched.
    fn write_replace(&mut self, table: &str, frame: &DataFrame) -> Result<()>;

    /// Read every row of `table`
    fn read_all(&self, table: &str) -> Result<DataFrame>;

    /// Whether `table` currently exists
    fn table_exists(&self, table: &str) -> bool;
}

/// Table names map to file names, so only `[A-Za-z0-9_-]` is accepted
pub fn validate_table_name(table: &str) -> Result<()> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PipelineError::InvalidTableName(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("housing_data_transformed").is_ok());
        assert!(validate_table_name("run-2").is_ok());
        for bad in ["", "../etc", "a b", "x;drop", "tables/x"] {
            assert!(
                matches!(validate_table_name(bad), Err(PipelineError::InvalidTableName(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
