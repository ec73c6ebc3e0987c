//! In-process table store

use super::{validate_table_name, TableConnection, TableStore};
use crate::error::{PipelineError, Result};
use parking_lot::{Mutex, MutexGuard};
use polars::prelude::DataFrame;
use std::collections::HashMap;

/// Tables held in memory, keyed by name
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: Mutex<HashMap<String, DataFrame>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the tables currently stored, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

struct MemoryConnection<'a> {
    tables: MutexGuard<'a, HashMap<String, DataFrame>>,
}

impl TableStore for MemoryTableStore {
    fn open(&self) -> Result<Box<dyn TableConnection + '_>> {
        Ok(Box::new(MemoryConnection {
            tables: self.tables.lock(),
        }))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

impl TableConnection for MemoryConnection<'_> {
    fn write_replace(&mut self, table: &str, frame: &DataFrame) -> Result<()> {
        validate_table_name(table)?;
        self.tables.insert(table.to_string(), frame.clone());
        Ok(())
    }

    fn read_all(&self, table: &str) -> Result<DataFrame> {
        validate_table_name(table)?;
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| PipelineError::MissingSourceTable(table.to_string()))
    }

    fn table_exists(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }
}
