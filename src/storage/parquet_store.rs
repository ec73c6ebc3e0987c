//! Parquet-file table store: one file per table under a root directory

use super::{validate_table_name, TableConnection, TableStore};
use crate::error::{PipelineError, Result};
use parking_lot::{Mutex, MutexGuard};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Tables persisted as `<root>/<table>.parquet`
#[derive(Debug)]
pub struct ParquetTableStore {
    root: PathBuf,
    writer: Mutex<()>,
}

impl ParquetTableStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            writer: Mutex::new(()),
        }
    }

    /// File backing `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        table_path(&self.root, table)
    }
}

fn table_path(root: &Path, table: &str) -> PathBuf {
    root.join(format!("{}.parquet", table))
}

struct ParquetConnection<'a> {
    root: &'a Path,
    opened_at: Instant,
    _writer: MutexGuard<'a, ()>,
}

impl TableStore for ParquetTableStore {
    fn open(&self) -> Result<Box<dyn TableConnection + '_>> {
        fs::create_dir_all(&self.root)?;
        let writer = self.writer.lock();
        debug!(root = %self.root.display(), "Storage connection opened");

        Ok(Box::new(ParquetConnection {
            root: &self.root,
            opened_at: Instant::now(),
            _writer: writer,
        }))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

impl TableConnection for ParquetConnection<'_> {
    fn write_replace(&mut self, table: &str, frame: &DataFrame) -> Result<()> {
        validate_table_name(table)?;
        let target = table_path(self.root, table);
        // Same directory as the target so the rename stays on one filesystem
        let staging = self.root.join(format!(
            ".{}.{}.tmp",
            table,
            uuid::Uuid::new_v4().simple()
        ));

        let written = File::create(&staging)
            .map_err(PipelineError::from)
            .and_then(|file| {
                let mut frame = frame.clone();
                ParquetWriter::new(file).finish(&mut frame)?;
                Ok(())
            })
            .and_then(|_| fs::rename(&staging, &target).map_err(PipelineError::from));

        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        info!(
            table = %table,
            rows = frame.height(),
            columns = frame.width(),
            "Table replaced"
        );
        Ok(())
    }

    fn read_all(&self, table: &str) -> Result<DataFrame> {
        validate_table_name(table)?;
        let path = table_path(self.root, table);
        if !path.exists() {
            return Err(PipelineError::MissingSourceTable(table.to_string()));
        }

        let file = File::open(&path)?;
        let frame = ParquetReader::new(file).finish()?;
        debug!(table = %table, rows = frame.height(), "Table read");
        Ok(frame)
    }

    fn table_exists(&self, table: &str) -> bool {
        validate_table_name(table).is_ok() && table_path(self.root, table).exists()
    }
}

impl Drop for ParquetConnection<'_> {
    fn drop(&mut self) {
        debug!(
            root = %self.root.display(),
            held_ms = self.opened_at.elapsed().as_millis() as u64,
            "Storage connection released"
        );
    }
}
