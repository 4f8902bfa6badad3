use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use super::atomic_file::write_atomically;
use crate::app::ports::CanonicalSink;
use crate::constants::DELIMITER;
use crate::domain::{CanonicalRecord, Field};
use crate::error::{NormalizeError, Result};

/// Writes the canonical dataset to a single comma-separated file.
///
/// The whole file is rendered in memory, staged next to `path` and renamed
/// into place, so a failed run leaves any previous file at `path` untouched.
pub struct CsvCanonicalSink {
    path: PathBuf,
}

impl CsvCanonicalSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render records with the canonical header
pub fn render_canonical_csv(records: &[CanonicalRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(Vec::new());

    writer.write_record(Field::ALL.iter().map(|f| f.canonical_name()))?;
    for record in records {
        writer.write_record(record.cells())?;
    }

    writer
        .into_inner()
        .map_err(|e| NormalizeError::Io(e.into_error()))
}

impl CanonicalSink for CsvCanonicalSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write_all(&mut self, records: &[CanonicalRecord]) -> Result<()> {
        let bytes = render_canonical_csv(records)?;
        write_atomically(&self.path, &bytes)?;

        info!(rows = records.len(), output = %self.path.display(), "Wrote canonical dataset");
        Ok(())
    }
}
