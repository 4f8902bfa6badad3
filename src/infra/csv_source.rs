use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::app::ports::SurveySource;
use crate::constants::DELIMITER;
use crate::domain::{CanonicalRecord, CanonicalValue, Field, FieldSpec, RawSurveyRow, FIELD_COUNT};
use crate::error::{NormalizeError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Column positions of every declared field within an input header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    indexes: [usize; FIELD_COUNT],
}

impl HeaderLayout {
    /// Locate each field in `headers` by the name `name_of` selects.
    ///
    /// Every missing column is reported at once. Extra columns are ignored;
    /// for duplicated names the first occurrence wins.
    pub fn resolve(
        headers: &StringRecord,
        name_of: impl Fn(&FieldSpec) -> &'static str,
    ) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h })
            .map(str::trim)
            .collect();

        let mut indexes = [0usize; FIELD_COUNT];
        let mut missing = Vec::new();
        for field in Field::ALL {
            let wanted = name_of(field.spec());
            match names.iter().position(|n| *n == wanted) {
                Some(idx) => indexes[field.index()] = idx,
                None => missing.push(wanted.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { indexes })
        } else {
            Err(NormalizeError::MissingColumns(missing))
        }
    }

    pub fn cell<'r>(&self, record: &'r StringRecord, field: Field) -> &'r str {
        record.get(self.indexes[field.index()]).unwrap_or("")
    }
}

fn open_reader(path: &Path) -> Result<Reader<File>> {
    if !path.exists() {
        return Err(NormalizeError::InputNotFound(path.to_path_buf()));
    }
    let reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_path(path)?;
    Ok(reader)
}

/// Raw survey extract read from a comma-separated UTF-8 file
pub struct CsvSurveySource {
    path: PathBuf,
    reader: Reader<File>,
    layout: HeaderLayout,
}

impl CsvSurveySource {
    /// Open `path` and validate its header against the declared source keys
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = reader.headers()?.clone();
        let layout = HeaderLayout::resolve(&headers, |spec| spec.source_key)?;
        debug!(columns = headers.len(), "Raw header validated");

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            layout,
        })
    }
}

impl SurveySource for CsvSurveySource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_rows(&mut self) -> Result<Vec<RawSurveyRow>> {
        let mut rows = Vec::new();
        for result in self.reader.records() {
            let record = result?;
            let mut row = RawSurveyRow::default();
            for field in Field::ALL {
                row.set(field, self.layout.cell(&record, field));
            }
            rows.push(row);
        }
        info!(rows = rows.len(), source = %self.path.display(), "Read raw survey rows");
        Ok(rows)
    }
}

/// Read a canonical dataset, requiring every canonical column
pub fn read_canonical_records(path: &Path) -> Result<Vec<CanonicalRecord>> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    let layout = HeaderLayout::resolve(&headers, |spec| spec.canonical_name)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut record = CanonicalRecord::default();
        for field in Field::ALL {
            let cell = layout.cell(&row, field).trim();
            let value = if cell.is_empty() {
                CanonicalValue::Missing
            } else {
                CanonicalValue::Text(cell.to_string())
            };
            record.set(field, value);
        }
        records.push(record);
    }
    info!(rows = records.len(), source = %path.display(), "Read canonical records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_header() -> Vec<&'static str> {
        Field::ALL.iter().map(|f| f.source_key()).collect()
    }

    #[test]
    fn test_resolve_reordered_header_with_extras() {
        let mut names = source_header();
        names.reverse();
        names.insert(5, "V1013");
        let headers = StringRecord::from(names.clone());

        let layout = HeaderLayout::resolve(&headers, |spec| spec.source_key).unwrap();
        let record = StringRecord::from(names.clone());
        for field in Field::ALL {
            assert_eq!(layout.cell(&record, field), field.source_key());
        }
    }

    #[test]
    fn test_resolve_reports_every_missing_column() {
        let names: Vec<_> = source_header()
            .into_iter()
            .filter(|n| *n != "C008" && *n != "UF")
            .collect();
        let err = HeaderLayout::resolve(&StringRecord::from(names), |spec| spec.source_key)
            .unwrap_err();
        match err {
            NormalizeError::MissingColumns(missing) => assert_eq!(missing, vec!["UF", "C008"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_strips_bom_and_whitespace() {
        let mut names: Vec<String> = source_header().iter().map(|n| format!(" {n} ")).collect();
        names[0] = format!("\u{feff}{}", source_header()[0]);
        let headers = StringRecord::from(names);
        assert!(HeaderLayout::resolve(&headers, |spec| spec.source_key).is_ok());
    }

    #[test]
    fn test_open_missing_file() {
        let err = CsvSurveySource::open(Path::new("/nonexistent/raw.csv"))
            .err()
            .expect("open should fail");
        assert!(matches!(err, NormalizeError::InputNotFound(_)));
    }
}
