use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::ports::{CanonicalSink, SurveySource};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::infra::atomic_file::write_atomically;
use crate::infra::csv_sink::CsvCanonicalSink;
use crate::infra::csv_source::CsvSurveySource;
use crate::pipeline::processing::normalize::{Normalizer, SurveyNormalizer};
use crate::pipeline::processing::quality_gate::{QualityGate, QualityReport};

/// Result of a completed normalization run
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub rows: usize,
    pub destination: String,
    pub report: QualityReport,
}

impl NormalizeOutcome {
    /// The one-line message printed after a successful run
    pub fn confirmation(&self) -> String {
        format!(
            "✅ Clean file saved to {} ({} rows)",
            self.destination, self.rows
        )
    }
}

/// Use case for normalizing a raw survey extract into the canonical dataset.
///
/// All rows are normalized, and the quality report written, before the sink
/// is called, so any fatal error leaves the destination untouched.
pub struct NormalizeUseCase {
    normalizer: Box<dyn Normalizer + Send + Sync>,
    max_samples: usize,
    report_path: Option<PathBuf>,
}

impl NormalizeUseCase {
    pub fn new(normalizer: Box<dyn Normalizer + Send + Sync>, max_samples: usize) -> Self {
        Self {
            normalizer,
            max_samples,
            report_path: None,
        }
    }

    /// Also write the quality report as JSON to `path`
    pub fn with_report_path(mut self, path: Option<&Path>) -> Self {
        self.report_path = path.map(Path::to_path_buf);
        self
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            Box::new(SurveyNormalizer::from_config(config)),
            config.report.max_samples,
        )
    }

    pub fn run(
        &self,
        source: &mut dyn SurveySource,
        sink: &mut dyn CanonicalSink,
    ) -> Result<NormalizeOutcome> {
        let span = tracing::info_span!("normalize", source = %source.describe());
        let _enter = span.enter();

        let raw_rows = source.read_rows()?;

        let mut gate = QualityGate::new(self.max_samples);
        let mut records = Vec::with_capacity(raw_rows.len());
        for (i, raw) in raw_rows.iter().enumerate() {
            let row_number = i + 1;
            let normalized = self.normalizer.normalize(row_number, raw)?;
            gate.assess(row_number, raw, &normalized);
            records.push(normalized.record);
        }

        let report = gate.finish();
        report.log_summary();

        if let Some(path) = &self.report_path {
            write_atomically(path, report.to_json()?.as_bytes())?;
            info!(path = %path.display(), "Quality report written");
        }

        sink.write_all(&records)?;
        info!(rows = records.len(), destination = %sink.describe(), "Normalization finished");

        Ok(NormalizeOutcome {
            rows: records.len(),
            destination: sink.describe(),
            report,
        })
    }
}

/// Normalize the raw file at `input` into `output`.
///
/// The input header is validated before any row is read. When `report` is
/// set the quality report is written there before the dataset.
pub fn normalize_file(
    input: &Path,
    output: &Path,
    report: Option<&Path>,
    config: &PipelineConfig,
) -> Result<NormalizeOutcome> {
    let mut source = CsvSurveySource::open(input)?;
    let mut sink = CsvCanonicalSink::new(output);
    NormalizeUseCase::from_config(config)
        .with_report_path(report)
        .run(&mut source, &mut sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CanonicalRecord, Field, RawSurveyRow};
    use crate::error::NormalizeError;

    struct MockSource {
        rows: Vec<RawSurveyRow>,
    }

    impl SurveySource for MockSource {
        fn describe(&self) -> String {
            "mock".to_string()
        }

        fn read_rows(&mut self) -> Result<Vec<RawSurveyRow>> {
            Ok(std::mem::take(&mut self.rows))
        }
    }

    #[derive(Default)]
    struct MockSink {
        written: Option<Vec<CanonicalRecord>>,
    }

    impl CanonicalSink for MockSink {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn write_all(&mut self, records: &[CanonicalRecord]) -> Result<()> {
            self.written = Some(records.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_row_count_is_preserved() {
        let rows = vec![
            RawSurveyRow::default().with(Field::Estado, "SP"),
            RawSurveyRow::default(),
            RawSurveyRow::default().with(Field::SintomaFebre, "9"),
        ];
        let mut source = MockSource { rows };
        let mut sink = MockSink::default();

        let outcome = NormalizeUseCase::from_config(&PipelineConfig::default())
            .run(&mut source, &mut sink)
            .unwrap();

        assert_eq!(outcome.rows, 3);
        assert_eq!(outcome.destination, "memory");
        assert_eq!(outcome.report.total_unmapped(), 1);
        let written = sink.written.unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0].text(Field::Estado), Some("SP"));
        assert_eq!(written[2].text(Field::SintomaFebre), Some("9"));
    }

    #[test]
    fn test_rejected_value_prevents_write() {
        let config = PipelineConfig::from_toml_str("[recoding]\nunmapped = \"reject\"\n").unwrap();
        let rows = vec![
            RawSurveyRow::default().with(Field::SintomaFebre, "1"),
            RawSurveyRow::default().with(Field::TrabalhoRemoto, "3"),
        ];
        let mut source = MockSource { rows };
        let mut sink = MockSink::default();

        let err = NormalizeUseCase::from_config(&config)
            .run(&mut source, &mut sink)
            .unwrap_err();

        assert!(matches!(err, NormalizeError::UnmappedValue { row: 2, .. }));
        assert!(sink.written.is_none());
    }

    #[test]
    fn test_unwritable_report_prevents_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut source = MockSource {
            rows: vec![RawSurveyRow::default().with(Field::Estado, "SP")],
        };
        let mut sink = MockSink::default();

        let err = NormalizeUseCase::from_config(&PipelineConfig::default())
            .with_report_path(Some(temp_dir.path()))
            .run(&mut source, &mut sink)
            .unwrap_err();

        assert!(matches!(err, NormalizeError::Io(_)));
        assert!(sink.written.is_none());
    }

    #[test]
    fn test_confirmation_names_destination_and_rows() {
        let outcome = NormalizeOutcome {
            rows: 42,
            destination: "data/clean/pnad.csv".to_string(),
            report: QualityReport::default(),
        };
        assert_eq!(
            outcome.confirmation(),
            "✅ Clean file saved to data/clean/pnad.csv (42 rows)"
        );
    }
}
