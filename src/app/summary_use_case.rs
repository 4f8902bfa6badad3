use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::infra::csv_source::read_canonical_records;
use crate::pipeline::processing::summary::{summarize, SummaryFilter, SurveySummary};

/// Compute descriptive statistics for the canonical dataset at `path`
pub fn summarize_file(path: &Path, filter: &SummaryFilter) -> Result<SurveySummary> {
    let records = read_canonical_records(path)?;
    let summary = summarize(&records, filter);
    info!(
        total = records.len(),
        selected = summary.respondents,
        estado = ?filter.estado,
        sexo = ?filter.sexo,
        "Summary computed"
    );
    Ok(summary)
}
