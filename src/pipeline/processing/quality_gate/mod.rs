use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Field, RawSurveyRow};
use crate::error::Result;
use crate::pipeline::processing::normalize::{NormalizedRow, RecodeOutcome};

/// Types of quality issues that can be detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssueType {
    /// Code outside the field's table, carried through unchanged
    UnmappedCode,
    /// Code outside the field's table, replaced by the fallback label
    UnrecognizedCode,
    /// No answer in a binary field that has no imputation rule
    Missing,
}

/// Severity levels for quality issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualitySeverity {
    Info,
    Warning,
}

/// Individual quality issue found during assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityIssue {
    /// 1-based data row
    pub row: usize,
    pub field: Field,
    pub value: String,
    pub issue_type: QualityIssueType,
    pub severity: QualitySeverity,
}

/// Per-field tally of recoding outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldQuality {
    pub mapped: usize,
    pub already_labeled: usize,
    pub imputed: usize,
    pub fallback: usize,
    pub unmapped: usize,
    pub missing: usize,
    pub passed_through: usize,
}

impl FieldQuality {
    fn record(&mut self, outcome: RecodeOutcome) {
        let slot = match outcome {
            RecodeOutcome::Mapped => &mut self.mapped,
            RecodeOutcome::AlreadyLabeled => &mut self.already_labeled,
            RecodeOutcome::Imputed => &mut self.imputed,
            RecodeOutcome::Fallback => &mut self.fallback,
            RecodeOutcome::Unmapped => &mut self.unmapped,
            RecodeOutcome::Missing => &mut self.missing,
            RecodeOutcome::PassedThrough => &mut self.passed_through,
        };
        *slot += 1;
    }
}

/// Data-quality summary of one normalization run. Never alters the dataset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityReport {
    pub rows: usize,
    pub fields: BTreeMap<Field, FieldQuality>,
    /// First issues encountered, capped by configuration
    pub samples: Vec<QualityIssue>,
    /// Issues seen beyond the sample cap
    pub samples_dropped: usize,
}

impl QualityReport {
    pub fn field(&self, field: Field) -> FieldQuality {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    pub fn total_unmapped(&self) -> usize {
        self.fields.values().map(|q| q.unmapped).sum()
    }

    pub fn total_imputed(&self) -> usize {
        self.fields.values().map(|q| q.imputed).sum()
    }

    pub fn log_summary(&self) {
        info!(
            rows = self.rows,
            imputed = self.total_imputed(),
            unmapped = self.total_unmapped(),
            "Quality assessment complete"
        );
        for (field, quality) in &self.fields {
            if quality.unmapped > 0 {
                warn!(
                    field = %field,
                    count = quality.unmapped,
                    "values outside the code table were passed through unchanged"
                );
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Tallies recoding outcomes row by row
pub struct QualityGate {
    report: QualityReport,
    max_samples: usize,
}

impl QualityGate {
    pub fn new(max_samples: usize) -> Self {
        let fields = Field::ALL
            .iter()
            .map(|f| (*f, FieldQuality::default()))
            .collect();
        Self {
            report: QualityReport {
                fields,
                ..QualityReport::default()
            },
            max_samples,
        }
    }

    /// Record the outcomes of one normalized row
    pub fn assess(&mut self, row_number: usize, raw: &RawSurveyRow, normalized: &NormalizedRow) {
        self.report.rows += 1;

        for field in Field::ALL {
            let outcome = normalized.outcome(field);
            self.report
                .fields
                .entry(field)
                .or_default()
                .record(outcome);

            let issue = match (outcome, raw.get(field)) {
                (RecodeOutcome::Unmapped, Some(value)) => Some((
                    value,
                    QualityIssueType::UnmappedCode,
                    QualitySeverity::Warning,
                )),
                (RecodeOutcome::Fallback, Some(value)) => Some((
                    value,
                    QualityIssueType::UnrecognizedCode,
                    QualitySeverity::Info,
                )),
                (RecodeOutcome::Missing, None) if field.spec().kind.is_binary() => {
                    Some(("", QualityIssueType::Missing, QualitySeverity::Info))
                }
                _ => None,
            };

            if let Some((value, issue_type, severity)) = issue {
                if self.report.samples.len() < self.max_samples {
                    self.report.samples.push(QualityIssue {
                        row: row_number,
                        field,
                        value: value.to_string(),
                        issue_type,
                        severity,
                    });
                } else {
                    self.report.samples_dropped += 1;
                }
            }
        }
    }

    pub fn finish(self) -> QualityReport {
        self.report
    }
}
