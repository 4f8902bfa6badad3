// Survey processing pipeline

pub mod processing;

// Re-export key types from each stage
pub use processing::normalize::{Normalizer, SurveyNormalizer};
pub use processing::quality_gate::{QualityGate, QualityReport};
pub use processing::summary::{SummaryFilter, SurveySummary};
