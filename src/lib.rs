pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

// Domain data shapes shared across layers
pub mod domain;

pub use app::normalize_use_case::{normalize_file, NormalizeOutcome, NormalizeUseCase};
pub use app::summary_use_case::summarize_file;
pub use config::PipelineConfig;
pub use error::{NormalizeError, Result};
