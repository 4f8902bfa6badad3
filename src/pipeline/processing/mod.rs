// Pipeline processing: recoding, quality assessment, and statistics

pub mod normalize;
pub mod quality_gate;
pub mod summary;
