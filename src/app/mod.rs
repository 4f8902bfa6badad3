pub mod ports;
pub mod normalize_use_case;
pub mod summary_use_case;
