// File-backed adapters for the application ports

pub mod atomic_file;
pub mod csv_sink;
pub mod csv_source;
