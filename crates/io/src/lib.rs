// Source, CSV and XLSX I/O around the leaderboard engine

pub mod csv;
pub mod ingest;
pub mod source;
pub mod xlsx;

pub use ingest::Ingestor;
pub use source::{DataSource, FileSource, HttpSource, StaticSource};
