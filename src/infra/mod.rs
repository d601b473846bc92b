// Infrastructure adapters: file formats and file-backed ports

pub mod csv_table;
pub mod file_adapter;
pub mod format;
pub mod json_records;

pub use file_adapter::{read_table, FileRecordSink, FileRecordSource, LoadedRecordSource};
pub use format::DataFormat;
