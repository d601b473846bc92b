// Pipeline processing: text rules, deduplication and dataset profiling

pub mod dedup;
pub mod overview;
pub mod text;
