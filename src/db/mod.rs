pub mod initialize;
pub mod jobs;
pub mod local_storage;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod stats;
