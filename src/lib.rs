pub mod config;
pub mod output;
pub mod roster;
pub mod scoring;
pub mod stderr_buffer;
pub mod storage;
pub mod summary;
