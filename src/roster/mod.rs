pub mod import;
pub mod types;
mod wire;

pub use import::{parse_names, read_names};
pub use types::{Roster, StudentRecord};
