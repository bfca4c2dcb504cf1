//! Configuration handling for Driftnet
//!
//! Configuration comes from CLI flags, optionally layered over a TOML
//! config file, and is validated before any network work starts.

mod parser;
mod types;
mod validation;

pub use parser::load_file_config;
pub use types::{CrawlConfig, FileConfig, FilePartition, PartitionConfig};
pub use validation::validate;
