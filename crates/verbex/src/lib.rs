pub mod config;
pub mod report;

pub use config::Config;
pub use report::{RunSummary, run, write_pair, write_report};
