//! Finds catalog courses matching a set of topic keywords and writes them,
//! with restrictions, equivalents, prerequisites and contacts, to a CSV sheet.

pub mod config;
pub mod courses;
pub mod extractor;
pub mod fetcher;
pub mod progress;
pub mod report;
pub mod runner;

pub use config::Config;
pub use progress::ProgressSink;
pub use runner::{RunError, RunSummary, run};
