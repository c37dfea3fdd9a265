pub mod details;
pub mod search;
pub mod text;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use details::parse_course_details;
pub use search::parse_search_results;
pub use text::{extract_credits, normalize_whitespace};

/// A page came back but lacked the structure we scrape.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no course results table on the page")]
    NoResultsTable,

    #[error("no restriction, equivalent or contact section on the page")]
    NoDetailSection,
}
