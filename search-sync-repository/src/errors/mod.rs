//! Error types for the search sync repository.

mod search_error;

pub use search_error::SearchError;
