//! Meilisearch implementation of the search transport.
//!
//! This module provides a concrete implementation of `SearchTransport`
//! using Meilisearch as the backend, together with the builders that
//! translate predicates and ordering into its query syntax.

mod client;
mod index_settings;
pub mod queries;

pub use client::MeilisearchClient;
pub use index_settings::{configure_soft_delete_filter, FILTERABLE_ATTRIBUTES};
