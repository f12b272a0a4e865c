//! # Search Sync Repository
//!
//! This crate provides the typed transport to the search engine. It includes
//! definitions for errors, the transport interface, the query translators and
//! a concrete implementation for Meilisearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod meilisearch;

pub use config::MeilisearchConfig;
pub use errors::SearchError;
pub use interfaces::{IndexHandle, SearchTransport};
pub use meilisearch::MeilisearchClient;
