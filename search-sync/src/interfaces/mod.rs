//! Collaborator interfaces consumed by the sync engine.
//!
//! Entities describe themselves through `Searchable`; records are loaded back
//! through an application-provided `EntitySource`.

mod entity_source;
mod searchable;

pub use entity_source::EntitySource;
pub use searchable::Searchable;
