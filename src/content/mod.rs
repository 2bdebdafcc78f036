//! Doctrine content: entity builders, corpus loading, integrity, facets.

pub mod corpus;
pub mod facets;
pub mod integrity;
pub mod loader;
pub mod module;
pub mod query;
pub mod reference;
pub mod ship;

pub use corpus::Corpus;
pub use loader::{ContentLoader, CorpusSources, Document, LoadOutcome, load_corpus};
