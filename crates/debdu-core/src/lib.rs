//! Core data model for debdu: package records, the status-stanza
//! parser, and the batch query driver that builds the per-run catalog.

pub mod record;
pub mod source;

pub use record::{ParseError, PackageRecord, parse_status};
pub use source::{
    Catalog, CatalogError, DEFAULT_BATCH_SIZE, PackageSource, SourceError, load_catalog,
};
