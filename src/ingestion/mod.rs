//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`attach`] (or [`crate::dataset::Dataset::attach`]) on an in-memory
//! buffer, or [`ingest_from_path`] to read a file first. Either way:
//!
//! - fields are scanned by the [`tokenizer`] and typed as they are read
//! - each column's type is widened to string on the first conflicting value
//! - the outcome is optionally reported to an [`IngestionObserver`]

pub mod csv;
pub mod observability;
pub mod tokenizer;

pub use self::csv::{attach, attach_bytes, ingest_from_path, AttachOptions};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use tokenizer::{read_field, FieldSlice, Tokenizer};
