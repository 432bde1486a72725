//! Statistics and profiling.
//!
//! The functions in [`stats`] work on plain slices. Most callers reach them through
//! [`crate::dataset::ColumnView`], which extracts a column's non-null values first.
//!
//! ## Example: column statistics
//!
//! ```rust
//! use tabular_data::dataset::OwnedDataset;
//! use tabular_data::ingestion::AttachOptions;
//!
//! let ds = OwnedDataset::attach(
//!     "id,score\n1,10.0\n2,20.0\n3,\n",
//!     &AttachOptions::default(),
//! )
//! .unwrap();
//!
//! let score = ds.column_by_name("score").unwrap();
//! // Nulls are ignored.
//! assert_eq!(score.mean().unwrap(), 15.0);
//! assert_eq!(score.count_null(), 1);
//!
//! let summary = tabular_data::processing::profile(&ds);
//! assert_eq!(summary.columns[0].max, Some(3.0));
//! ```

pub mod profile;
pub mod stats;

pub use profile::{profile, ColumnProfile, DatasetProfile};
pub use stats::Numeric;
