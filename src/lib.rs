//! `tabular-data` attaches CSV text to an in-memory, column-oriented [`Dataset`] and computes
//! statistics over its columns.
//!
//! The primary entrypoint is [`Dataset::attach`], which scans the buffer once, infers each
//! field's type and widens each column's type as it goes.
//!
//! ## Type inference
//!
//! Every field is typed on its own, then folded into its column's type:
//!
//! - [`TypeTag::Integer`]: optional sign followed by digits (`-42`, `+7`)
//! - [`TypeTag::Float`]: optional sign, digits and exactly one `.` (`3.14`, `.5`)
//! - [`TypeTag::String`]: anything else, including a lone sign or period
//! - [`TypeTag::Null`]: empty fields, quoted (`""`) or not
//!
//! Nulls never change a column's type. The first non-null value sets it, and any later value of
//! a different type widens the column to string for good.
//!
//! ## Storage
//!
//! [`BorrowedDataset`] keeps text cells as slices of the input buffer (zero-copy, and the
//! compiler ties the dataset's lifetime to the buffer). [`OwnedDataset`] copies them.
//!
//! ## Quick example
//!
//! ```rust
//! use tabular_data::{BorrowedDataset, TypeTag};
//! use tabular_data::ingestion::AttachOptions;
//!
//! # fn main() -> Result<(), tabular_data::DataError> {
//! let csv = "id,name,score\n1,\"Ada\",9.5\n2,\"Grace\",7.25\n3,,8.0\n";
//! let ds = BorrowedDataset::attach(csv, &AttachOptions::default())?;
//!
//! assert_eq!(ds.rows(), 3);
//! assert_eq!(ds.column_type(2), Some(TypeTag::Float));
//! assert_eq!(ds.value_at::<String>(1, 1)?.as_deref(), Some("Grace"));
//!
//! let score = ds.column_by_name("score")?;
//! assert_eq!(score.max::<f64>()?, 9.5);
//!
//! // Writing it out gives CSV that attaches to an equal dataset.
//! let text = ds.to_csv_string()?;
//! assert_eq!(BorrowedDataset::attach(&text, &AttachOptions::default())?, ds);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: tokenizer, attach entrypoints and observers
//! - [`dataset`]: the column store, row and column views, CSV output
//! - [`processing`]: statistics and profiling
//! - [`types`]: type tags, cells and storage strategies
//! - [`error`]: the crate's error type

pub mod dataset;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use dataset::{BorrowedDataset, Dataset, OwnedDataset};
pub use error::{DataError, DataResult};
pub use types::{CellValue, TypeTag};
