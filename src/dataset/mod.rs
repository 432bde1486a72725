//! Column-oriented in-memory dataset.
//!
//! A [`Dataset`] is an ordered list of [`Column`]s of equal length. The type parameter picks
//! how text cells are stored:
//!
//! - [`BorrowedDataset<'a>`] (`Dataset<&'a str>`): zero-copy slices of the attached buffer.
//!   The buffer must outlive the dataset, and the compiler enforces it:
//!
//! ```compile_fail
//! use tabular_data::dataset::BorrowedDataset;
//! use tabular_data::ingestion::AttachOptions;
//!
//! let ds = {
//!     let buffer = String::from("name\nAda\n");
//!     BorrowedDataset::attach(&buffer, &AttachOptions::default()).unwrap()
//! }; // `buffer` dropped here while `ds` still borrows it
//! println!("{}", ds.rows());
//! ```
//!
//! - [`OwnedDataset`] (`Dataset<String>`): text is copied out of the buffer, so the dataset
//!   can outlive it:
//!
//! ```rust
//! use tabular_data::dataset::OwnedDataset;
//! use tabular_data::ingestion::AttachOptions;
//!
//! let ds = {
//!     let buffer = String::from("name\nAda\n");
//!     OwnedDataset::attach(&buffer, &AttachOptions::default()).unwrap()
//! };
//! assert_eq!(ds.rows(), 1);
//! ```
//!
//! Mutating operations take `&mut self`, so a dataset shared by reference (including across
//! threads) is read-only.

mod column;
mod row;
mod serialize;

use crate::error::{DataError, DataResult};
use crate::ingestion::csv::{self, AttachOptions};
use crate::types::{CellScalar, CellValue, TextStorage, TypeTag};

pub use column::ColumnView;
pub use row::{Row, Rows};

/// Dataset whose text cells borrow from the attached buffer.
pub type BorrowedDataset<'a> = Dataset<&'a str>;

/// Dataset whose text cells own their data.
pub type OwnedDataset = Dataset<String>;

/// A named, typed column of cells.
#[derive(Debug, Clone)]
pub struct Column<S> {
    name: String,
    column_type: TypeTag,
    values: Vec<CellValue<S>>,
}

impl<S> Column<S> {
    /// Create a column. `column_type` is the declared type of its non-null cells.
    pub fn new(name: impl Into<String>, column_type: TypeTag, values: Vec<CellValue<S>>) -> Self {
        Self {
            name: name.into(),
            column_type,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> TypeTag {
        self.column_type
    }

    pub fn values(&self) -> &[CellValue<S>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: AsRef<str>> PartialEq for Column<S> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.column_type == other.column_type
            && self.values.len() == other.values.len()
            && self.values.iter().zip(&other.values).all(|(a, b)| a == b)
    }
}

/// In-memory tabular dataset, stored column by column.
///
/// Two datasets are equal when they hold the same columns with the same cells; text compares by
/// unescaped content.
#[derive(Debug, Clone)]
pub struct Dataset<S = String> {
    columns: Vec<Column<S>>,
}

impl<S: AsRef<str>> PartialEq for Dataset<S> {
    fn eq(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self.columns.iter().zip(&other.columns).all(|(a, b)| a == b)
    }
}

impl<S> Default for Dataset<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S: TextStorage<'a>> Dataset<S> {
    /// Ingest CSV text. See [`crate::ingestion::csv::attach`].
    pub fn attach(input: &'a str, options: &AttachOptions) -> DataResult<Self> {
        csv::attach(input, options)
    }

    /// Ingest CSV bytes, validating UTF-8 first.
    pub fn attach_bytes(input: &'a [u8], options: &AttachOptions) -> DataResult<Self> {
        csv::attach_bytes(input, options)
    }
}

impl<S> Dataset<S> {
    /// Create an empty dataset with no columns.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Build a dataset from columns.
    ///
    /// # Panics
    ///
    /// Panics if the columns do not all have the same length.
    pub fn from_columns(columns: Vec<Column<S>>) -> Self {
        if let Some(first) = columns.first() {
            let rows = first.len();
            assert!(
                columns.iter().all(|c| c.len() == rows),
                "all columns must have the same length"
            );
        }
        Self { columns }
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (0 when there are no columns).
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// Declared type of a column, if the index is valid.
    pub fn column_type(&self, column: usize) -> Option<TypeTag> {
        self.columns.get(column).map(Column::column_type)
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Index of the column whose header text is exactly `name`.
    pub fn column_index(&self, name: &str) -> DataResult<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DataError::UnknownColumn {
                name: name.to_owned(),
            })
    }

    /// All cells of a column.
    pub fn cells(&self, column: usize) -> Option<&[CellValue<S>]> {
        self.columns.get(column).map(Column::values)
    }

    /// The cell at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue<S>> {
        self.columns.get(column)?.values.get(row)
    }

    /// The columns themselves.
    pub fn column_data(&self) -> &[Column<S>] {
        &self.columns
    }

    /// A read-only view of one row.
    pub fn row(&self, row: usize) -> Option<Row<'_, S>> {
        (row < self.rows()).then(|| Row::new(self, row))
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> Rows<'_, S> {
        Rows::new(self)
    }

    /// A read-only view of one column, giving access to its statistics.
    pub fn column(&self, column: usize) -> Option<ColumnView<'_, S>> {
        (column < self.columns()).then(|| ColumnView::new(self, column))
    }

    /// A read-only view of the column named `name`.
    pub fn column_by_name(&self, name: &str) -> DataResult<ColumnView<'_, S>> {
        let index = self.column_index(name)?;
        Ok(ColumnView::new(self, index))
    }

    /// Remove a column; later columns shift down by one.
    pub fn erase_column(&mut self, column: usize) -> DataResult<Column<S>> {
        self.check_column(column)?;
        Ok(self.columns.remove(column))
    }

    pub fn swap_columns(&mut self, first: usize, second: usize) -> DataResult<()> {
        self.check_column(first)?;
        self.check_column(second)?;
        self.columns.swap(first, second);
        Ok(())
    }

    /// Set every cell of a column to null. The column and its declared type remain.
    pub fn clear_column(&mut self, column: usize) -> DataResult<()> {
        self.check_column(column)?;
        for value in &mut self.columns[column].values {
            *value = CellValue::Null;
        }
        Ok(())
    }

    fn check_column(&self, column: usize) -> DataResult<()> {
        if column < self.columns.len() {
            Ok(())
        } else {
            Err(DataError::ColumnOutOfRange {
                index: column,
                columns: self.columns.len(),
            })
        }
    }

    fn check_row(&self, row: usize) -> DataResult<()> {
        if row < self.rows() {
            Ok(())
        } else {
            Err(DataError::RowOutOfRange {
                index: row,
                rows: self.rows(),
            })
        }
    }
}

impl<S: AsRef<str>> Dataset<S> {
    /// Type of the value stored at `(row, column)`.
    pub fn type_at(&self, row: usize, column: usize) -> Option<TypeTag> {
        self.cell(row, column).map(CellValue::type_tag)
    }

    /// Typed read of one cell. `Ok(None)` for a null cell; [`DataError::TypeMismatch`] if the
    /// cell holds another type.
    pub fn value_at<T: CellScalar>(&self, row: usize, column: usize) -> DataResult<Option<T>> {
        self.check_column(column)?;
        self.check_row(row)?;
        T::try_from_cell(&self.columns[column].values[row])
    }

    /// Copy a column's values into a homogeneous vector.
    ///
    /// With `include_nulls`, null cells become `T::default()` (`0`, `0.0`, `""`); otherwise
    /// they are skipped.
    pub fn extract_column<T: CellScalar>(&self, column: usize, include_nulls: bool) -> DataResult<Vec<T>> {
        self.check_column(column)?;
        let values = &self.columns[column].values;
        let mut out = Vec::with_capacity(values.len());
        for cell in values {
            match T::try_from_cell(cell)? {
                Some(v) => out.push(v),
                None if include_nulls => out.push(T::default()),
                None => {}
            }
        }
        Ok(out)
    }

    /// Extract a column (nulls included as defaults), then erase it.
    pub fn detach_column<T: CellScalar>(&mut self, column: usize) -> DataResult<Vec<T>> {
        let values = self.extract_column(column, true)?;
        self.columns.remove(column);
        Ok(values)
    }

    /// Copy every text cell so the dataset no longer borrows its input.
    pub fn into_owned(self) -> OwnedDataset {
        let columns = self
            .columns
            .into_iter()
            .map(|c| Column {
                values: c.values.iter().map(CellValue::to_owned_cell).collect(),
                name: c.name,
                column_type: c.column_type,
            })
            .collect();
        Dataset { columns }
    }
}
