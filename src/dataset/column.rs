use crate::error::{DataError, DataResult};
use crate::processing::stats::{self, Numeric};
use crate::types::{CellScalar, CellValue, TypeTag};

use super::Dataset;

/// Read-only view of one column of a [`Dataset`].
///
/// Statistics ignore null cells. They are only defined for numeric columns (an all-null
/// column counts as numeric with no data); a string column fails with
/// [`DataError::TypeMismatch`].
pub struct ColumnView<'d, S> {
    ds: &'d Dataset<S>,
    index: usize,
}

impl<S> Clone for ColumnView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ColumnView<'_, S> {}

/// Non-null values of a numeric column, in their stored width.
enum NumericValues {
    Integers(Vec<i64>),
    Floats(Vec<f64>),
}

impl<'d, S> ColumnView<'d, S> {
    pub(super) fn new(ds: &'d Dataset<S>, index: usize) -> Self {
        Self { ds, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'d str {
        &self.ds.columns[self.index].name
    }

    pub fn column_type(&self) -> TypeTag {
        self.ds.columns[self.index].column_type
    }

    pub fn is_integer(&self) -> bool {
        self.column_type() == TypeTag::Integer
    }

    pub fn is_float(&self) -> bool {
        self.column_type() == TypeTag::Float
    }

    pub fn is_string(&self) -> bool {
        self.column_type() == TypeTag::String
    }

    pub fn is_null(&self) -> bool {
        self.column_type() == TypeTag::Null
    }

    pub fn cells(&self) -> &'d [CellValue<S>] {
        &self.ds.columns[self.index].values
    }

    /// Number of cells, nulls included.
    pub fn size(&self) -> usize {
        self.cells().len()
    }

    /// Number of non-null cells.
    pub fn count(&self) -> usize {
        self.cells().iter().filter(|c| !matches!(c, CellValue::Null)).count()
    }

    pub fn count_null(&self) -> usize {
        self.size() - self.count()
    }
}

impl<S: AsRef<str>> ColumnView<'_, S> {
    /// Copy the column's values; see [`Dataset::extract_column`].
    pub fn extract<T: CellScalar>(&self, include_nulls: bool) -> DataResult<Vec<T>> {
        self.ds.extract_column(self.index, include_nulls)
    }

    /// Sum of the column's values; with `include_nulls` nulls add `T::default()`.
    pub fn sum<T: CellScalar + Numeric>(&self, include_nulls: bool) -> DataResult<T> {
        self.check_numeric()?;
        let values = self.extract::<T>(include_nulls)?;
        stats::sum(&values)
    }

    pub fn mean(&self) -> DataResult<f64> {
        match self.numeric_values()? {
            NumericValues::Integers(v) => stats::mean(&v),
            NumericValues::Floats(v) => stats::mean(&v),
        }
    }

    /// Lower median, widened to `f64`.
    pub fn median(&self) -> DataResult<f64> {
        match self.numeric_values()? {
            NumericValues::Integers(v) => stats::median(v).map(Numeric::to_f64),
            NumericValues::Floats(v) => stats::median(v),
        }
    }

    /// Most frequent value, widened to `f64`.
    pub fn mode(&self) -> DataResult<f64> {
        match self.numeric_values()? {
            NumericValues::Integers(v) => stats::mode(&v).map(Numeric::to_f64),
            NumericValues::Floats(v) => stats::mode(&v),
        }
    }

    pub fn standard_deviation(&self) -> DataResult<f64> {
        match self.numeric_values()? {
            NumericValues::Integers(v) => stats::standard_deviation(&v),
            NumericValues::Floats(v) => stats::standard_deviation(&v),
        }
    }

    /// Smallest non-null value, read as `T`.
    pub fn min<T: CellScalar + Numeric>(&self) -> DataResult<T> {
        self.check_numeric()?;
        stats::min(&self.extract::<T>(false)?)
    }

    /// Largest non-null value, read as `T`.
    pub fn max<T: CellScalar + Numeric>(&self) -> DataResult<T> {
        self.check_numeric()?;
        stats::max(&self.extract::<T>(false)?)
    }

    /// Number of distinct non-null values.
    pub fn count_unique(&self) -> DataResult<usize> {
        Ok(match self.numeric_values()? {
            NumericValues::Integers(v) => stats::count_unique(&v),
            NumericValues::Floats(v) => stats::count_unique(&v),
        })
    }

    fn check_numeric(&self) -> DataResult<()> {
        match self.column_type() {
            TypeTag::String => Err(DataError::TypeMismatch {
                expected: "numeric",
                found: TypeTag::String,
            }),
            _ => Ok(()),
        }
    }

    fn numeric_values(&self) -> DataResult<NumericValues> {
        match self.column_type() {
            TypeTag::Integer => self.extract(false).map(NumericValues::Integers),
            TypeTag::Float => self.extract(false).map(NumericValues::Floats),
            TypeTag::Null => Ok(NumericValues::Floats(Vec::new())),
            TypeTag::String => Err(DataError::TypeMismatch {
                expected: "numeric",
                found: TypeTag::String,
            }),
        }
    }
}
