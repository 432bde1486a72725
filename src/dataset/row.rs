use std::iter::FusedIterator;
use std::ops::Index;

use crate::error::{DataError, DataResult};
use crate::types::{CellScalar, CellValue, TypeTag};

use super::Dataset;

/// Read-only view of one row of a [`Dataset`].
pub struct Row<'d, S> {
    ds: &'d Dataset<S>,
    row: usize,
}

impl<S> Clone for Row<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Row<'_, S> {}

impl<'d, S> Row<'d, S> {
    pub(super) fn new(ds: &'d Dataset<S>, row: usize) -> Self {
        Self { ds, row }
    }

    /// Zero-based row index (the header is not a row).
    pub fn index(&self) -> usize {
        self.row
    }

    /// Number of cells, one per column.
    pub fn len(&self) -> usize {
        self.ds.columns()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, column: usize) -> Option<&'d CellValue<S>> {
        self.ds.columns.get(column)?.values.get(self.row)
    }

    pub fn get_by_name(&self, name: &str) -> DataResult<&'d CellValue<S>> {
        let column = self.ds.column_index(name)?;
        Ok(&self.ds.columns[column].values[self.row])
    }

    /// Cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = &'d CellValue<S>> + use<'d, S> {
        let row = self.row;
        self.ds.columns.iter().map(move |c| &c.values[row])
    }
}

impl<S: AsRef<str>> Row<'_, S> {
    /// Typed read; see [`Dataset::value_at`].
    pub fn value<T: CellScalar>(&self, column: usize) -> DataResult<Option<T>> {
        self.ds.value_at(self.row, column)
    }

    pub fn type_at(&self, column: usize) -> Option<TypeTag> {
        self.get(column).map(CellValue::type_tag)
    }
}

impl<S> Index<usize> for Row<'_, S> {
    type Output = CellValue<S>;

    fn index(&self, column: usize) -> &Self::Output {
        match self.ds.columns.get(column) {
            Some(c) => &c.values[self.row],
            None => panic!(
                "{}",
                DataError::ColumnOutOfRange {
                    index: column,
                    columns: self.ds.columns(),
                }
            ),
        }
    }
}

/// Iterator over the rows of a [`Dataset`], see [`Dataset::iter_rows`].
pub struct Rows<'d, S> {
    ds: &'d Dataset<S>,
    next: usize,
    end: usize,
}

impl<'d, S> Rows<'d, S> {
    pub(super) fn new(ds: &'d Dataset<S>) -> Self {
        Self {
            ds,
            next: 0,
            end: ds.rows(),
        }
    }
}

impl<'d, S> Iterator for Rows<'d, S> {
    type Item = Row<'d, S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let row = Row::new(self.ds, self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl<S> ExactSizeIterator for Rows<'_, S> {}

impl<S> FusedIterator for Rows<'_, S> {}

#[cfg(test)]
mod tests {
    use crate::dataset::OwnedDataset;
    use crate::ingestion::AttachOptions;
    use crate::types::{CellValue, TypeTag};

    fn sample() -> OwnedDataset {
        OwnedDataset::attach(
            "id,name,score\n1,\"Ada\",9.5\n2,,7.25\n3,\"Grace\",\n",
            &AttachOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn row_access_by_index_and_name() {
        let ds = sample();
        let row = ds.row(1).unwrap();
        assert_eq!(row.index(), 1);
        assert_eq!(row.len(), 3);
        assert_eq!(row[0], CellValue::Integer(2));
        assert!(row.get(1).unwrap().is_null());
        assert_eq!(row.type_at(2), Some(TypeTag::Float));
        assert_eq!(row.value::<f64>(2).unwrap(), Some(7.25));
        assert!(row.get_by_name("nope").is_err());
        assert!(row.get(3).is_none());
        assert!(ds.row(3).is_none());
    }

    #[test]
    fn rows_iterate_in_order() {
        let ds = sample();
        let rows = ds.iter_rows();
        assert_eq!(rows.len(), 3);
        let ids: Vec<i64> = rows
            .map(|r| r.value::<i64>(0).unwrap().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let last: Vec<String> = ds.row(2).unwrap().iter().map(ToString::to_string).collect();
        assert_eq!(last, vec!["3", "Grace", ""]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn indexing_past_the_last_column_panics() {
        let ds = sample();
        let row = ds.row(0).unwrap();
        let _ = &row[7];
    }
}
