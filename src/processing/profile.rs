//! Per-column summaries of a dataset, serializable to JSON.

use serde::Serialize;

use crate::dataset::{ColumnView, Dataset};
use crate::error::DataResult;
use crate::types::TypeTag;

/// Summary of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

/// Summary of one column.
///
/// Statistics are `None` for string columns, and for numeric columns where the statistic is
/// undefined (no non-null values, or no repeated value for `mode`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: TypeTag,
    pub count: usize,
    pub null_count: usize,
    pub unique: Option<usize>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DatasetProfile {
    pub fn to_json_pretty(&self) -> DataResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The profile of the column named `name`.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Profile every column of `ds`.
pub fn profile<S: AsRef<str>>(ds: &Dataset<S>) -> DatasetProfile {
    let columns = (0..ds.columns())
        .filter_map(|i| ds.column(i))
        .map(profile_column)
        .collect();
    DatasetProfile {
        rows: ds.rows(),
        columns,
    }
}

fn profile_column<S: AsRef<str>>(col: ColumnView<'_, S>) -> ColumnProfile {
    let numeric = col.column_type() != TypeTag::String;
    let (min, max) = match col.column_type() {
        TypeTag::Integer => (
            col.min::<i64>().ok().map(|v| v as f64),
            col.max::<i64>().ok().map(|v| v as f64),
        ),
        TypeTag::Float => (col.min::<f64>().ok(), col.max::<f64>().ok()),
        TypeTag::String | TypeTag::Null => (None, None),
    };

    ColumnProfile {
        name: col.name().to_owned(),
        column_type: col.column_type(),
        count: col.count(),
        null_count: col.count_null(),
        unique: numeric.then(|| col.count_unique().ok()).flatten(),
        mean: col.mean().ok(),
        median: col.median().ok(),
        mode: col.mode().ok(),
        std_dev: col.standard_deviation().ok(),
        min,
        max,
    }
}
