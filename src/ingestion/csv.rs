//! CSV ingestion implementation.
//!
//! One sequential pass over the buffer: the tokenizer yields fields, per-column accumulators
//! fold them (tracking the widened column type), and cells are materialized once the pass
//! ends so that every cell of a column is stored under the column's final type.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::dataset::{Column, Dataset, OwnedDataset};
use crate::error::{DataError, DataResult};
use crate::types::{CellValue, TextStorage, TypeTag};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::tokenizer::{FieldSlice, Terminator, Tokenizer};

/// Options controlling how a buffer is attached.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct AttachOptions {
    /// Stop after this many data rows (the header is not counted). `0` means unbounded.
    pub max_rows: usize,
    /// Label reported to the observer (e.g. a file path). Defaults to `"<memory>"`.
    pub source: Option<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for AttachOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachOptions")
            .field("max_rows", &self.max_rows)
            .field("source", &self.source)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for AttachOptions {
    fn default() -> Self {
        Self {
            max_rows: 0,
            source: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl AttachOptions {
    /// Options that stop after `max_rows` data rows.
    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            max_rows,
            ..Default::default()
        }
    }
}

/// Attach a dataset to `input`.
///
/// The storage strategy is chosen by `S`: `&'a str` keeps zero-copy references into `input`,
/// `String` copies text out of it.
///
/// When an observer is configured, this function reports `on_success` with row/column counts,
/// or `on_failure` (and `on_alert` at or above `options.alert_at_or_above`) on error.
pub fn attach<'a, S>(input: &'a str, options: &AttachOptions) -> DataResult<Dataset<S>>
where
    S: TextStorage<'a>,
{
    let result = parse(input, options.max_rows);
    report(options, input.len(), &result);
    result
}

/// Attach a dataset to raw bytes, validating them as UTF-8 first.
pub fn attach_bytes<'a, S>(input: &'a [u8], options: &AttachOptions) -> DataResult<Dataset<S>>
where
    S: TextStorage<'a>,
{
    let result = std::str::from_utf8(input)
        .map_err(|e| DataError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })
        .and_then(|text| parse(text, options.max_rows));
    report(options, input.len(), &result);
    result
}

/// Read a file into memory and attach an owning dataset to it.
///
/// The file buffer is released on return; the dataset holds copies of its text.
pub fn ingest_from_path(path: impl AsRef<Path>, options: &AttachOptions) -> DataResult<OwnedDataset> {
    let path = path.as_ref();
    let mut options = options.clone();
    if options.source.is_none() {
        options.source = Some(path.display().to_string());
    }

    match std::fs::read(path) {
        Ok(bytes) => attach_bytes(&bytes, &options),
        Err(e) => {
            let result = Err(DataError::Io(e));
            report(&options, 0, &result);
            result
        }
    }
}

fn report<S>(options: &AttachOptions, bytes: usize, result: &DataResult<Dataset<S>>) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    let ctx = IngestionContext {
        source: options
            .source
            .clone()
            .unwrap_or_else(|| "<memory>".to_string()),
        bytes,
    };
    match result {
        Ok(ds) => obs.on_success(
            &ctx,
            IngestionStats {
                rows: ds.rows(),
                columns: ds.columns(),
            },
        ),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(&ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(&ctx, sev, e);
            }
        }
    }
}

fn severity_for_error(e: &DataError) -> IngestionSeverity {
    match e {
        DataError::Io(_) => IngestionSeverity::Critical,
        DataError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        _ => IngestionSeverity::Error,
    }
}

/// One step of the column type fold.
///
/// Nulls never change the type; the first non-null tag sets it; any later tag that differs
/// widens the column to [`TypeTag::String`] for good.
pub fn widen(current: Option<TypeTag>, observed: TypeTag) -> Option<TypeTag> {
    match (current, observed) {
        (current, TypeTag::Null) => current,
        (None, observed) => Some(observed),
        (Some(current), observed) if current == observed => Some(current),
        (Some(_), _) => Some(TypeTag::String),
    }
}

/// The tag a field contributes to its column's type.
///
/// A numeric field that has no finite `i64`/`f64` value (an integer past the 64-bit range, a
/// float that parses to infinity) is kept as text, so its column widens to string.
fn storable_tag(field: &FieldSlice<'_>) -> TypeTag {
    match field.tag() {
        TypeTag::Integer if field.raw().parse::<i64>().is_err() => TypeTag::String,
        TypeTag::Float if !field.raw().parse::<f64>().is_ok_and(f64::is_finite) => TypeTag::String,
        tag => tag,
    }
}

/// Per-column state carried through the ingestion pass.
struct ColumnAccumulator<'a> {
    name: String,
    column_type: Option<TypeTag>,
    fields: Vec<FieldSlice<'a>>,
}

impl<'a> ColumnAccumulator<'a> {
    fn new(name: String) -> Self {
        Self {
            name,
            column_type: None,
            fields: Vec::new(),
        }
    }

    fn push(&mut self, field: FieldSlice<'a>, row: usize) {
        let widened = widen(self.column_type, storable_tag(&field));
        if widened != self.column_type && self.column_type.is_some() {
            tracing::trace!(
                column = %self.name,
                from = ?self.column_type,
                row,
                "column widened to string"
            );
        }
        self.column_type = widened;
        self.fields.push(field);
    }

    fn materialize<S: TextStorage<'a>>(self) -> DataResult<Column<S>> {
        let column_type = self.column_type.unwrap_or(TypeTag::Null);
        let mut values = Vec::with_capacity(self.fields.len());
        for (row_idx0, field) in self.fields.iter().enumerate() {
            // 1-based, and the header is row 1.
            let user_row = row_idx0 + 2;
            values.push(materialize_cell(&self.name, column_type, field, user_row)?);
        }
        Ok(Column::new(self.name, column_type, values))
    }
}

fn materialize_cell<'a, S: TextStorage<'a>>(
    column: &str,
    column_type: TypeTag,
    field: &FieldSlice<'a>,
    row: usize,
) -> DataResult<CellValue<S>> {
    if field.tag() == TypeTag::Null {
        return Ok(CellValue::Null);
    }

    let raw = field.raw();
    let parse_error = |message: String| DataError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };
    match column_type {
        TypeTag::Integer => raw
            .parse::<i64>()
            .map(CellValue::Integer)
            .map_err(|e| parse_error(e.to_string())),
        TypeTag::Float => raw
            .parse::<f64>()
            .map(CellValue::Float)
            .map_err(|e| parse_error(e.to_string())),
        TypeTag::String => Ok(CellValue::Text(S::store(raw))),
        TypeTag::Null => unreachable!("a column holding a non-null field has a non-null type"),
    }
}

/// Read one record's fields, leaving the cursor on its line terminator (or at the end).
fn read_record<'a>(tokenizer: &mut Tokenizer<'a>, fields: &mut Vec<FieldSlice<'a>>) -> DataResult<()> {
    fields.clear();
    loop {
        let field = tokenizer.read_field()?;
        let more = field.terminator() == Terminator::Delimiter;
        fields.push(field);
        if !more {
            return Ok(());
        }
    }
}

fn parse<'a, S: TextStorage<'a>>(input: &'a str, max_rows: usize) -> DataResult<Dataset<S>> {
    let mut tokenizer = Tokenizer::new(input);
    let mut record: Vec<FieldSlice<'a>> = Vec::new();

    if !tokenizer.skip_to_record() {
        return Ok(Dataset::new());
    }
    read_record(&mut tokenizer, &mut record)?;
    let mut accumulators: Vec<ColumnAccumulator<'a>> = record
        .iter()
        .map(|f| ColumnAccumulator::new(f.unescaped().into_owned()))
        .collect();
    let expected = accumulators.len();

    let mut rows = 0usize;
    while (max_rows == 0 || rows < max_rows) && tokenizer.skip_to_record() {
        read_record(&mut tokenizer, &mut record)?;
        // 1-based, and the header is row 1.
        let user_row = rows + 2;
        if record.len() != expected {
            return Err(DataError::MalformedRecord {
                row: user_row,
                expected,
                found: record.len(),
            });
        }
        for (acc, field) in accumulators.iter_mut().zip(record.drain(..)) {
            acc.push(field, user_row);
        }
        rows += 1;
    }

    let columns = accumulators
        .into_iter()
        .map(ColumnAccumulator::materialize)
        .collect::<DataResult<Vec<Column<S>>>>()?;
    tracing::debug!(rows, columns = columns.len(), bytes = input.len(), "attached dataset");
    Ok(Dataset::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_is_one_directional() {
        let mut ty = None;
        for tag in [TypeTag::Null, TypeTag::Integer, TypeTag::Null, TypeTag::Integer] {
            ty = widen(ty, tag);
        }
        assert_eq!(ty, Some(TypeTag::Integer));

        ty = widen(ty, TypeTag::String);
        assert_eq!(ty, Some(TypeTag::String));
        ty = widen(ty, TypeTag::Integer);
        assert_eq!(ty, Some(TypeTag::String));

        assert_eq!(widen(Some(TypeTag::Integer), TypeTag::Float), Some(TypeTag::String));
        assert_eq!(widen(None, TypeTag::Null), None);
    }

    #[test]
    fn parse_header_only_yields_empty_columns() {
        let ds: Dataset<&str> = parse("a,b,c\n", 0).unwrap();
        assert_eq!(ds.columns(), 3);
        assert_eq!(ds.rows(), 0);
        assert_eq!(ds.column_type(1), Some(TypeTag::Null));
    }

    #[test]
    fn parse_empty_input_yields_empty_dataset() {
        let ds: Dataset<String> = parse("  \r\n\n ", 0).unwrap();
        assert_eq!(ds.columns(), 0);
        assert_eq!(ds.rows(), 0);
    }

    #[test]
    fn parse_stops_at_max_rows() {
        let ds: Dataset<&str> = parse("a\n1\n2\n3\n", 2).unwrap();
        assert_eq!(ds.rows(), 2);
    }

    #[test]
    fn integer_past_i64_range_widens_column_to_string() {
        let ds: Dataset<&str> = parse("id,name\n1,a\n12345678901234567890,b\n", 0).unwrap();
        assert_eq!(ds.column_type(0), Some(TypeTag::String));
        assert_eq!(ds.column_type(1), Some(TypeTag::String));
        assert_eq!(ds.cell(0, 0).unwrap().raw_str(), Some("1"));
        assert_eq!(ds.cell(1, 0).unwrap().raw_str(), Some("12345678901234567890"));

        let ds: Dataset<&str> = parse("id\n-9223372036854775808\n9223372036854775807\n", 0).unwrap();
        assert_eq!(ds.column_type(0), Some(TypeTag::Integer));
    }

    #[test]
    fn float_parsing_to_infinity_widens_column_to_string() {
        let input = format!("x\n{}.5\n1.5\n", "9".repeat(400));
        let ds: Dataset<String> = parse(&input, 0).unwrap();
        assert_eq!(ds.column_type(0), Some(TypeTag::String));
        assert_eq!(ds.cell(1, 0).unwrap().raw_str(), Some("1.5"));

        let written = ds.to_csv_string().unwrap();
        assert!(!written.contains("inf"));
        let again: Dataset<String> = parse(&written, 0).unwrap();
        assert_eq!(again, ds);
    }

    #[test]
    fn trailing_comma_is_an_empty_last_field() {
        let ds: Dataset<&str> = parse("a,b\n1,\n2,3\n", 0).unwrap();
        assert_eq!(ds.rows(), 2);
        assert!(ds.cell(0, 1).unwrap().is_null());
        assert_eq!(ds.column_type(1), Some(TypeTag::Integer));
    }
}
