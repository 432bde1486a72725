//! Writing a dataset back out as CSV text that attaches to an equal dataset.
//!
//! Header names and text cells are quoted (with `"` and `\` escaped), numbers are written
//! bare, and nulls are written as empty fields. Floats always carry a `.` so they read back
//! as floats.

use std::fmt;
use std::io;

use csv::{QuoteStyle, Terminator as LineTerminator, WriterBuilder};

use crate::error::{DataError, DataResult};
use crate::ingestion::tokenizer::{escape, unescape};
use crate::types::{CellValue, format_float};

use super::{Dataset, Row};

fn quoted(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

/// Format one cell the way it is written to CSV.
pub fn format_field<S: AsRef<str>>(cell: &CellValue<S>) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Integer(v) => v.to_string(),
        CellValue::Float(v) => format_float(*v),
        CellValue::Text(s) => quoted(&unescape(s.as_ref())),
    }
}

/// Fields of one record. A record holding a single empty field is written as `""` so the line
/// is not mistaken for a blank one.
fn record<I: IntoIterator<Item = String>>(fields: I) -> Vec<String> {
    let mut record: Vec<String> = fields.into_iter().collect();
    if let [only] = record.as_mut_slice() {
        if only.is_empty() {
            only.push_str("\"\"");
        }
    }
    record
}

impl<S: AsRef<str>> Dataset<S> {
    /// Write the header and every row as CSV.
    ///
    /// A dataset without columns writes nothing.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> DataResult<()> {
        if self.columns.is_empty() {
            return Ok(());
        }

        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .terminator(LineTerminator::Any(b'\n'))
            .from_writer(writer);

        wtr.write_record(record(self.column_names().map(quoted)))?;
        for row in self.iter_rows() {
            wtr.write_record(record(row.iter().map(format_field)))?;
        }
        wtr.flush()?;
        tracing::debug!(rows = self.rows(), columns = self.columns(), "wrote dataset as csv");
        Ok(())
    }

    /// Serialize to an in-memory CSV string.
    pub fn to_csv_string(&self) -> DataResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| DataError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        })
    }
}

impl<S: AsRef<str>> fmt::Display for Dataset<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_csv_string().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Renders the row as one CSV line, without a terminator.
impl<S: AsRef<str>> fmt::Display for Row<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = record(self.iter().map(format_field));
        f.write_str(&fields.join(","))
    }
}
