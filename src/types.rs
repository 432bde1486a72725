//! Core data model types.
//!
//! Ingestion produces cells typed by [`TypeTag`]. A cell's text is stored through a
//! [`TextStorage`] strategy: `&'a str` borrows from the input buffer (zero-copy), `String`
//! owns a copy.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::ingestion::tokenizer::unescape;

/// Logical type of a field, a cell or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// UTF-8 text.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point number.
    Float,
    /// Missing/empty value.
    Null,
}

impl TypeTag {
    /// Returns `true` for [`TypeTag::Integer`] and [`TypeTag::Float`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Lowercase name, as used in error messages and serialized profiles.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a [`crate::dataset::Dataset`] stores the text of string cells.
///
/// Text is stored exactly as it appeared between the field bounds (escapes included);
/// [`CellValue::text`] unescapes on read.
pub trait TextStorage<'a>: AsRef<str> {
    /// Build the stored form from a slice of the input buffer.
    fn store(raw: &'a str) -> Self;
}

impl<'a> TextStorage<'a> for &'a str {
    fn store(raw: &'a str) -> Self {
        raw
    }
}

impl<'a> TextStorage<'a> for String {
    fn store(raw: &'a str) -> Self {
        raw.to_owned()
    }
}

/// A single typed cell in a column.
///
/// Equality compares text cells by their unescaped content, so `a\,b` and `a,b` are equal.
#[derive(Debug, Clone)]
pub enum CellValue<S> {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Raw (still escaped) text.
    Text(S),
}

impl<S: AsRef<str>> CellValue<S> {
    /// The tag of the stored variant.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Null => TypeTag::Null,
            Self::Integer(_) => TypeTag::Integer,
            Self::Float(_) => TypeTag::Float,
            Self::Text(_) => TypeTag::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns the integer if this is a [`CellValue::Integer`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float if this is a [`CellValue::Float`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the stored text, escapes included.
    pub fn raw_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Returns the unescaped text. Borrows when the stored text contains no escapes.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.raw_str().map(unescape)
    }

    /// Copy into an owning cell.
    pub fn to_owned_cell(&self) -> CellValue<String> {
        match self {
            Self::Null => CellValue::Null,
            Self::Integer(v) => CellValue::Integer(*v),
            Self::Float(v) => CellValue::Float(*v),
            Self::Text(s) => CellValue::Text(s.as_ref().to_owned()),
        }
    }
}

impl<S: AsRef<str>> PartialEq for CellValue<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => {
                let (a, b) = (a.as_ref(), b.as_ref());
                a == b || unescape(a) == unescape(b)
            }
            _ => false,
        }
    }
}

/// Renders numbers canonically, text unescaped and null as nothing.
impl<S: AsRef<str>> fmt::Display for CellValue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Text(s) => f.write_str(&unescape(s.as_ref())),
        }
    }
}

/// Format a float so that it reads back as a float: always carries a `.` and never uses
/// exponent notation.
pub fn format_float(v: f64) -> String {
    let mut out = v.to_string();
    if v.is_finite() && !out.contains('.') {
        out.push_str(".0");
    }
    out
}

/// A scalar type that cells can be extracted into.
///
/// Extraction is strict: `f64` only reads [`CellValue::Float`] cells, `i64` only
/// [`CellValue::Integer`] cells and `String` only [`CellValue::Text`] cells. `Default` is the
/// sentinel used for nulls when they are included.
pub trait CellScalar: Sized + Default {
    /// The tag a cell must carry to convert into `Self`.
    const TYPE: TypeTag;

    /// Convert a non-null cell of the matching tag.
    fn from_cell<S: AsRef<str>>(cell: &CellValue<S>) -> Option<Self>;

    /// Convert a cell, returning `None` for null and [`DataError::TypeMismatch`] for a cell of
    /// another type.
    fn try_from_cell<S: AsRef<str>>(cell: &CellValue<S>) -> DataResult<Option<Self>> {
        if cell.is_null() {
            return Ok(None);
        }
        Self::from_cell(cell)
            .map(Some)
            .ok_or(DataError::TypeMismatch {
                expected: Self::TYPE.name(),
                found: cell.type_tag(),
            })
    }
}

impl CellScalar for i64 {
    const TYPE: TypeTag = TypeTag::Integer;

    fn from_cell<S: AsRef<str>>(cell: &CellValue<S>) -> Option<Self> {
        cell.as_i64()
    }
}

impl CellScalar for f64 {
    const TYPE: TypeTag = TypeTag::Float;

    fn from_cell<S: AsRef<str>>(cell: &CellValue<S>) -> Option<Self> {
        cell.as_f64()
    }
}

impl CellScalar for String {
    const TYPE: TypeTag = TypeTag::String;

    fn from_cell<S: AsRef<str>>(cell: &CellValue<S>) -> Option<Self> {
        cell.text().map(Cow::into_owned)
    }
}

/// Split a delimited text value into parsed scalars, skipping empty pieces.
///
/// Useful for cells that pack a list, e.g. `"243 837 636"` split on `' '`.
pub fn split_values<T>(text: &str, separator: char) -> DataResult<Vec<T>>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    text.split(separator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(idx, piece)| {
            piece.parse::<T>().map_err(|e| DataError::ParseError {
                row: 0,
                column: format!("item {idx}"),
                raw: piece.to_owned(),
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formatting_keeps_a_period() {
        assert_eq!(format_float(5.0), "5.0");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(83.326), "83.326");
        assert_eq!(format_float(1e21), "1000000000000000000000.0");
    }

    #[test]
    fn text_cells_unescape_on_read() {
        let cell: CellValue<&str> = CellValue::Text(r#"Hello \"World\"!"#);
        assert_eq!(cell.raw_str(), Some(r#"Hello \"World\"!"#));
        assert_eq!(cell.text().as_deref(), Some(r#"Hello "World"!"#));
        assert_eq!(cell.to_string(), r#"Hello "World"!"#);
    }

    #[test]
    fn text_cells_compare_unescaped() {
        let escaped: CellValue<&str> = CellValue::Text(r"a\,b");
        assert_eq!(escaped, CellValue::Text("a,b"));
        assert_ne!(escaped, CellValue::Text(r"a\\,b"));
        assert_ne!(CellValue::<&str>::Integer(1), CellValue::Float(1.0));
        assert_eq!(CellValue::<String>::Null, CellValue::Null);
    }

    #[test]
    fn try_from_cell_is_strict_about_tags() {
        let int: CellValue<String> = CellValue::Integer(3);
        assert_eq!(i64::try_from_cell(&int).unwrap(), Some(3));
        assert!(matches!(
            f64::try_from_cell(&int),
            Err(DataError::TypeMismatch {
                expected: "float",
                found: TypeTag::Integer
            })
        ));
        let null: CellValue<String> = CellValue::Null;
        assert_eq!(String::try_from_cell(&null).unwrap(), None);
    }

    #[test]
    fn split_values_parses_each_piece() {
        let v: Vec<u32> = split_values("243 837  636 ", ' ').unwrap();
        assert_eq!(v, vec![243, 837, 636]);

        let err = split_values::<u32>("1 x 3", ' ').unwrap_err();
        assert!(err.to_string().contains("raw='x'"));
    }
}
