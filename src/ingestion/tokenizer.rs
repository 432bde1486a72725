//! Field tokenizer.
//!
//! Scans one field at a time out of a text buffer, returning a zero-copy [`FieldSlice`] and the
//! field's inferred [`TypeTag`]. Dialect: comma delimited, `"` quoted, `\` escapes the next
//! character, `\r`/`\n` end a record, blanks around unquoted fields are trimmed.

use std::borrow::Cow;

use crate::error::{DataError, DataResult};
use crate::types::TypeTag;

const DELIMITER: u8 = b',';
const QUOTE: u8 = b'"';
const ESCAPE: u8 = b'\\';

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_line_end(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

/// What stopped the scan of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// A comma; another field of the same record follows.
    Delimiter,
    /// A line terminator; it is left unconsumed.
    RecordEnd,
    /// The end of the buffer.
    EndOfInput,
}

/// A field located in the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlice<'a> {
    input: &'a str,
    start: usize,
    end: usize,
    tag: TypeTag,
    quoted: bool,
    terminator: Terminator,
}

impl<'a> FieldSlice<'a> {
    /// Byte offset of the first content byte.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last content byte.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    /// The field content exactly as it appears in the buffer (quotes stripped, escapes kept).
    pub fn raw(&self) -> &'a str {
        &self.input[self.start..self.end]
    }

    /// The field content with escapes resolved.
    pub fn unescaped(&self) -> Cow<'a, str> {
        unescape(self.raw())
    }
}

/// Resolve `\"`, `\\` and `\,`; any other backslash is kept as written.
pub fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\\' | ',') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Escape text for writing inside a quoted field.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['"', '\\']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Include/exclude accounting used to pick a field's type.
#[derive(Debug, Clone, Copy)]
struct TypeMask {
    include: u8,
    exclude: u8,
}

impl TypeMask {
    const STRING: u8 = 1;
    const FLOAT: u8 = 1 << 1;
    const INTEGER: u8 = 1 << 2;
    const NUMERIC: u8 = Self::FLOAT | Self::INTEGER;

    fn new() -> Self {
        Self {
            include: Self::STRING,
            exclude: 0,
        }
    }

    fn resolve(self) -> TypeTag {
        let mut mask = self.include & !self.exclude;
        if mask & Self::INTEGER != 0 {
            mask &= !(Self::FLOAT | Self::STRING);
        } else if mask & Self::FLOAT != 0 {
            mask &= !Self::STRING;
        }
        match mask {
            Self::STRING => TypeTag::String,
            Self::FLOAT => TypeTag::Float,
            Self::INTEGER => TypeTag::Integer,
            other => unreachable!("type mask {other:#05b} must resolve to exactly one type"),
        }
    }
}

/// Infer the type of field content.
///
/// A sign counts toward a number only when digits follow; a lone `+`, `-` or `.` is text.
/// Empty content is [`TypeTag::Null`].
pub fn infer_type(content: &[u8]) -> TypeTag {
    let Some(&first) = content.first() else {
        return TypeTag::Null;
    };

    let mut mask = TypeMask::new();
    let mut rest = content;
    if first == b'+' || first == b'-' {
        mask.include |= TypeMask::NUMERIC;
        rest = &content[1..];
    }

    let mut seen_period = false;
    let mut seen_digit = false;
    for &b in rest {
        if b.is_ascii_digit() {
            mask.include |= TypeMask::NUMERIC;
            seen_digit = true;
        } else if b == b'.' {
            if seen_period {
                mask.exclude |= TypeMask::FLOAT;
            } else {
                mask.include |= TypeMask::FLOAT;
                mask.exclude |= TypeMask::INTEGER;
                seen_period = true;
            }
        } else {
            mask.exclude |= TypeMask::NUMERIC;
        }
    }
    if !seen_digit {
        mask.exclude |= TypeMask::NUMERIC;
    }
    mask.resolve()
}

/// Cursor over a text buffer yielding one field per call.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skip whitespace, line terminators and blank lines up to the start of the next record.
    ///
    /// Returns `false` once the input is exhausted.
    pub fn skip_to_record(&mut self) -> bool {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && (is_blank(bytes[self.pos]) || is_line_end(bytes[self.pos])) {
            self.pos += 1;
        }
        !self.is_exhausted()
    }

    /// Read the next field and advance past its delimiter.
    ///
    /// A line terminator that ends the field is left in place so the caller can see the
    /// record boundary.
    pub fn read_field(&mut self) -> DataResult<FieldSlice<'a>> {
        let bytes = self.input.as_bytes();
        let mut pos = self.pos;
        while pos < bytes.len() && is_blank(bytes[pos]) {
            pos += 1;
        }

        let (start, end, quoted, mut pos) = if pos < bytes.len() && bytes[pos] == QUOTE {
            let (start, end) = self.scan_quoted(pos)?;
            let mut after = end + 1;
            while after < bytes.len() && is_blank(bytes[after]) {
                after += 1;
            }
            (start, end, true, after)
        } else {
            let (start, end, stop) = scan_unquoted(bytes, pos);
            (start, end, false, stop)
        };

        let terminator = if pos >= bytes.len() {
            Terminator::EndOfInput
        } else if bytes[pos] == DELIMITER {
            pos += 1;
            Terminator::Delimiter
        } else if is_line_end(bytes[pos]) {
            Terminator::RecordEnd
        } else {
            // Only reachable after a closing quote: unquoted scans stop on a boundary.
            return Err(DataError::TrailingCharacters {
                offset: pos,
                found: self.input[pos..].chars().next().unwrap_or_default(),
            });
        };
        self.pos = pos;

        let content = &bytes[start..end];
        let tag = infer_type(content);
        Ok(FieldSlice {
            input: self.input,
            start,
            end,
            tag,
            quoted,
            terminator,
        })
    }

    /// Find the content bounds of a quoted field whose opening quote is at `open`.
    fn scan_quoted(&self, open: usize) -> DataResult<(usize, usize)> {
        let bytes = self.input.as_bytes();
        let start = open + 1;
        let mut escaped = false;
        for (offset, &b) in bytes[start..].iter().enumerate() {
            if escaped {
                escaped = false;
            } else if b == ESCAPE {
                escaped = true;
            } else if b == QUOTE {
                return Ok((start, start + offset));
            }
        }
        Err(DataError::UnterminatedQuote { offset: open })
    }
}

/// Find the trimmed content bounds of an unquoted field starting at `from`, plus the offset
/// where the scan stopped.
fn scan_unquoted(bytes: &[u8], from: usize) -> (usize, usize, usize) {
    let mut pos = from;
    let mut escaped = false;
    while pos < bytes.len() {
        let b = bytes[pos];
        if is_line_end(b) {
            break;
        }
        if escaped {
            escaped = false;
        } else if b == ESCAPE {
            escaped = true;
        } else if b == DELIMITER {
            break;
        }
        pos += 1;
    }
    let mut end = pos;
    while end > from && is_blank(bytes[end - 1]) {
        end -= 1;
    }
    (from, end, pos)
}

/// Read the first field of `record`.
pub fn read_field(record: &str) -> DataResult<FieldSlice<'_>> {
    Tokenizer::new(record).read_field()
}
