//! Column format mini-language.
//!
//! A column format is a list of `name[:format[:width]]` tokens joined by `;`:
//!
//! ```text
//! Name;Age:0:80;Joined:yyyy-mm-dd
//! ```
//!
//! - `name` is matched against the record type's attribute names.
//! - `format` is handed to the sink untouched (spreadsheet sinks use it as a
//!   number format). Defaults to `""`.
//! - `width` is a non-negative integer in sink-defined units. `0` (the
//!   default) means auto-size.

use crate::error::{FormatError, Result};

const COLUMN_SEPARATOR: char = ';';
const PART_SEPARATOR: char = ':';

/// One parsed, unresolved output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ColumnSpec {
    /// Attribute name to look up. May be empty, in which case it never resolves.
    pub name: String,
    /// Display format for the sink. Empty means none.
    pub format: String,
    /// Column width; `0` means auto-size.
    pub width: u32,
}

impl ColumnSpec {
    /// Creates a spec with no format and automatic width.
    pub fn new(name: impl Into<String>) -> Self {
        ColumnSpec {
            name: name.into(),
            ..ColumnSpec::default()
        }
    }

    /// Sets the display format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the width.
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Parses a single `name[:format[:width]]` token.
    ///
    /// Segments after the third are ignored.
    pub fn parse(token: &str) -> Result<Self> {
        let mut parts = token.split(PART_SEPARATOR);
        let name = parts.next().unwrap_or_default();
        let format = parts.next().unwrap_or_default();
        let width = match parts.next() {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|source| FormatError::InvalidWidth {
                    column: name.to_string(),
                    value: raw.to_string(),
                    source,
                })?,
            None => 0,
        };

        Ok(ColumnSpec {
            name: name.to_string(),
            format: format.to_string(),
            width,
        })
    }
}

/// Parses a full column format string into column specs, in order.
///
/// The empty string yields no columns. Repeated names are kept; each becomes
/// its own column. A malformed width anywhere fails the whole parse.
///
/// # Example
///
/// ```
/// use gridcast::{parse, ColumnSpec};
///
/// let specs = parse("Name;Age:0:80").unwrap();
/// assert_eq!(
///     specs,
///     vec![ColumnSpec::new("Name"), ColumnSpec::new("Age").format("0").width(80)]
/// );
///
/// assert!(parse("").unwrap().is_empty());
/// assert!(parse("Age:0:abc").is_err());
/// ```
pub fn parse(column_format: &str) -> Result<Vec<ColumnSpec>> {
    if column_format.is_empty() {
        return Ok(Vec::new());
    }

    column_format
        .split(COLUMN_SEPARATOR)
        .map(ColumnSpec::parse)
        .collect()
}
