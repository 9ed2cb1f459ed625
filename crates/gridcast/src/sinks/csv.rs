//! CSV sink.

use std::convert::Infallible;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::error::ExportError;
use crate::export::export;
use crate::sink::Sink;
use crate::traits::Exportable;
use crate::value::CellValue;

/// Errors raised while writing buffered rows as CSV.
#[derive(Debug, Error)]
pub enum CsvSinkError {
    /// The csv writer rejected a record.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The in-memory buffer could not be flushed.
    #[error("csv buffer error: {0}")]
    Flush(String),

    /// The output was not valid UTF-8.
    #[error("csv output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for CsvSinkError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        CsvSinkError::Flush(err.to_string())
    }
}

/// Buffers export events and writes them as CSV, header record first.
///
/// Null cells become empty fields. Cell formats and widths are ignored.
#[derive(Debug, Clone)]
pub struct CsvSink {
    delimiter: u8,
    rows: Vec<Vec<String>>,
    headers: Vec<String>,
}

impl Default for CsvSink {
    fn default() -> Self {
        CsvSink {
            delimiter: b',',
            rows: Vec::new(),
            headers: Vec::new(),
        }
    }
}

impl CsvSink {
    /// Creates a comma-delimited sink.
    pub fn new() -> Self {
        CsvSink::default()
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Writes the buffered header and rows.
    pub fn finish(self) -> Result<String, CsvSinkError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer.into_inner()?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Sink for CsvSink {
    type Error = Infallible;

    fn cell(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue<'_>,
        _format: &str,
    ) -> Result<(), Infallible> {
        let index = row.saturating_sub(1);
        if self.rows.len() <= index {
            self.rows.resize_with(index + 1, Vec::new);
        }
        let cells = &mut self.rows[index];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.to_string();
        Ok(())
    }

    fn column_header(&mut self, column: usize, name: &str, _width: u32) -> Result<(), Infallible> {
        if self.headers.len() <= column {
            self.headers.resize(column + 1, String::new());
        }
        self.headers[column] = name.to_string();
        Ok(())
    }
}

/// Exports `records` as CSV text.
///
/// # Example
///
/// ```
/// use gridcast::{to_csv, Exportable};
///
/// #[derive(Exportable)]
/// struct Person {
///     #[export(rename = "Name")]
///     name: String,
///     #[export(rename = "Age")]
///     age: u32,
/// }
///
/// let people = vec![Person { name: "Graham, Benjamin".into(), age: 88 }];
/// let csv = to_csv(&people, "Name;Age").unwrap();
/// assert_eq!(csv, "Name,Age\n\"Graham, Benjamin\",88\n");
/// ```
pub fn to_csv<T: Exportable>(
    records: &[T],
    column_format: &str,
) -> Result<String, ExportError<CsvSinkError>> {
    let mut sink = CsvSink::new();
    export(records, column_format, &mut sink)
        .map_err(|err| err.map_sink(|never: Infallible| -> CsvSinkError { match never {} }))?;
    sink.finish().map_err(ExportError::Sink)
}
