//! XLSX workbook sink.
//!
//! Cells are written straight into a [`Worksheet`] as they arrive; column
//! widths, autofit and the frozen header row are applied once the export is
//! done, since autofit has to see every cell.

use std::collections::HashMap;
use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::export::{export, ExportReport};
use crate::sink::Sink;
use crate::traits::Exportable;
use crate::value::CellValue;

/// Errors raised by [`XlsxSink`].
#[derive(Debug, Error)]
pub enum XlsxSinkError {
    /// The workbook writer rejected an operation.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),

    /// The target row does not fit a worksheet.
    #[error("row {0} is beyond the worksheet limit")]
    RowOutOfRange(usize),

    /// The target column does not fit a worksheet.
    #[error("column {0} is beyond the worksheet limit")]
    ColumnOutOfRange(usize),
}

/// Options for [`XlsxSink`].
///
/// # Example
///
/// ```
/// use gridcast::sinks::XlsxOptions;
///
/// let options = XlsxOptions::new()
///     .sheet_name("people")
///     .start_row(2)
///     .start_column(1)
///     .freeze_header(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XlsxOptions {
    sheet_name: String,
    start_row: RowNum,
    start_column: ColNum,
    freeze_header: bool,
    width_divisor: u32,
}

impl Default for XlsxOptions {
    fn default() -> Self {
        XlsxOptions {
            sheet_name: "export".to_string(),
            start_row: 0,
            start_column: 0,
            freeze_header: true,
            width_divisor: 2,
        }
    }
}

impl XlsxOptions {
    /// Default options: sheet `export`, origin `A1`, frozen header, widths
    /// halved.
    pub fn new() -> Self {
        XlsxOptions::default()
    }

    /// Sets the worksheet name.
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Sets the zero-based worksheet row the header lands on.
    pub fn start_row(mut self, row: RowNum) -> Self {
        self.start_row = row;
        self
    }

    /// Sets the zero-based worksheet column of the first export column.
    pub fn start_column(mut self, column: ColNum) -> Self {
        self.start_column = column;
        self
    }

    /// Freezes the rows up to and including the header.
    pub fn freeze_header(mut self, freeze: bool) -> Self {
        self.freeze_header = freeze;
        self
    }

    /// Sets the divisor applied to explicit widths to get spreadsheet
    /// character widths. `0` is treated as 1.
    pub fn width_divisor(mut self, divisor: u32) -> Self {
        self.width_divisor = divisor.max(1);
        self
    }

    /// Spreadsheet character width for an explicit column width. The
    /// division truncates, so `81` becomes `40` with the default divisor.
    pub fn column_width(&self, width: u32) -> f64 {
        f64::from(width / self.width_divisor.max(1))
    }
}

/// Writes export events into an XLSX worksheet.
///
/// The header lands on `start_row`; data row `n` lands `n` rows below it.
/// Non-empty cell formats become number formats. Width `0` columns are
/// autofitted; other widths are divided by the configured divisor.
pub struct XlsxSink {
    options: XlsxOptions,
    worksheet: Worksheet,
    formats: HashMap<String, Format>,
    header_format: Format,
    widths: Vec<(ColNum, u32)>,
    autofit: bool,
}

impl Default for XlsxSink {
    fn default() -> Self {
        XlsxSink::new()
    }
}

impl XlsxSink {
    /// Creates a sink with default options.
    pub fn new() -> Self {
        XlsxSink::with_options(XlsxOptions::default())
    }

    /// Creates a sink with the given options.
    pub fn with_options(options: XlsxOptions) -> Self {
        XlsxSink {
            options,
            worksheet: Worksheet::new(),
            formats: HashMap::new(),
            header_format: Format::new().set_bold(),
            widths: Vec::new(),
            autofit: false,
        }
    }

    fn locate(&self, row: usize, column: usize) -> Result<(RowNum, ColNum), XlsxSinkError> {
        let sheet_row = RowNum::try_from(row)
            .ok()
            .and_then(|r| r.checked_add(self.options.start_row))
            .ok_or(XlsxSinkError::RowOutOfRange(row))?;
        let sheet_column = ColNum::try_from(column)
            .ok()
            .and_then(|c| c.checked_add(self.options.start_column))
            .ok_or(XlsxSinkError::ColumnOutOfRange(column))?;
        Ok((sheet_row, sheet_column))
    }

    /// Applies widths, autofit and panes, and hands back the worksheet.
    pub fn into_worksheet(mut self) -> Result<Worksheet, XlsxSinkError> {
        self.worksheet.set_name(self.options.sheet_name.as_str())?;

        if self.autofit {
            self.worksheet.autofit();
        }
        for (column, width) in &self.widths {
            self.worksheet
                .set_column_width(*column, self.options.column_width(*width))?;
        }
        if self.options.freeze_header {
            self.worksheet
                .set_freeze_panes(self.options.start_row.saturating_add(1), 0)?;
        }

        Ok(self.worksheet)
    }

    /// Wraps the worksheet in a fresh workbook.
    pub fn into_workbook(self) -> Result<Workbook, XlsxSinkError> {
        let worksheet = self.into_worksheet()?;
        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        Ok(workbook)
    }

    /// Saves the workbook to `path`.
    pub fn save(self, path: impl AsRef<Path>) -> Result<(), XlsxSinkError> {
        let path = path.as_ref();
        let mut workbook = self.into_workbook()?;
        workbook.save(path)?;
        debug!(path = %path.display(), "saved workbook");
        Ok(())
    }

    /// Serializes the workbook to bytes.
    pub fn save_to_buffer(self) -> Result<Vec<u8>, XlsxSinkError> {
        let mut workbook = self.into_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }
}

impl Sink for XlsxSink {
    type Error = XlsxSinkError;

    fn cell(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue<'_>,
        format: &str,
    ) -> Result<(), XlsxSinkError> {
        let (row, column) = self.locate(row, column)?;

        let format = if format.is_empty() {
            None
        } else {
            Some(
                &*self
                    .formats
                    .entry(format.to_string())
                    .or_insert_with(|| Format::new().set_num_format(format)),
            )
        };
        let worksheet = &mut self.worksheet;

        match (value, format) {
            (CellValue::Null, Some(format)) => {
                worksheet.write_blank(row, column, format)?;
            }
            (CellValue::Null, None) => {}
            (CellValue::Text(text), Some(format)) => {
                worksheet.write_string_with_format(row, column, text.as_ref(), format)?;
            }
            (CellValue::Text(text), None) => {
                worksheet.write_string(row, column, text.as_ref())?;
            }
            (CellValue::Number(n), Some(format)) => {
                worksheet.write_number_with_format(row, column, n.to_f64(), format)?;
            }
            (CellValue::Number(n), None) => {
                worksheet.write_number(row, column, n.to_f64())?;
            }
            (CellValue::Bool(b), Some(format)) => {
                worksheet.write_boolean_with_format(row, column, b, format)?;
            }
            (CellValue::Bool(b), None) => {
                worksheet.write_boolean(row, column, b)?;
            }
        }
        Ok(())
    }

    fn column_header(&mut self, column: usize, name: &str, width: u32) -> Result<(), XlsxSinkError> {
        let (row, sheet_column) = self.locate(0, column)?;
        self.worksheet
            .write_string_with_format(row, sheet_column, name, &self.header_format)?;

        if width == 0 {
            self.autofit = true;
        } else {
            info!(column, width, "setting column width");
            self.widths.push((sheet_column, width));
        }
        Ok(())
    }
}

/// Exports `records` into a single-sheet workbook saved at `path`.
pub fn to_xlsx<T: Exportable>(
    records: &[T],
    column_format: &str,
    path: impl AsRef<Path>,
) -> Result<ExportReport, ExportError<XlsxSinkError>> {
    let mut sink = XlsxSink::new();
    let report = export(records, column_format, &mut sink)?;
    sink.save(path).map_err(ExportError::Sink)?;
    Ok(report)
}

/// Exports `records` into a single-sheet workbook and returns its bytes.
pub fn to_xlsx_buffer<T: Exportable>(
    records: &[T],
    column_format: &str,
) -> Result<Vec<u8>, ExportError<XlsxSinkError>> {
    let mut sink = XlsxSink::new();
    export(records, column_format, &mut sink)?;
    sink.save_to_buffer().map_err(ExportError::Sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn locate_applies_offsets() {
        let sink = XlsxSink::with_options(XlsxOptions::new().start_row(2).start_column(3));
        assert_eq!(sink.locate(0, 0).unwrap(), (2, 3));
        assert_eq!(sink.locate(4, 1).unwrap(), (6, 4));
    }

    #[test]
    fn locate_rejects_huge_columns() {
        let sink = XlsxSink::new();
        assert!(matches!(
            sink.locate(1, 70_000),
            Err(XlsxSinkError::ColumnOutOfRange(70_000))
        ));
    }

    #[test]
    fn widths_are_collected_for_explicit_columns_only() {
        let mut sink = XlsxSink::new();
        sink.column_header(0, "Name", 0).unwrap();
        sink.column_header(1, "Age", 80).unwrap();
        assert!(sink.autofit);
        assert_eq!(sink.widths, vec![(1, 80)]);
    }

    #[test]
    fn formats_are_cached_per_pattern() {
        let mut sink = XlsxSink::new();
        sink.cell(1, 0, CellValue::Number(Number::F64(1.5)), "0.00").unwrap();
        sink.cell(2, 0, CellValue::Number(Number::F64(2.5)), "0.00").unwrap();
        sink.cell(3, 0, CellValue::text("x"), "").unwrap();
        assert_eq!(sink.formats.len(), 1);
    }

    #[test]
    fn builds_a_workbook() {
        let mut sink = XlsxSink::new();
        sink.cell(1, 0, CellValue::text("Ada"), "").unwrap();
        sink.cell(1, 1, CellValue::Null, "").unwrap();
        sink.cell(1, 2, CellValue::Bool(true), "").unwrap();
        sink.column_header(0, "Name", 0).unwrap();
        let bytes = sink.save_to_buffer().unwrap();
        // XLSX files are zip archives.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn width_divisor_floor() {
        let options = XlsxOptions::new().width_divisor(0);
        assert_eq!(options.width_divisor, 1);
        assert_eq!(options.column_width(81), 81.0);
    }

    #[test]
    fn explicit_widths_truncate() {
        let options = XlsxOptions::new();
        assert_eq!(options.column_width(80), 40.0);
        assert_eq!(options.column_width(81), 40.0);
        assert_eq!(options.column_width(1), 0.0);
        assert_eq!(XlsxOptions::new().width_divisor(3).column_width(100), 33.0);
    }

    #[test]
    fn null_cells_keep_their_format() {
        let mut sink = XlsxSink::new();
        sink.cell(1, 0, CellValue::Null, "0.00").unwrap();
        sink.cell(2, 0, CellValue::Null, "").unwrap();
        assert_eq!(sink.formats.len(), 1);
        assert!(sink.formats.contains_key("0.00"));
        assert!(sink.save_to_buffer().is_ok());
    }
}
