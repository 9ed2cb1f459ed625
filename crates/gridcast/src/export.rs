//! The export driver.
//!
//! [`export`] parses a column format, resolves it against the record type,
//! and walks the records, reporting every cell and then every column header
//! to a [`Sink`]. The driver itself performs no I/O.

use tracing::debug;

use crate::error::ExportError;
use crate::format::parse;
use crate::resolve::{resolve, ColumnSet, ResolverCache};
use crate::sink::{FnSink, Sink};
use crate::traits::Exportable;
use crate::value::CellValue;

/// Summary of a completed export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportReport {
    /// Number of data rows emitted.
    pub rows: usize,
    /// Number of resolved columns emitted.
    pub columns: usize,
    /// Column names that matched no attribute and were dropped.
    pub unresolved: Vec<String>,
}

impl ExportReport {
    /// Returns `true` if every requested column resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Exports `records` to `sink` using the given column format.
///
/// Cells are emitted row by row (rows numbered from 1), columns in position
/// order. Column headers follow once all cells are out, even when `records`
/// is empty. A malformed column format fails before the sink sees anything;
/// a sink error stops the export immediately.
///
/// # Example
///
/// ```
/// use gridcast::{export, Exportable, RecordingSink};
///
/// #[derive(Exportable)]
/// struct Person {
///     #[export(rename = "Name")]
///     name: String,
///     #[export(rename = "Age")]
///     age: u32,
/// }
///
/// let people = vec![Person { name: "Benjamin Graham".into(), age: 88 }];
/// let mut sink = RecordingSink::new();
/// let report = export(&people, "Name;Age;Salary", &mut sink).unwrap();
///
/// assert_eq!(report.rows, 1);
/// assert_eq!(report.columns, 2);
/// assert_eq!(report.unresolved, ["Salary"]);
/// assert_eq!(sink.cells().count(), 2);
/// assert_eq!(sink.headers().count(), 2);
/// ```
pub fn export<T, S>(
    records: &[T],
    column_format: &str,
    sink: &mut S,
) -> Result<ExportReport, ExportError<S::Error>>
where
    T: Exportable,
    S: Sink + ?Sized,
{
    let specs = parse(column_format)?;
    let columns = resolve::<T>(&specs);
    emit(records, &columns, sink).map_err(ExportError::Sink)
}

/// Exports `records` to a pair of callbacks.
///
/// Equivalent to [`export`] with a [`FnSink`].
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use gridcast::{export_with, Exportable};
///
/// #[derive(Exportable)]
/// struct Person {
///     #[export(rename = "Name")]
///     name: String,
/// }
///
/// let people = vec![Person { name: "Ada".into() }];
/// let mut html = String::new();
/// export_with(
///     &people,
///     "Name",
///     |_row, _column, value, _format| {
///         html.push_str(&format!("<td>{}</td>", value));
///         Ok::<(), Infallible>(())
///     },
///     |_column, _name, _width| Ok(()),
/// )
/// .unwrap();
/// assert_eq!(html, "<td>Ada</td>");
/// ```
pub fn export_with<T, C, H, E>(
    records: &[T],
    column_format: &str,
    on_cell: C,
    on_column_header: H,
) -> Result<ExportReport, ExportError<E>>
where
    T: Exportable,
    C: FnMut(usize, usize, CellValue<'_>, &str) -> Result<(), E>,
    H: FnMut(usize, &str, u32) -> Result<(), E>,
{
    let mut sink = FnSink::new(on_cell, on_column_header);
    export(records, column_format, &mut sink)
}

/// Walks already-resolved columns over `records`.
///
/// This is the second half of [`export`], for callers that resolve once and
/// export several record slices with the same layout.
pub fn emit<T, S>(
    records: &[T],
    columns: &ColumnSet<T>,
    sink: &mut S,
) -> Result<ExportReport, S::Error>
where
    T: Exportable,
    S: Sink + ?Sized,
{
    for (index, record) in records.iter().enumerate() {
        let row = index + 1;
        for column in columns.columns() {
            sink.cell(
                row,
                column.position,
                column.accessor.read(record),
                &column.format,
            )?;
        }
    }

    for column in columns.columns() {
        sink.column_header(column.position, &column.name, column.width)?;
    }

    debug!(
        rows = records.len(),
        columns = columns.len(),
        dropped = columns.unresolved().len(),
        "export finished"
    );

    Ok(ExportReport {
        rows: records.len(),
        columns: columns.len(),
        unresolved: columns.unresolved().to_vec(),
    })
}

/// Export driver with an optional resolver cache.
///
/// Without a cache this behaves exactly like [`export`]. With one, the column
/// layout for each `(column format, record type)` pair is resolved once and
/// shared by later exports.
#[derive(Debug, Default)]
pub struct Exporter {
    cache: Option<ResolverCache>,
}

impl Exporter {
    /// Creates an exporter that resolves on every call.
    pub fn new() -> Self {
        Exporter::default()
    }

    /// Creates an exporter that memoizes resolved layouts.
    pub fn cached() -> Self {
        Exporter {
            cache: Some(ResolverCache::new()),
        }
    }

    /// The resolver cache, if this exporter has one.
    pub fn cache(&self) -> Option<&ResolverCache> {
        self.cache.as_ref()
    }

    /// Parses and resolves a column format for `T`, consulting the cache.
    pub fn columns<T: Exportable + 'static>(
        &self,
        column_format: &str,
    ) -> Result<ColumnSet<T>, crate::FormatError> {
        match &self.cache {
            Some(cache) => cache.get_or_resolve::<T>(column_format),
            None => Ok(resolve::<T>(&parse(column_format)?)),
        }
    }

    /// Exports `records` to `sink`. See [`export`].
    pub fn export<T, S>(
        &self,
        records: &[T],
        column_format: &str,
        sink: &mut S,
    ) -> Result<ExportReport, ExportError<S::Error>>
    where
        T: Exportable + 'static,
        S: Sink + ?Sized,
    {
        let columns = self.columns::<T>(column_format)?;
        emit(records, &columns, sink).map_err(ExportError::Sink)
    }
}
