//! The two-event contract every output back end implements.
//!
//! The export driver reports every data cell first, row by row, and only then
//! reports the column headers. Sinks that want headers on top (HTML, CSV)
//! buffer the cells until the headers arrive.

use std::convert::Infallible;

use crate::value::CellValue;

/// Consumer of export events.
///
/// # Event Order
///
/// For `n` records and `k` resolved columns the driver calls:
///
/// 1. `cell(row, column, ..)` for `row` in `1..=n`, `column` in `0..k`
/// 2. `column_header(column, ..)` for `column` in `0..k`
///
/// Row `0` is never passed to `cell`; it is reserved for the header.
/// Returning an error from either method aborts the export.
pub trait Sink {
    /// Error produced by this sink.
    type Error;

    /// Receives one data cell.
    fn cell(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue<'_>,
        format: &str,
    ) -> Result<(), Self::Error>;

    /// Receives the name and width of one column. A width of `0` means
    /// auto-size.
    fn column_header(&mut self, column: usize, name: &str, width: u32) -> Result<(), Self::Error>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    type Error = S::Error;

    fn cell(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue<'_>,
        format: &str,
    ) -> Result<(), Self::Error> {
        (**self).cell(row, column, value, format)
    }

    fn column_header(&mut self, column: usize, name: &str, width: u32) -> Result<(), Self::Error> {
        (**self).column_header(column, name, width)
    }
}

/// A sink built from two closures.
///
/// # Example
///
/// ```
/// use gridcast::{CellValue, FnSink, Sink};
///
/// let mut cells = Vec::new();
/// let mut headers = Vec::new();
/// let mut sink = FnSink::new(
///     |row, column, value: CellValue<'_>, _format: &str| {
///         cells.push((row, column, value.to_string()));
///         Ok::<(), std::convert::Infallible>(())
///     },
///     |column, name: &str, width| {
///         headers.push((column, name.to_string(), width));
///         Ok(())
///     },
/// );
///
/// sink.cell(1, 0, CellValue::text("x"), "").unwrap();
/// sink.column_header(0, "Name", 0).unwrap();
/// drop(sink);
/// assert_eq!(cells, vec![(1, 0, "x".to_string())]);
/// assert_eq!(headers, vec![(0, "Name".to_string(), 0)]);
/// ```
pub struct FnSink<C, H> {
    on_cell: C,
    on_column_header: H,
}

impl<C, H> FnSink<C, H> {
    /// Wraps a cell callback and a column header callback.
    pub fn new<E>(on_cell: C, on_column_header: H) -> Self
    where
        C: FnMut(usize, usize, CellValue<'_>, &str) -> Result<(), E>,
        H: FnMut(usize, &str, u32) -> Result<(), E>,
    {
        FnSink {
            on_cell,
            on_column_header,
        }
    }
}

impl<C, H, E> Sink for FnSink<C, H>
where
    C: FnMut(usize, usize, CellValue<'_>, &str) -> Result<(), E>,
    H: FnMut(usize, &str, u32) -> Result<(), E>,
{
    type Error = E;

    fn cell(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue<'_>,
        format: &str,
    ) -> Result<(), E> {
        (self.on_cell)(row, column, value, format)
    }

    fn column_header(&mut self, column: usize, name: &str, width: u32) -> Result<(), E> {
        (self.on_column_header)(column, name, width)
    }
}

/// A sink that records every event as an owned value, in arrival order.
///
/// Handy for inspecting exactly what a back end would see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    /// Events in the order the driver emitted them.
    pub events: Vec<SinkEvent>,
}

/// One recorded export event.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// A data cell.
    Cell {
        row: usize,
        column: usize,
        value: CellValue<'static>,
        format: String,
    },
    /// A column header.
    ColumnHeader {
        column: usize,
        name: String,
        width: u32,
    },
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        RecordingSink::default()
    }

    /// Recorded cell events only.
    pub fn cells(&self) -> impl Iterator<Item = &SinkEvent> {
        self.events
            .iter()
            .filter(|event| matches!(event, SinkEvent::Cell { .. }))
    }

    /// Recorded header events only.
    pub fn headers(&self) -> impl Iterator<Item = &SinkEvent> {
        self.events
            .iter()
            .filter(|event| matches!(event, SinkEvent::ColumnHeader { .. }))
    }
}

impl Sink for RecordingSink {
    type Error = Infallible;

    fn cell(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue<'_>,
        format: &str,
    ) -> Result<(), Infallible> {
        self.events.push(SinkEvent::Cell {
            row,
            column,
            value: value.into_owned(),
            format: format.to_string(),
        });
        Ok(())
    }

    fn column_header(&mut self, column: usize, name: &str, width: u32) -> Result<(), Infallible> {
        self.events.push(SinkEvent::ColumnHeader {
            column,
            name: name.to_string(),
            width,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn recording_sink_keeps_arrival_order() {
        let mut sink = RecordingSink::new();
        sink.cell(1, 0, CellValue::Number(Number::I64(1)), "0").unwrap();
        sink.column_header(0, "Id", 10).unwrap();

        assert_eq!(
            sink.events,
            vec![
                SinkEvent::Cell {
                    row: 1,
                    column: 0,
                    value: CellValue::Number(Number::I64(1)),
                    format: "0".to_string(),
                },
                SinkEvent::ColumnHeader {
                    column: 0,
                    name: "Id".to_string(),
                    width: 10,
                },
            ]
        );
        assert_eq!(sink.cells().count(), 1);
        assert_eq!(sink.headers().count(), 1);
    }

    #[test]
    fn fn_sink_propagates_errors() {
        let mut sink = FnSink::new(
            |_row, _column, _value, _format| Err::<(), _>("full"),
            |_column, _name, _width| Ok(()),
        );
        assert_eq!(sink.cell(1, 0, CellValue::Null, ""), Err("full"));
        assert_eq!(sink.column_header(0, "x", 0), Ok(()));
    }

    #[test]
    fn mutable_references_are_sinks() {
        fn emit<S: Sink>(mut sink: S) -> Result<(), S::Error> {
            sink.column_header(0, "Name", 0)
        }

        let mut recorder = RecordingSink::new();
        emit(&mut recorder).unwrap();
        assert_eq!(recorder.events.len(), 1);
    }
}
