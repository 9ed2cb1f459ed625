//! Output back ends.
//!
//! Every sink implements [`Sink`](crate::Sink). The text sinks buffer until
//! `finish()` so the header can be written above the data; the workbook sink
//! writes cells as they arrive.
//!
//! | Sink | Output | Uses format | Uses width |
//! |------|--------|-------------|------------|
//! | [`HtmlTableSink`] | `<table>` markup | no | header pixel width |
//! | [`CsvSink`] | CSV text | no | no |
//! | [`XlsxSink`] | XLSX workbook (feature `xlsx`) | number format | column width |

mod csv;
mod html;
#[cfg(feature = "xlsx")]
mod xlsx;

pub use self::csv::{to_csv, CsvSink, CsvSinkError};
pub use self::html::{to_html, to_html_with, HtmlOptions, HtmlTableSink};
#[cfg(feature = "xlsx")]
pub use self::xlsx::{to_xlsx, to_xlsx_buffer, XlsxOptions, XlsxSink, XlsxSinkError};
