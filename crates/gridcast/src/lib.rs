//! Gridcast - project typed records onto a tabular grid.
//!
//! Gridcast takes a slice of records, a compact column format string, and a
//! sink, and streams every cell of the resulting table to the sink:
//!
//! - Column formats: `name[:format[:width]]` tokens joined by `;`
//! - Attribute lookup by name, generated at compile time by
//!   `#[derive(Exportable)]`, properties before fields
//! - Unknown column names are dropped, and reported in the [`ExportReport`]
//! - Sinks for HTML tables, CSV and XLSX workbooks, or your own
//!
//! # Quick Start
//!
//! ```rust
//! use gridcast::{to_html, Exportable};
//!
//! #[derive(Exportable)]
//! struct Person {
//!     #[export(rename = "Name")]
//!     name: String,
//!     #[export(rename = "Age")]
//!     age: u32,
//! }
//!
//! let people = vec![
//!     Person { name: "Benjamin Graham".into(), age: 88 },
//!     Person { name: "Jean Claude VanDamme".into(), age: 12 },
//! ];
//!
//! let html = to_html(&people, "Name;Age").unwrap();
//! assert!(html.contains("<tr><td>Jean Claude VanDamme</td><td>12</td></tr>"));
//! ```
//!
//! # Event Order
//!
//! The driver reports cells first and headers last:
//!
//! ```text
//! cell(1, 0, ..) cell(1, 1, ..) ... cell(n, k-1, ..)
//! column_header(0, ..) ... column_header(k-1, ..)
//! ```
//!
//! Rows are numbered from 1; row 0 belongs to the header. Columns are the
//! dense positions of the names that resolved.
//!
//! # Writing a Sink
//!
//! ```rust
//! use std::convert::Infallible;
//! use gridcast::{export, CellValue, Exportable, Sink};
//!
//! #[derive(Default)]
//! struct Markdown {
//!     rows: Vec<Vec<String>>,
//!     header: Vec<String>,
//! }
//!
//! impl Sink for Markdown {
//!     type Error = Infallible;
//!
//!     fn cell(&mut self, row: usize, _column: usize, value: CellValue<'_>, _format: &str) -> Result<(), Infallible> {
//!         if self.rows.len() < row {
//!             self.rows.push(Vec::new());
//!         }
//!         self.rows[row - 1].push(value.to_string());
//!         Ok(())
//!     }
//!
//!     fn column_header(&mut self, _column: usize, name: &str, _width: u32) -> Result<(), Infallible> {
//!         self.header.push(name.to_string());
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Exportable)]
//! struct City {
//!     name: &'static str,
//!     population: u64,
//! }
//!
//! let cities = [City { name: "Oslo", population: 709_000 }];
//! let mut sink = Markdown::default();
//! export(&cities, "name;population", &mut sink).unwrap();
//! assert_eq!(sink.header, ["name", "population"]);
//! assert_eq!(sink.rows, [["Oslo", "709000"]]);
//! ```

// Lets the derive macro's `::gridcast::` paths resolve inside this crate.
extern crate self as gridcast;

mod error;
mod export;
mod format;
mod resolve;
mod sink;
pub mod sinks;
mod traits;
mod value;

pub use error::{ExportError, FormatError};
pub use export::{emit, export, export_with, ExportReport, Exporter};
pub use format::{parse, ColumnSpec};
pub use resolve::{resolve, ColumnDescriptor, ColumnSet, ResolverCache};
pub use sink::{FnSink, RecordingSink, Sink, SinkEvent};
pub use traits::{Accessor, AttributeKind, Exportable};
pub use value::{CellValue, IntoCellValue, Number};

pub use sinks::{to_csv, to_html};
#[cfg(feature = "xlsx")]
pub use sinks::{to_xlsx, to_xlsx_buffer};

pub use gridcast_macros::Exportable;
