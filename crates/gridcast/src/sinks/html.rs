//! HTML table sink.

use std::convert::Infallible;

use quick_xml::escape::escape;

use crate::error::ExportError;
use crate::export::export;
use crate::sink::Sink;
use crate::traits::Exportable;
use crate::value::CellValue;

/// Options for [`HtmlTableSink`].
///
/// # Example
///
/// ```
/// use gridcast::sinks::HtmlOptions;
///
/// let options = HtmlOptions::new().class("people").null_repr("-");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    class: Option<String>,
    null_repr: String,
}

impl HtmlOptions {
    /// Default options: no class attribute, nulls render empty.
    pub fn new() -> Self {
        HtmlOptions::default()
    }

    /// Sets the `class` attribute of the `<table>` element.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the text rendered for null cells.
    pub fn null_repr(mut self, repr: impl Into<String>) -> Self {
        self.null_repr = repr.into();
        self
    }
}

/// Buffers export events and renders them as an HTML `<table>`.
///
/// Headers arrive after the data, so nothing is rendered until
/// [`finish`](HtmlTableSink::finish). Cell formats are ignored; a non-zero
/// column width becomes an inline pixel width on the header cell.
#[derive(Debug, Clone, Default)]
pub struct HtmlTableSink {
    options: HtmlOptions,
    rows: Vec<Vec<String>>,
    headers: Vec<(String, u32)>,
}

impl HtmlTableSink {
    /// Creates a sink with default options.
    pub fn new() -> Self {
        HtmlTableSink::default()
    }

    /// Creates a sink with the given options.
    pub fn with_options(options: HtmlOptions) -> Self {
        HtmlTableSink {
            options,
            ..HtmlTableSink::default()
        }
    }

    /// Renders the buffered table.
    pub fn finish(self) -> String {
        let mut html = String::new();

        match &self.options.class {
            Some(class) => html.push_str(&format!("<table class=\"{}\">\n", escape(class.as_str()))),
            None => html.push_str("<table>\n"),
        }

        if !self.headers.is_empty() {
            html.push_str("<thead>\n<tr>");
            for (name, width) in &self.headers {
                if *width > 0 {
                    html.push_str(&format!("<th style=\"width:{}px\">", width));
                } else {
                    html.push_str("<th>");
                }
                html.push_str(name);
                html.push_str("</th>");
            }
            html.push_str("</tr>\n</thead>\n");
        }

        if !self.rows.is_empty() {
            html.push_str("<tbody>\n");
            for row in &self.rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str("<td>");
                    html.push_str(cell);
                    html.push_str("</td>");
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</tbody>\n");
        }

        html.push_str("</table>\n");
        html
    }

    fn render(&self, value: &CellValue<'_>) -> String {
        match value {
            CellValue::Null => escape(self.options.null_repr.as_str()).into_owned(),
            other => escape(other.to_string().as_str()).into_owned(),
        }
    }
}

impl Sink for HtmlTableSink {
    type Error = Infallible;

    fn cell(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue<'_>,
        _format: &str,
    ) -> Result<(), Infallible> {
        let rendered = self.render(&value);

        // Data rows start at 1.
        let index = row.saturating_sub(1);
        if self.rows.len() <= index {
            self.rows.resize_with(index + 1, Vec::new);
        }
        let cells = &mut self.rows[index];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = rendered;
        Ok(())
    }

    fn column_header(&mut self, column: usize, name: &str, width: u32) -> Result<(), Infallible> {
        if self.headers.len() <= column {
            self.headers.resize(column + 1, (String::new(), 0));
        }
        self.headers[column] = (escape(name).into_owned(), width);
        Ok(())
    }
}

/// Exports `records` as an HTML table.
///
/// # Example
///
/// ```
/// use gridcast::{to_html, Exportable};
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
/// let html = to_html(&people, "Name;Age").unwrap();
/// assert!(html.contains("<th>Name</th><th>Age</th>"));
/// assert!(html.contains("<tr><td>Benjamin Graham</td><td>88</td></tr>"));
/// ```
pub fn to_html<T: Exportable>(
    records: &[T],
    column_format: &str,
) -> Result<String, ExportError<Infallible>> {
    to_html_with(records, column_format, HtmlOptions::default())
}

/// Exports `records` as an HTML table with the given options.
pub fn to_html_with<T: Exportable>(
    records: &[T],
    column_format: &str,
    options: HtmlOptions,
) -> Result<String, ExportError<Infallible>> {
    let mut sink = HtmlTableSink::with_options(options);
    export(records, column_format, &mut sink)?;
    Ok(sink.finish())
}
