//! Runtime cell values read off records.
//!
//! The [`CellValue`] enum is what an [`Accessor`](crate::Accessor) hands to a
//! sink for every cell. Text borrows from the record whenever it can, so a
//! `String` field costs nothing to export.

use std::borrow::Cow;
use std::fmt;

/// Value of one cell, borrowed from the source record where possible.
///
/// # Example
///
/// ```
/// use gridcast::{CellValue, IntoCellValue, Number};
///
/// let name = String::from("Benjamin Graham");
/// assert_eq!((&name).into_cell_value(), CellValue::text("Benjamin Graham"));
/// assert_eq!(88u8.into_cell_value(), CellValue::Number(Number::U64(88)));
///
/// let missing: Option<i32> = None;
/// assert!(missing.into_cell_value().is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    /// Absent value. Sinks decide how to render it.
    Null,
    /// Text value.
    Text(Cow<'a, str>),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
}

impl<'a> CellValue<'a> {
    /// Creates a borrowed text value.
    pub fn text(s: &'a str) -> Self {
        CellValue::Text(Cow::Borrowed(s))
    }

    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Returns `true` if this is a `Bool` value.
    pub fn is_bool(&self) -> bool {
        matches!(self, CellValue::Bool(_))
    }

    /// Extracts the text, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Detaches the value from the record it was read from.
    pub fn into_owned(self) -> CellValue<'static> {
        match self {
            CellValue::Null => CellValue::Null,
            CellValue::Text(s) => CellValue::Text(Cow::Owned(s.into_owned())),
            CellValue::Number(n) => CellValue::Number(n),
            CellValue::Bool(b) => CellValue::Bool(b),
        }
    }
}

/// Renders the value as plain text. `Null` renders as the empty string.
impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64. Spreadsheets store every number this way.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

/// Conversion into a [`CellValue`].
///
/// The `#[derive(Exportable)]` macro reads every field through this trait,
/// passing a reference (`&self.field`), and every property through the value
/// its method returns. Implementations exist for strings, all primitive
/// numbers, `bool`, `char`, `Option<T>`, and references to each of them.
pub trait IntoCellValue<'a> {
    /// Converts `self` into a cell value.
    fn into_cell_value(self) -> CellValue<'a>;
}

impl<'a> IntoCellValue<'a> for CellValue<'a> {
    fn into_cell_value(self) -> CellValue<'a> {
        self
    }
}

impl<'a> IntoCellValue<'a> for &'a str {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(Cow::Borrowed(self))
    }
}

impl<'a, 'b: 'a> IntoCellValue<'a> for &'a &'b str {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(Cow::Borrowed(*self))
    }
}

impl<'a> IntoCellValue<'a> for &'a String {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(Cow::Borrowed(self.as_str()))
    }
}

impl<'a> IntoCellValue<'a> for String {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(Cow::Owned(self))
    }
}

impl<'a> IntoCellValue<'a> for Cow<'a, str> {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(self)
    }
}

impl<'a> IntoCellValue<'a> for &'a Cow<'_, str> {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(Cow::Borrowed(self.as_ref()))
    }
}

impl<'a> IntoCellValue<'a> for char {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(Cow::Owned(self.to_string()))
    }
}

impl<'a> IntoCellValue<'a> for &'a char {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Text(Cow::Owned(self.to_string()))
    }
}

impl<'a> IntoCellValue<'a> for bool {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Bool(self)
    }
}

impl<'a> IntoCellValue<'a> for &'a bool {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Bool(*self)
    }
}

macro_rules! number_cell {
    ($($t:ty),*) => {
        $(
            impl<'a> IntoCellValue<'a> for $t {
                fn into_cell_value(self) -> CellValue<'a> {
                    CellValue::Number(Number::from(self))
                }
            }

            impl<'a> IntoCellValue<'a> for &'a $t {
                fn into_cell_value(self) -> CellValue<'a> {
                    CellValue::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_cell!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<'a> IntoCellValue<'a> for Number {
    fn into_cell_value(self) -> CellValue<'a> {
        CellValue::Number(self)
    }
}

impl<'a, T: IntoCellValue<'a>> IntoCellValue<'a> for Option<T> {
    fn into_cell_value(self) -> CellValue<'a> {
        match self {
            Some(v) => v.into_cell_value(),
            None => CellValue::Null,
        }
    }
}

impl<'a, T> IntoCellValue<'a> for &'a Option<T>
where
    &'a T: IntoCellValue<'a>,
{
    fn into_cell_value(self) -> CellValue<'a> {
        match self {
            Some(v) => v.into_cell_value(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_checks() {
        assert!(CellValue::text("a").is_text());
        assert!(CellValue::Number(Number::I64(42)).is_number());
        assert!(CellValue::Bool(true).is_bool());
        assert!(CellValue::Null.is_null());
        assert!(!CellValue::Null.is_text());
    }

    #[test]
    fn value_extractors() {
        assert_eq!(CellValue::text("hello").as_str(), Some("hello"));
        assert_eq!(
            CellValue::Number(Number::I64(42)).as_number(),
            Some(Number::I64(42))
        );
        assert_eq!(CellValue::Bool(true).as_bool(), Some(true));

        // Wrong type returns None
        assert_eq!(CellValue::text("test").as_number(), None);
        assert_eq!(CellValue::Number(Number::I64(1)).as_str(), None);
        assert_eq!(CellValue::Null.as_bool(), None);
    }

    #[test]
    fn display_renders_null_as_empty() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::text("x").to_string(), "x");
        assert_eq!(CellValue::Number(Number::U64(88)).to_string(), "88");
        assert_eq!(CellValue::Number(Number::F64(1.5)).to_string(), "1.5");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn into_owned_detaches_borrowed_text() {
        let owned = {
            let s = String::from("temporary");
            CellValue::text(&s).into_owned()
        };
        assert_eq!(owned, CellValue::Text(Cow::Owned("temporary".into())));
    }

    #[test]
    fn number_conversions() {
        assert_eq!(Number::from(42i32), Number::I64(42));
        assert_eq!(Number::from(42u32), Number::U64(42));
        assert_eq!(Number::from(42.5f64), Number::F64(42.5));
        assert_eq!(Number::from(7usize), Number::U64(7));
        assert_eq!(Number::U64(3).to_f64(), 3.0);
    }

    #[test]
    fn string_references_borrow() {
        let s = String::from("borrowed");
        match (&s).into_cell_value() {
            CellValue::Text(Cow::Borrowed(b)) => assert_eq!(b, "borrowed"),
            other => panic!("expected borrowed text, got {:?}", other),
        }
    }

    #[test]
    fn options_map_none_to_null() {
        let some: Option<String> = Some("x".into());
        let none: Option<String> = None;
        assert_eq!((&some).into_cell_value(), CellValue::text("x"));
        assert_eq!((&none).into_cell_value(), CellValue::Null);
        assert_eq!(Some(12i32).into_cell_value(), CellValue::Number(Number::I64(12)));
    }

    #[test]
    fn scalars_convert() {
        assert_eq!((&true).into_cell_value(), CellValue::Bool(true));
        assert_eq!('x'.into_cell_value(), CellValue::text("x"));
        let f = 2.5f32;
        assert_eq!((&f).into_cell_value(), CellValue::Number(Number::F64(2.5)));
    }
}
