//! Attribute lookup tables for record types.
//!
//! This module provides the [`Exportable`] trait, implemented by the
//! `#[derive(Exportable)]` macro, and the [`Accessor`] handle the resolver
//! binds each column to.

use crate::value::CellValue;

/// Which half of a record type's lookup table an accessor points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// A method-backed property declared with `#[export(property(...))]`.
    Property,
    /// A named struct field.
    Field,
}

/// A resolved handle onto one readable attribute of a record type.
///
/// Accessors are produced by [`Exportable::find_attribute`] and are only
/// meaningful for the type that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Accessor {
    /// Property or field.
    pub kind: AttributeKind,
    /// Index into the type's property or field table.
    pub slot: usize,
}

impl Accessor {
    /// Creates an accessor for the given property slot.
    pub fn property(slot: usize) -> Self {
        Accessor {
            kind: AttributeKind::Property,
            slot,
        }
    }

    /// Creates an accessor for the given field slot.
    pub fn field(slot: usize) -> Self {
        Accessor {
            kind: AttributeKind::Field,
            slot,
        }
    }

    /// Reads the attribute off a record.
    ///
    /// Never fails: an out-of-range slot or an absent value reads as
    /// [`CellValue::Null`].
    pub fn read<'a, T: Exportable>(&self, record: &'a T) -> CellValue<'a> {
        match self.kind {
            AttributeKind::Property => record.read_property(self.slot),
            AttributeKind::Field => record.read_field(self.slot),
        }
    }
}

/// Trait for record types whose attributes can be projected onto columns.
///
/// This trait is typically derived using `#[derive(Exportable)]`, but can
/// also be implemented manually.
///
/// # Derive Usage
///
/// ```
/// use gridcast::Exportable;
///
/// #[derive(Exportable)]
/// #[export(property(name = "Label", method = label))]
/// struct Person {
///     #[export(rename = "Name")]
///     name: String,
///     #[export(rename = "Age")]
///     age: u8,
///     #[export(skip)]
///     internal_id: u64,
/// }
///
/// impl Person {
///     fn label(&self) -> String {
///         format!("{} ({})", self.name, self.age)
///     }
/// }
///
/// assert!(Person::find_attribute("Name").is_some());
/// assert!(Person::find_attribute("Label").is_some());
/// assert!(Person::find_attribute("internal_id").is_none());
/// assert_eq!(Person::AGE, "Age");
/// ```
///
/// # Manual Implementation
///
/// ```
/// use gridcast::{CellValue, Exportable, IntoCellValue};
///
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// impl Exportable for Person {
///     fn find_field(name: &str) -> Option<usize> {
///         match name {
///             "Name" => Some(0),
///             "Age" => Some(1),
///             _ => None,
///         }
///     }
///
///     fn read_field(&self, slot: usize) -> CellValue<'_> {
///         match slot {
///             0 => (&self.name).into_cell_value(),
///             1 => self.age.into_cell_value(),
///             _ => CellValue::Null,
///         }
///     }
/// }
/// ```
pub trait Exportable {
    /// Looks up a property by exact, case-sensitive name.
    ///
    /// Returns the property's slot, or `None` if the type declares no
    /// property with that name.
    fn find_property(name: &str) -> Option<usize> {
        let _ = name;
        None
    }

    /// Looks up a field by exact, case-sensitive name.
    fn find_field(name: &str) -> Option<usize>;

    /// Reads the property in `slot`. Unknown slots read as `Null`.
    fn read_property(&self, slot: usize) -> CellValue<'_> {
        let _ = slot;
        CellValue::Null
    }

    /// Reads the field in `slot`. Unknown slots read as `Null`.
    fn read_field(&self, slot: usize) -> CellValue<'_>;

    /// Resolves a column name to an accessor: properties first, then fields.
    fn find_attribute(name: &str) -> Option<Accessor>
    where
        Self: Sized,
    {
        Self::find_property(name)
            .map(Accessor::property)
            .or_else(|| Self::find_field(name).map(Accessor::field))
    }
}

impl<T: Exportable> Exportable for &T {
    fn find_property(name: &str) -> Option<usize> {
        T::find_property(name)
    }

    fn find_field(name: &str) -> Option<usize> {
        T::find_field(name)
    }

    fn read_property(&self, slot: usize) -> CellValue<'_> {
        (**self).read_property(slot)
    }

    fn read_field(&self, slot: usize) -> CellValue<'_> {
        (**self).read_field(slot)
    }
}
