//! Binding column specs to a record type's attributes.
//!
//! Resolution walks the parsed specs once per record type. Each spec either
//! binds to an [`Accessor`] (property first, then field) or is dropped.
//! Dropped specs consume no position, so positions stay dense.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::FormatError;
use crate::format::{parse, ColumnSpec};
use crate::traits::{Accessor, Exportable};
use crate::value::CellValue;

/// A column spec bound to a readable attribute, with its output position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDescriptor {
    /// Dense 0-based index among the resolved columns.
    pub position: usize,
    /// Column name, as written in the format string.
    pub name: String,
    /// Handle onto the attribute.
    pub accessor: Accessor,
    /// Display format for the sink.
    pub format: String,
    /// Width; `0` means auto-size.
    pub width: u32,
}

/// Type-erased resolver output, shareable through the cache.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ColumnLayout {
    columns: Vec<ColumnDescriptor>,
    unresolved: Vec<String>,
}

impl ColumnLayout {
    fn build<T: Exportable>(specs: &[ColumnSpec]) -> Self {
        let mut layout = ColumnLayout::default();

        for spec in specs {
            match T::find_attribute(&spec.name) {
                Some(accessor) => {
                    let position = layout.columns.len();
                    layout.columns.push(ColumnDescriptor {
                        position,
                        name: spec.name.clone(),
                        accessor,
                        format: spec.format.clone(),
                        width: spec.width,
                    });
                }
                None => {
                    debug!(
                        column = %spec.name,
                        record = std::any::type_name::<T>(),
                        "dropping column with no matching attribute"
                    );
                    layout.unresolved.push(spec.name.clone());
                }
            }
        }

        layout
    }
}

/// The resolved columns for record type `T`.
///
/// Built once per export call (or fetched from a [`ResolverCache`]) and never
/// mutated afterwards.
pub struct ColumnSet<T> {
    layout: Arc<ColumnLayout>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Exportable> ColumnSet<T> {
    fn from_layout(layout: Arc<ColumnLayout>) -> Self {
        ColumnSet {
            layout,
            _record: PhantomData,
        }
    }

    /// Resolved columns in ascending position order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.layout.columns
    }

    /// Names of the specs that matched no attribute, in input order.
    pub fn unresolved(&self) -> &[String] {
        &self.layout.unresolved
    }

    /// Number of resolved columns.
    pub fn len(&self) -> usize {
        self.layout.columns.len()
    }

    /// Returns `true` if no column resolved.
    pub fn is_empty(&self) -> bool {
        self.layout.columns.is_empty()
    }

    /// Reads every resolved column off `record`, in position order.
    pub fn read_row<'a>(&'a self, record: &'a T) -> impl Iterator<Item = CellValue<'a>> + 'a {
        self.layout
            .columns
            .iter()
            .map(move |column| column.accessor.read(record))
    }
}

impl<T> Clone for ColumnSet<T> {
    fn clone(&self) -> Self {
        ColumnSet {
            layout: Arc::clone(&self.layout),
            _record: PhantomData,
        }
    }
}

impl<T> PartialEq for ColumnSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.layout == other.layout
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSet")
            .field("columns", &self.layout.columns)
            .field("unresolved", &self.layout.unresolved)
            .finish()
    }
}

/// Resolves parsed specs against record type `T`.
///
/// # Example
///
/// ```
/// use gridcast::{parse, resolve, Exportable};
///
/// #[derive(Exportable)]
/// struct Person {
///     #[export(rename = "Name")]
///     name: String,
/// }
///
/// let columns = resolve::<Person>(&parse("Missing;Name").unwrap());
/// assert_eq!(columns.len(), 1);
/// assert_eq!(columns.columns()[0].position, 0);
/// assert_eq!(columns.unresolved(), ["Missing"]);
/// ```
pub fn resolve<T: Exportable>(specs: &[ColumnSpec]) -> ColumnSet<T> {
    ColumnSet::from_layout(Arc::new(ColumnLayout::build::<T>(specs)))
}

/// Memoizes resolver output keyed by `(column format, record type)`.
///
/// Layouts are built under the write lock on first use and handed out as
/// shared, immutable `Arc`s afterwards.
#[derive(Debug, Default)]
pub struct ResolverCache {
    layouts: RwLock<HashMap<(String, TypeId), Arc<ColumnLayout>>>,
}

impl ResolverCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        ResolverCache::default()
    }

    /// Returns the cached column set for `(column_format, T)`, parsing and
    /// resolving `column_format` on a miss.
    ///
    /// A malformed format is never cached.
    pub fn get_or_resolve<T: Exportable + 'static>(
        &self,
        column_format: &str,
    ) -> Result<ColumnSet<T>, FormatError> {
        let key = (column_format.to_string(), TypeId::of::<T>());

        // A poisoned lock still holds fully built layouts.
        if let Some(layout) = self
            .layouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(ColumnSet::from_layout(Arc::clone(layout)));
        }

        let specs = parse(column_format)?;
        let mut layouts = self
            .layouts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let layout = layouts
            .entry(key)
            .or_insert_with(|| Arc::new(ColumnLayout::build::<T>(&specs)));
        Ok(ColumnSet::from_layout(Arc::clone(layout)))
    }

    /// Number of cached layouts.
    pub fn len(&self) -> usize {
        self.layouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached layout.
    pub fn clear(&self) {
        self.layouts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::AttributeKind;
    use crate::value::{IntoCellValue, Number};

    // Age is declared before Name on purpose.
    struct Person {
        age: u32,
        name: String,
    }

    impl Exportable for Person {
        fn find_property(name: &str) -> Option<usize> {
            match name {
                "Initial" => Some(0),
                _ => None,
            }
        }

        fn find_field(name: &str) -> Option<usize> {
            match name {
                "Age" => Some(0),
                "Name" => Some(1),
                _ => None,
            }
        }

        fn read_property(&self, slot: usize) -> CellValue<'_> {
            match slot {
                0 => self.name.chars().next().into_cell_value(),
                _ => CellValue::Null,
            }
        }

        fn read_field(&self, slot: usize) -> CellValue<'_> {
            match slot {
                0 => (&self.age).into_cell_value(),
                1 => (&self.name).into_cell_value(),
                _ => CellValue::Null,
            }
        }
    }

    fn specs(format: &str) -> Vec<ColumnSpec> {
        parse(format).unwrap()
    }

    #[test]
    fn positions_follow_spec_order_not_declaration_order() {
        let columns = resolve::<Person>(&specs("Name;Age"));
        let summary: Vec<_> = columns
            .columns()
            .iter()
            .map(|c| (c.position, c.name.as_str()))
            .collect();
        assert_eq!(summary, vec![(0, "Name"), (1, "Age")]);
    }

    #[test]
    fn unresolved_specs_are_compacted_away() {
        let columns = resolve::<Person>(&specs("Nope;Name"));
        assert_eq!(columns.len(), 1);
        assert_eq!(columns.columns()[0].position, 0);
        assert_eq!(columns.columns()[0].name, "Name");
        assert_eq!(columns.unresolved(), ["Nope"]);
    }

    #[test]
    fn empty_names_never_resolve() {
        let columns = resolve::<Person>(&specs(";Age;"));
        assert_eq!(columns.len(), 1);
        assert_eq!(columns.unresolved(), ["", ""]);
    }

    #[test]
    fn format_and_width_carry_through() {
        let columns = resolve::<Person>(&specs("Age:0:80"));
        let age = &columns.columns()[0];
        assert_eq!(age.format, "0");
        assert_eq!(age.width, 80);
        assert_eq!(age.accessor.kind, AttributeKind::Field);
    }

    #[test]
    fn duplicates_resolve_independently() {
        let columns = resolve::<Person>(&specs("Name;Name"));
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.columns()[1].position, 1);
    }

    #[test]
    fn properties_resolve() {
        let columns = resolve::<Person>(&specs("Initial"));
        assert_eq!(columns.columns()[0].accessor.kind, AttributeKind::Property);
    }

    #[test]
    fn read_row_follows_positions() {
        let columns = resolve::<Person>(&specs("Name;Age;Initial"));
        let person = Person {
            age: 88,
            name: "Benjamin Graham".into(),
        };
        let row: Vec<_> = columns.read_row(&person).collect();
        assert_eq!(
            row,
            vec![
                CellValue::text("Benjamin Graham"),
                CellValue::Number(Number::U64(88)),
                CellValue::text("B"),
            ]
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let first = resolve::<Person>(&specs("Name;Bogus;Age:0:80"));
        let second = resolve::<Person>(&specs("Name;Bogus;Age:0:80"));
        assert_eq!(first, second);
    }

    #[test]
    fn cache_returns_equal_and_shared_layouts() {
        let cache = ResolverCache::new();
        let format = "Name;Age";
        let first = cache.get_or_resolve::<Person>(format).unwrap();
        let second = cache.get_or_resolve::<Person>(format).unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first.layout, &second.layout));
        assert_eq!(first, resolve::<Person>(&specs(format)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_keys_on_record_type() {
        struct Other;
        impl Exportable for Other {
            fn find_field(name: &str) -> Option<usize> {
                (name == "Name").then_some(0)
            }
            fn read_field(&self, _slot: usize) -> CellValue<'_> {
                CellValue::Null
            }
        }

        let cache = ResolverCache::new();
        let format = "Name;Age";
        let people = cache.get_or_resolve::<Person>(format).unwrap();
        let others = cache.get_or_resolve::<Other>(format).unwrap();

        assert_eq!(people.len(), 2);
        assert_eq!(others.len(), 1);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_keys_match_their_layouts() {
        let cache = ResolverCache::new();
        let ages = cache.get_or_resolve::<Person>("Age").unwrap();
        let names = cache.get_or_resolve::<Person>("Name").unwrap();

        assert_eq!(ages.columns()[0].name, "Age");
        assert_eq!(names.columns()[0].name, "Name");
        assert_eq!(names, resolve::<Person>(&specs("Name")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_skips_malformed_formats() {
        let cache = ResolverCache::new();
        assert!(cache.get_or_resolve::<Person>("Age:0:wide").is_err());
        assert!(cache.is_empty());
    }
}
