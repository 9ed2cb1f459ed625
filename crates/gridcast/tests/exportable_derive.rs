//! Integration tests for the Exportable derive macro.
//!
//! These tests verify that `#[derive(Exportable)]` generates the lookup
//! table, readers and name constants from struct annotations.

#![allow(dead_code)] // Some fields are intentionally skipped for testing

use std::fmt;

use gridcast::{AttributeKind, CellValue, Exportable, Number};

// =============================================================================
// Basic derive tests
// =============================================================================

#[derive(Exportable)]
struct Person {
    #[export(rename = "Name")]
    name: String,

    #[export(rename = "Age")]
    age: u32,

    active: bool,
}

fn graham() -> Person {
    Person {
        name: "Benjamin Graham".to_string(),
        age: 88,
        active: true,
    }
}

#[test]
fn test_fields_are_found_by_exported_name() {
    assert_eq!(Person::find_field("Name"), Some(0));
    assert_eq!(Person::find_field("Age"), Some(1));
    assert_eq!(Person::find_field("active"), Some(2));
}

#[test]
fn test_lookup_is_case_sensitive() {
    assert_eq!(Person::find_field("name"), None);
    assert_eq!(Person::find_field("AGE"), None);
    assert_eq!(Person::find_field(""), None);
}

#[test]
fn test_fields_read_typed_values() {
    let person = graham();
    assert_eq!(person.read_field(0), CellValue::text("Benjamin Graham"));
    assert_eq!(person.read_field(1), CellValue::Number(Number::U64(88)));
    assert_eq!(person.read_field(2), CellValue::Bool(true));
    assert_eq!(person.read_field(99), CellValue::Null);
}

#[test]
fn test_name_constants_generated() {
    assert_eq!(Person::NAME, "Name");
    assert_eq!(Person::AGE, "Age");
    assert_eq!(Person::ACTIVE, "active");
}

#[test]
fn test_no_properties_by_default() {
    assert_eq!(Person::find_property("Name"), None);
    assert_eq!(graham().read_property(0), CellValue::Null);
}

// =============================================================================
// Skip, display and optional fields
// =============================================================================

struct Money(i64);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Exportable)]
struct Account {
    owner: String,

    #[export(skip)]
    password_hash: String,

    #[export(display, rename = "Balance")]
    balance: Money,

    nickname: Option<String>,

    score: Option<f64>,
}

fn account() -> Account {
    Account {
        owner: "ada".to_string(),
        password_hash: "x".to_string(),
        balance: Money(12_345),
        nickname: None,
        score: Some(0.5),
    }
}

#[test]
fn test_skipped_fields_are_invisible() {
    assert_eq!(Account::find_field("password_hash"), None);
    assert_eq!(Account::find_attribute("password_hash"), None);
}

#[test]
fn test_skipped_fields_do_not_take_a_slot() {
    assert_eq!(Account::find_field("owner"), Some(0));
    assert_eq!(Account::find_field("Balance"), Some(1));
}

#[test]
fn test_display_fields_render_as_text() {
    let slot = Account::find_field("Balance").unwrap();
    assert_eq!(account().read_field(slot), CellValue::text("$123.45"));
}

#[test]
fn test_option_fields() {
    let account = account();
    let nickname = Account::find_field("nickname").unwrap();
    let score = Account::find_field("score").unwrap();
    assert_eq!(account.read_field(nickname), CellValue::Null);
    assert_eq!(account.read_field(score), CellValue::Number(Number::F64(0.5)));
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Exportable)]
#[export(property(name = "Initials", method = initials))]
#[export(property(name = "Name", method = shouted_name))]
struct Member {
    #[export(rename = "Name")]
    name: String,

    age: u8,
}

impl Member {
    fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }

    fn shouted_name(&self) -> String {
        self.name.to_uppercase()
    }
}

#[test]
fn test_properties_are_found() {
    assert_eq!(Member::find_property("Initials"), Some(0));
    assert_eq!(Member::find_property("Name"), Some(1));
    assert_eq!(Member::find_property("age"), None);
}

#[test]
fn test_property_wins_over_field() {
    let accessor = Member::find_attribute("Name").unwrap();
    assert_eq!(accessor.kind, AttributeKind::Property);

    let member = Member {
        name: "Jean Claude VanDamme".to_string(),
        age: 12,
    };
    assert_eq!(
        accessor.read(&member),
        CellValue::text("JEAN CLAUDE VANDAMME")
    );
    assert_eq!(member.read_property(0), CellValue::text("JCV"));
}

#[test]
fn test_field_is_used_when_no_property_matches() {
    let accessor = Member::find_attribute("age").unwrap();
    assert_eq!(accessor.kind, AttributeKind::Field);
}

#[test]
fn test_property_constants_generated() {
    assert_eq!(Member::INITIALS, "Initials");
    assert_eq!(Member::NAME, "Name");
    assert_eq!(Member::AGE, "age");
}

// =============================================================================
// Generics and borrowed data
// =============================================================================

#[derive(Exportable)]
struct Labeled<'a, T: fmt::Display> {
    label: &'a str,

    #[export(display)]
    value: T,
}

#[test]
fn test_generic_struct() {
    let row = Labeled {
        label: "pi",
        value: 3.5_f32,
    };
    assert_eq!(row.read_field(0), CellValue::text("pi"));
    assert_eq!(row.read_field(1), CellValue::text("3.5"));
    assert_eq!(Labeled::<f32>::VALUE, "value");
}

#[test]
fn test_raw_identifier_field() {
    #[derive(Exportable)]
    struct Keyword {
        r#type: &'static str,
    }

    assert_eq!(Keyword::find_field("type"), Some(0));
    assert_eq!(Keyword::TYPE, "type");
}

#[test]
fn test_references_are_exportable() {
    let person = graham();
    let by_ref = &person;
    assert_eq!(<&Person>::find_field("Age"), Some(1));
    assert_eq!(by_ref.read_field(1), CellValue::Number(Number::U64(88)));
}

// =============================================================================
// Names differing only in case
// =============================================================================

#[derive(Exportable)]
#[export(property(name = "Age", method = computed_age))]
struct Employee {
    age: u8,
}

impl Employee {
    fn computed_age(&self) -> u32 {
        u32::from(self.age) + 1
    }
}

#[test]
fn test_property_and_field_differing_in_case() {
    let employee = Employee { age: 41 };

    let property = Employee::find_attribute("Age").unwrap();
    assert_eq!(property.kind, AttributeKind::Property);
    assert_eq!(
        property.read(&employee),
        CellValue::Number(Number::U64(42))
    );

    let field = Employee::find_attribute("age").unwrap();
    assert_eq!(field.kind, AttributeKind::Field);
    assert_eq!(field.read(&employee), CellValue::Number(Number::U64(41)));

    // The shared constant belongs to the property.
    assert_eq!(Employee::AGE, "Age");
}
