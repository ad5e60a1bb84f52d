//! End-to-end tests for order-by clauses.

use std::cmp::Ordering;

use quarry::{Attributes, Dir, IntoValue, Lookup, OrderBy, QuarryError, Timestamp, Value, ValueType};

// ============================================================================
// Test targets
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Pet {
    animal: &'static str,
    color: &'static str,
    born: Timestamp,
}

impl Attributes for Pet {
    fn target_name(&self) -> &'static str {
        "Pet"
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "animal" => Some(self.animal.into_value()),
            "color" => Some(self.color.into_value()),
            "born" => Some(self.born.into_value()),
            _ => None,
        }
    }

    fn accessor(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "nameLength" => Some(self.animal.len().into_value()),
            _ => None,
        }
    }
}

fn pet(animal: &'static str, color: &'static str) -> Pet {
    Pet {
        animal,
        color,
        born: Timestamp(0),
    }
}

fn summary(pets: &[Pet]) -> Vec<(&str, &str)> {
    pets.iter().map(|p| (p.animal, p.color)).collect()
}

struct IntRecord(i32);

impl Attributes for IntRecord {
    fn target_name(&self) -> &'static str {
        "IntRecord"
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        (name == "field").then(|| self.0.into_value())
    }
}

struct WideRecord(u64);

impl Attributes for WideRecord {
    fn target_name(&self) -> &'static str {
        "WideRecord"
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        (name == "field").then(|| self.0.into_value())
    }
}

struct TextRecord(&'static str);

impl Attributes for TextRecord {
    fn target_name(&self) -> &'static str {
        "TextRecord"
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        (name == "field").then(|| self.0.into_value())
    }
}

struct BlobRecord;

impl Attributes for BlobRecord {
    fn target_name(&self) -> &'static str {
        "BlobRecord"
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        (name == "field").then_some(Value::Other("Vec<u8>"))
    }
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn sort_by_two_keys() {
    let mut pets = vec![
        pet("Dog", "Blue"),
        pet("Dog", "Red"),
        pet("Aardvark", "Red"),
        pet("Aardvark", "Blue"),
    ];
    OrderBy::new("order by color, animal").unwrap().sort(&mut pets).unwrap();
    assert_eq!(
        summary(&pets),
        vec![
            ("Aardvark", "Blue"),
            ("Dog", "Blue"),
            ("Aardvark", "Red"),
            ("Dog", "Red"),
        ]
    );
}

#[test]
fn sort_descending_key() {
    let mut pets = vec![
        pet("Dog", "Blue"),
        pet("Aardvark", "Red"),
        pet("Cat", "Blue"),
    ];
    OrderBy::new("order by animal desc").unwrap().sort(&mut pets).unwrap();
    assert_eq!(
        summary(&pets),
        vec![("Dog", "Blue"), ("Cat", "Blue"), ("Aardvark", "Red")]
    );
}

#[test]
fn sort_is_stable() {
    let mut pets = vec![
        pet("Dog", "Red"),
        pet("Cat", "Blue"),
        pet("Ant", "Red"),
        pet("Bee", "Blue"),
    ];
    OrderBy::new("order by color").unwrap().sort(&mut pets).unwrap();
    assert_eq!(
        summary(&pets),
        vec![("Cat", "Blue"), ("Bee", "Blue"), ("Dog", "Red"), ("Ant", "Red")]
    );
}

#[test]
fn sort_by_accessor() {
    let mut pets = vec![pet("Aardvark", "Red"), pet("Dog", "Red"), pet("Cat", "Red")];
    OrderBy::new("order by nameLength(), animal")
        .unwrap()
        .sort(&mut pets)
        .unwrap();
    assert_eq!(
        summary(&pets),
        vec![("Cat", "Red"), ("Dog", "Red"), ("Aardvark", "Red")]
    );
}

#[test]
fn sort_by_timestamp() {
    let mut pets = vec![pet("Late", "x"), pet("Early", "x")];
    pets[0].born = Timestamp::from_secs(20);
    pets[1].born = Timestamp::from_secs(10);
    OrderBy::new("order by born").unwrap().sort(&mut pets).unwrap();
    assert_eq!(pets[0].animal, "Early");
}

#[test]
fn sort_failure_leaves_list_untouched() {
    // Colors differ, so the missing key is never consulted.
    let mut pets = vec![pet("Dog", "Red"), pet("Cat", "Blue")];
    OrderBy::new("order by color, weight")
        .unwrap()
        .sort(&mut pets)
        .unwrap();
    assert_eq!(summary(&pets), vec![("Cat", "Blue"), ("Dog", "Red")]);

    let mut pets = vec![pet("Dog", "Red"), pet("Cat", "Red")];
    let before = pets.clone();
    let err = OrderBy::new("order by color, weight")
        .unwrap()
        .sort(&mut pets)
        .unwrap_err();
    assert_eq!(pets, before);
    assert_eq!(
        err,
        QuarryError::UnknownIdentifier {
            identifier: "weight".into(),
            lookup: Lookup::Field,
            target: "Pet",
        }
    );
}

#[test]
fn sort_empty_and_single() {
    let order = OrderBy::new("order by animal").unwrap();
    let mut empty: Vec<Pet> = Vec::new();
    order.sort(&mut empty).unwrap();
    assert!(empty.is_empty());

    let mut one = vec![pet("Dog", "Red")];
    order.sort(&mut one).unwrap();
    assert_eq!(one.len(), 1);
}

// ============================================================================
// Comparing heterogeneous targets
// ============================================================================

#[test]
fn compatible_types_across_targets() {
    let order = OrderBy::new("order by field").unwrap();
    let targets: Vec<Box<dyn Attributes>> = vec![
        Box::new(WideRecord(30)),
        Box::new(IntRecord(-5)),
        Box::new(WideRecord(7)),
    ];
    assert_eq!(order.compare(&targets[0], &targets[1]).unwrap(), Ordering::Greater);
    assert_eq!(order.compare(&targets[1], &targets[2]).unwrap(), Ordering::Less);

    let mut targets = targets;
    order.sort(&mut targets).unwrap();
    let names: Vec<_> = targets.iter().map(|t| t.target_name()).collect();
    assert_eq!(names, vec!["IntRecord", "WideRecord", "WideRecord"]);
}

#[test]
fn incompatible_types_name_both_targets() {
    let order = OrderBy::new("order by field").unwrap();
    let err = order.compare(&IntRecord(1), &TextRecord("1")).unwrap_err();
    assert_eq!(
        err,
        QuarryError::IncompatibleTypes {
            identifier: "field".into(),
            first_type: ValueType::I32,
            first_target: "IntRecord",
            second_type: ValueType::Text,
            second_target: "TextRecord",
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("IntRecord"));
    assert!(msg.contains("TextRecord"));
}

#[test]
fn incompatible_types_abort_sort() {
    let order = OrderBy::new("order by field").unwrap();
    let mut targets: Vec<Box<dyn Attributes>> =
        vec![Box::new(TextRecord("b")), Box::new(IntRecord(1))];
    let err = order.sort(&mut targets).unwrap_err();
    assert!(matches!(err, QuarryError::IncompatibleTypes { .. }));
    assert_eq!(targets[0].target_name(), "TextRecord");
}

#[test]
fn unsupported_type_in_ordering() {
    let order = OrderBy::new("order by field").unwrap();
    let err = order.compare(&BlobRecord, &BlobRecord).unwrap_err();
    assert_eq!(
        err,
        QuarryError::UnsupportedType {
            identifier: "field".into(),
            value_type: ValueType::Other("Vec<u8>"),
            target: "BlobRecord",
            operator: None,
        }
    );
}

#[test]
fn unknown_accessor_in_ordering() {
    let order = OrderBy::new("order by field()").unwrap();
    let err = order.compare(&IntRecord(1), &IntRecord(2)).unwrap_err();
    assert_eq!(
        err,
        QuarryError::UnknownIdentifier {
            identifier: "field".into(),
            lookup: Lookup::Accessor,
            target: "IntRecord",
        }
    );
}

// ============================================================================
// Comparator and keys
// ============================================================================

#[test]
fn comparator_closure_matches_compare() {
    let order = OrderBy::new("order by color desc, animal").unwrap();
    let cmp = order.comparator::<Pet>();
    let a = pet("Ant", "Red");
    let b = pet("Bee", "Blue");
    assert_eq!(cmp(&a, &b).unwrap(), Ordering::Less);
    assert_eq!(cmp(&a, &a).unwrap(), Ordering::Equal);
    assert_eq!(cmp(&a, &b).unwrap(), order.compare(&a, &b).unwrap());
}

#[test]
fn keys_expose_parsed_clause() {
    let order = OrderBy::compile("order by color desc, nameLength()", true).unwrap();
    let keys = order.keys();
    assert_eq!(keys[0].identifier, "color");
    assert_eq!(keys[0].dir, Dir::Desc);
    assert_eq!(keys[1].lookup, Lookup::Accessor);
    assert_eq!(keys[1].dir, Dir::Asc);
}

#[test]
fn malformed_order_by() {
    for text in ["order by", "order color", "by color", "order by color,", "order by color up"] {
        assert!(OrderBy::new(text).is_err(), "{text:?}");
    }
}
