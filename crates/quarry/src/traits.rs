//! Attribute resolution traits.
//!
//! [`Attributes`] is the capability the evaluator and the ordering engine
//! call to turn an identifier into a [`Value`]. [`Describe`] is its
//! type-level counterpart, used to validate a compiled condition before
//! any instance exists. Both are usually derived with
//! `#[derive(Attributes)]`, but can also be implemented manually.

use crate::error::{QuarryError, Result};
use crate::value::{Value, ValueType};

/// How an identifier is looked up on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// A stored field (`name`).
    Field,
    /// A zero-argument accessor (`name()`).
    Accessor,
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Field => f.write_str("field"),
            Lookup::Accessor => f.write_str("accessor"),
        }
    }
}

/// Trait for types whose attributes can be named in conditions and
/// order-by clauses.
///
/// # Derive Usage
///
/// ```
/// use quarry::{Attributes, Evaluator};
///
/// #[derive(Attributes)]
/// #[quarry(accessors(label_len: usize))]
/// struct Task {
///     label: String,
///     priority: u8,
///     #[quarry(skip)]
///     notes: Vec<String>,
/// }
///
/// impl Task {
///     fn label_len(&self) -> usize {
///         self.label.len()
///     }
/// }
///
/// let task = Task { label: "Write docs".into(), priority: 3, notes: vec![] };
/// let urgent = Evaluator::compile("priority>=3 and label_len()<20", true).unwrap();
/// assert!(urgent.matches(&task).unwrap());
/// ```
///
/// # Manual Implementation
///
/// ```
/// use quarry::{Attributes, IntoValue, Value};
///
/// struct Task {
///     label: String,
///     priority: u8,
/// }
///
/// impl Attributes for Task {
///     fn target_name(&self) -> &'static str {
///         "Task"
///     }
///
///     fn field(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "label" => Some(self.label.as_str().into_value()),
///             "priority" => Some(self.priority.into_value()),
///             _ => None,
///         }
///     }
///
///     fn accessor(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "is_urgent" => Some((self.priority > 4).into_value()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Attributes {
    /// Name of the target's kind, used in diagnostics.
    fn target_name(&self) -> &'static str;

    /// Returns the value of a stored field, or `None` if there is no
    /// field with this name.
    fn field(&self, name: &str) -> Option<Value<'_>>;

    /// Returns the result of a zero-argument accessor, or `None` if there
    /// is no accessor with this name.
    fn accessor(&self, name: &str) -> Option<Value<'_>> {
        let _ = name;
        None
    }

    /// Resolves `name` with the given lookup, reporting a miss as
    /// [`QuarryError::UnknownIdentifier`].
    fn resolve(&self, name: &str, lookup: Lookup) -> Result<Value<'_>> {
        let value = match lookup {
            Lookup::Field => self.field(name),
            Lookup::Accessor => self.accessor(name),
        };
        value.ok_or_else(|| QuarryError::UnknownIdentifier {
            identifier: name.to_string(),
            lookup,
            target: self.target_name(),
        })
    }
}

impl<T: Attributes + ?Sized> Attributes for &T {
    fn target_name(&self) -> &'static str {
        (**self).target_name()
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }

    fn accessor(&self, name: &str) -> Option<Value<'_>> {
        (**self).accessor(name)
    }
}

impl<T: Attributes + ?Sized> Attributes for Box<T> {
    fn target_name(&self) -> &'static str {
        (**self).target_name()
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        (**self).field(name)
    }

    fn accessor(&self, name: &str) -> Option<Value<'_>> {
        (**self).accessor(name)
    }
}

/// Type-level description of a target's attributes.
///
/// Lets [`Evaluator::validate`](crate::Evaluator::validate) check a
/// condition against a type without an instance. Derived alongside
/// [`Attributes`].
pub trait Describe {
    /// Name of the target's kind, matching [`Attributes::target_name`].
    fn type_name() -> &'static str;

    /// Declared type of a stored field.
    fn field_type(name: &str) -> Option<ValueType>;

    /// Declared return type of a zero-argument accessor.
    fn accessor_type(name: &str) -> Option<ValueType> {
        let _ = name;
        None
    }

    /// Declared type for `name` under the given lookup.
    fn attribute_type(name: &str, lookup: Lookup) -> Option<ValueType> {
        match lookup {
            Lookup::Field => Self::field_type(name),
            Lookup::Accessor => Self::accessor_type(name),
        }
    }
}
