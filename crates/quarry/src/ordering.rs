//! Multi-key ordering of attribute targets.
//!
//! Provides [`Dir`] for sort direction, [`IdentifierOrder`] for a single
//! key and [`OrderBy`] for a compiled `order by` clause.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{ParseError, QuarryError, Result};
use crate::parser::parse_order_by;
use crate::traits::{Attributes, Lookup};
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One key of an order-by clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierOrder {
    /// Attribute name, without any `()` suffix.
    pub identifier: String,
    /// Whether the attribute is a stored field or an accessor call.
    pub lookup: Lookup,
    /// The sort direction for this key.
    pub dir: Dir,
}

impl IdentifierOrder {
    /// Compares `a` and `b` on this key alone, direction applied.
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Result<Ordering>
    where
        A: Attributes + ?Sized,
        B: Attributes + ?Sized,
    {
        let left = a.resolve(&self.identifier, self.lookup)?;
        let right = b.resolve(&self.identifier, self.lookup)?;
        let ordering = compare_values(
            &self.identifier,
            (&left, a.target_name()),
            (&right, b.target_name()),
        )?;
        Ok(self.dir.apply(ordering))
    }
}

impl fmt::Display for IdentifierOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)?;
        if self.lookup == Lookup::Accessor {
            f.write_str("()")?;
        }
        if self.dir.is_desc() {
            write!(f, " {}", self.dir)?;
        }
        Ok(())
    }
}

/// A compiled `order by` clause.
///
/// # Example
///
/// ```
/// use quarry::{Attributes, OrderBy};
///
/// #[derive(Attributes)]
/// struct Pet {
///     animal: String,
///     color: String,
/// }
///
/// let pet = |animal: &str, color: &str| Pet { animal: animal.into(), color: color.into() };
/// let mut pets = vec![pet("Dog", "Red"), pet("Aardvark", "Blue"), pet("Dog", "Blue")];
///
/// OrderBy::new("order by color, animal desc").unwrap().sort(&mut pets).unwrap();
///
/// let order: Vec<_> = pets.iter().map(|p| (p.animal.as_str(), p.color.as_str())).collect();
/// assert_eq!(order, vec![("Dog", "Blue"), ("Aardvark", "Blue"), ("Dog", "Red")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    keys: Vec<IdentifierOrder>,
}

impl OrderBy {
    /// Compiles `text` with accessor calls enabled.
    pub fn new(text: &str) -> std::result::Result<Self, ParseError> {
        Self::compile(text, true)
    }

    /// Compiles `text`; `accessor_calls` enables the `name()` syntax.
    pub fn compile(text: &str, accessor_calls: bool) -> std::result::Result<Self, ParseError> {
        parse_order_by(text, accessor_calls).map(|keys| OrderBy { keys })
    }

    /// The keys, highest priority first.
    pub fn keys(&self) -> &[IdentifierOrder] {
        &self.keys
    }

    /// Compares two targets key by key. The first key that differs
    /// decides; if every key is equal the targets are equal.
    ///
    /// Fails if a key is missing on either target, resolves to a type
    /// without an ordering, or resolves to types that cannot be ordered
    /// against each other.
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Result<Ordering>
    where
        A: Attributes + ?Sized,
        B: Attributes + ?Sized,
    {
        for key in &self.keys {
            let ordering = key.compare(a, b)?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }

    /// [`compare`](Self::compare) as a closure.
    pub fn comparator<T>(&self) -> impl Fn(&T, &T) -> Result<Ordering> + '_
    where
        T: Attributes + ?Sized,
    {
        move |a, b| self.compare(a, b)
    }

    /// Stable sort of `items` by this clause.
    ///
    /// If any comparison fails the first error is returned and `items` is
    /// left in its original order.
    pub fn sort<T: Attributes>(&self, items: &mut Vec<T>) -> Result<()> {
        let mut failure = None;
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&i, &j| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            self.compare(&items[i], &items[j]).unwrap_or_else(|err| {
                failure = Some(err);
                Ordering::Equal
            })
        });
        if let Some(err) = failure {
            tracing::debug!(order_by = %self, error = %err, "sort aborted");
            return Err(err);
        }

        let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
        items.extend(order.into_iter().filter_map(|i| slots[i].take()));
        tracing::trace!(order_by = %self, len = items.len(), "sorted");
        Ok(())
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("order by ")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(key, f)?;
        }
        Ok(())
    }
}

/// Compares two values resolved for `identifier`, each paired with the
/// name of the target it came from.
///
/// Integers of any width compare numerically, as do floats (using a total
/// order). Other kinds only compare with themselves.
pub fn compare_values(
    identifier: &str,
    (a, a_target): (&Value<'_>, &'static str),
    (b, b_target): (&Value<'_>, &'static str),
) -> Result<Ordering> {
    match (a, b) {
        (Value::Other(_), _) => Err(unsupported(identifier, a, a_target)),
        (_, Value::Other(_)) => Err(unsupported(identifier, b, b_target)),
        (Value::Integer(x), Value::Integer(y)) => Ok(x.value().cmp(&y.value())),
        (Value::Float(x), Value::Float(y)) => Ok(x.total_cmp(*y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Text(x), Value::Text(y)) => Ok(x.cmp(y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Ok(x.cmp(y)),
        _ => Err(QuarryError::IncompatibleTypes {
            identifier: identifier.to_string(),
            first_type: a.value_type(),
            first_target: a_target,
            second_type: b.value_type(),
            second_target: b_target,
        }),
    }
}

fn unsupported(identifier: &str, value: &Value<'_>, target: &'static str) -> QuarryError {
    QuarryError::UnsupportedType {
        identifier: identifier.to_string(),
        value_type: value.value_type(),
        target,
        operator: None,
    }
}
