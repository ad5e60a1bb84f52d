//! Compiled conditions evaluated against attribute targets.

use crate::compare::compare;
use crate::condition::{Comparison, Condition, Resolver};
use crate::error::{ParseError, QuarryError, Result};
use crate::filter::{Filter, FilterView};
use crate::parser::parse_condition;
use crate::traits::{Attributes, Describe};

/// A condition compiled once and evaluated any number of times.
///
/// Compilation parses the text; a malformed condition never produces an
/// `Evaluator`. Evaluation resolves each identifier on the target, decodes
/// the literal at the resolved value's type and applies the operator.
///
/// # Example
///
/// ```
/// use quarry::{Attributes, Evaluator};
///
/// #[derive(Attributes)]
/// struct Animal {
///     name: String,
///     legs: u8,
/// }
///
/// let animals = vec![
///     Animal { name: "cat".into(), legs: 4 },
///     Animal { name: "bat".into(), legs: 2 },
///     Animal { name: "snake".into(), legs: 0 },
/// ];
///
/// let evaluator = Evaluator::new("name=~'AT' and legs>2").unwrap();
/// let names: Vec<_> = evaluator
///     .filter(&animals, true)
///     .map(|a| a.map(|a| a.name.as_str()))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(names, vec!["cat"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluator {
    condition: Condition,
}

impl Evaluator {
    /// Compiles `text` with accessor calls disabled.
    pub fn new(text: &str) -> std::result::Result<Self, ParseError> {
        Self::compile(text, false)
    }

    /// Compiles `text`; `accessor_calls` enables the `name()` syntax.
    pub fn compile(text: &str, accessor_calls: bool) -> std::result::Result<Self, ParseError> {
        parse_condition(text, accessor_calls).map(Self::from_condition)
    }

    /// Wraps an already built condition.
    pub fn from_condition(condition: Condition) -> Self {
        Evaluator { condition }
    }

    /// The compiled condition tree.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Evaluates the condition against `target`.
    ///
    /// Fails with [`QuarryError::UnknownIdentifier`] when the target lacks
    /// an attribute, [`QuarryError::UnsupportedType`] when the operator has
    /// no meaning for the attribute's type, and
    /// [`QuarryError::InvalidLiteral`] when the literal cannot be read at
    /// that type. Only the comparisons needed to decide the result are
    /// evaluated.
    pub fn matches<T: Attributes + ?Sized>(&self, target: &T) -> Result<bool> {
        self.condition.is_true(&Target(target))
    }

    /// Checks every referenced attribute against the description of `D`
    /// without evaluating anything.
    ///
    /// Returns one error per missing attribute and per attribute whose
    /// declared type cannot appear in a condition. An empty list means
    /// every identifier resolves.
    pub fn validate<D: Describe>(&self) -> Vec<QuarryError> {
        let mut problems = Vec::new();
        for (identifier, lookup) in self.condition.references() {
            match D::attribute_type(identifier, lookup) {
                None => problems.push(QuarryError::UnknownIdentifier {
                    identifier: identifier.to_string(),
                    lookup,
                    target: D::type_name(),
                }),
                Some(value_type) if !value_type.supports_conditions() => {
                    problems.push(QuarryError::UnsupportedType {
                        identifier: identifier.to_string(),
                        value_type,
                        target: D::type_name(),
                        operator: None,
                    })
                }
                Some(_) => {}
            }
        }
        tracing::debug!(
            target_type = D::type_name(),
            problems = problems.len(),
            "validated condition"
        );
        problems
    }

    /// Lazily yields the elements of `source` whose match result equals
    /// `matching`, in source order.
    pub fn filter<I>(&self, source: I, matching: bool) -> Filter<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Attributes,
    {
        Filter::new(self, source.into_iter(), matching)
    }

    /// A restartable filtered view over `collection`; every pass through
    /// the view re-evaluates from the start.
    pub fn filter_view<'e, 'c, T>(&'e self, collection: &'c [T], matching: bool) -> FilterView<'e, 'c, T>
    where
        T: Attributes,
    {
        FilterView::new(self, collection, matching)
    }
}

impl std::fmt::Display for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.condition, f)
    }
}

/// Resolves comparisons on a single target.
struct Target<'t, T: ?Sized>(&'t T);

impl<T: Attributes + ?Sized> Resolver for Target<'_, T> {
    fn is_true(&self, comparison: &Comparison) -> Result<bool> {
        let target = self.0;
        let value = target.resolve(&comparison.identifier, comparison.lookup)?;
        let result = compare(comparison, &value, target.target_name())?;
        tracing::trace!(
            target_type = target.target_name(),
            comparison = %comparison,
            value = %value,
            result,
            "evaluated comparison"
        );
        Ok(result)
    }
}
