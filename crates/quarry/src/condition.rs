//! Condition syntax tree.
//!
//! A [`Condition`] is produced by [`parse_condition`](crate::parser::parse_condition)
//! and never mutated afterwards. Evaluation is delegated leaf by leaf to a
//! [`Resolver`]; the tree itself only knows how to combine the answers.

use std::collections::HashSet;
use std::fmt;

use crate::error::Result;
use crate::op::Operator;
use crate::traits::Lookup;

/// Literal operand of a comparison, as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// Single-quoted text, with `''` already unescaped to `'`.
    Text(String),
    /// Bare numeric token: digits with an optional fractional part.
    Number(String),
}

impl Literal {
    /// The literal's text, without quotes.
    pub fn text(&self) -> &str {
        match self {
            Literal::Text(s) | Literal::Number(s) => s,
        }
    }

    /// Renders the literal single-quoted, doubling embedded quotes.
    pub fn quoted(&self) -> String {
        format!("'{}'", self.text().replace('\'', "''"))
    }
}

/// A leaf comparison: `identifier operator literal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparison {
    /// Attribute name, without any `()` suffix.
    pub identifier: String,
    /// Whether the attribute is a stored field or an accessor call.
    pub lookup: Lookup,
    /// The comparison operator.
    pub operator: Operator,
    /// The right-hand literal.
    pub literal: Literal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)?;
        if self.lookup == Lookup::Accessor {
            f.write_str("()")?;
        }
        write!(f, "{}{}", self.operator, self.literal.quoted())
    }
}

/// Decides a single [`Comparison`] against some target.
///
/// The evaluator implements this for attribute targets; tests and callers
/// with their own notion of truth can pass a closure.
pub trait Resolver {
    fn is_true(&self, comparison: &Comparison) -> Result<bool>;
}

impl<F> Resolver for F
where
    F: Fn(&Comparison) -> Result<bool>,
{
    fn is_true(&self, comparison: &Comparison) -> Result<bool> {
        self(comparison)
    }
}

/// Boolean condition tree.
///
/// Trees from the parser, [`Condition::and`] and [`Condition::or`] never
/// hold an `And` or `Or` with fewer than two children; a single operand is
/// represented by the operand itself. Building the variants directly skips
/// that check, and an empty `And` is then true and an empty `Or` false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// A single comparison.
    Simple(Comparison),
    /// True when every child is true. Built with two or more children.
    And(Vec<Condition>),
    /// True when any child is true. Built with two or more children.
    Or(Vec<Condition>),
}

impl Condition {
    /// Conjunction of `children`, or `None` if there are none.
    ///
    /// A single child is returned unwrapped.
    pub fn and(children: Vec<Condition>) -> Option<Condition> {
        Self::combine(children, Condition::And)
    }

    /// Disjunction of `children`, or `None` if there are none.
    ///
    /// A single child is returned unwrapped.
    pub fn or(children: Vec<Condition>) -> Option<Condition> {
        Self::combine(children, Condition::Or)
    }

    fn combine(mut children: Vec<Condition>, build: fn(Vec<Condition>) -> Condition) -> Option<Condition> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(build(children)),
        }
    }

    /// Evaluates the tree left to right.
    ///
    /// `And` stops at the first false child and `Or` at the first true
    /// one, so the resolver is not consulted for the remaining children.
    /// Resolver errors are returned as-is.
    pub fn is_true<R: Resolver + ?Sized>(&self, resolver: &R) -> Result<bool> {
        match self {
            Condition::Simple(comparison) => resolver.is_true(comparison),
            Condition::And(children) => {
                for child in children {
                    if !child.is_true(resolver)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Or(children) => {
                for child in children {
                    if child.is_true(resolver)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Identifiers in order of first occurrence, without duplicates.
    ///
    /// A field and an accessor with the same name count once.
    pub fn collect_identifiers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.comparisons()
            .map(|c| c.identifier.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Distinct `(identifier, lookup)` pairs in order of first occurrence.
    pub fn references(&self) -> Vec<(&str, Lookup)> {
        let mut seen = HashSet::new();
        self.comparisons()
            .map(|c| (c.identifier.as_str(), c.lookup))
            .filter(|pair| seen.insert(*pair))
            .collect()
    }

    /// All leaves, depth first, left to right.
    pub fn comparisons(&self) -> impl Iterator<Item = &Comparison> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                match node {
                    Condition::Simple(comparison) => return Some(comparison),
                    Condition::And(children) | Condition::Or(children) => {
                        stack.extend(children.iter().rev());
                    }
                }
            }
            None
        })
    }

    /// Canonical text form. Literals are always quoted and groups are
    /// parenthesized, so the output re-parses (with accessor calls
    /// enabled) to an equivalent tree.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, joiner) = match self {
            Condition::Simple(comparison) => return fmt::Display::fmt(comparison, f),
            Condition::And(children) => (children, " AND "),
            Condition::Or(children) => (children, " OR "),
        };
        f.write_str("(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(joiner)?;
            }
            fmt::Display::fmt(child, f)?;
        }
        f.write_str(")")
    }
}
