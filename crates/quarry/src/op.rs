//! Comparison operators for condition leaves.
//!
//! The [`Operator`] enum covers the seven operators of the condition
//! grammar. Not all operators are valid for all value types.

use std::cmp::Ordering;

/// Comparison operator of a simple condition.
///
/// Operators are grouped by the types they support:
/// - **Ordering**: `Lt`, `Lte`, `Gt`, `Gte`, `Eq` - numbers and strings
///   (`Eq` alone for booleans)
/// - **Containment**: `Contains` (`=~`), `NotContains` (`!~`) - strings
///   only, case-insensitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `=`
    Eq,
    /// `=~`: case-insensitive substring containment.
    Contains,
    /// `!~`: negated case-insensitive substring containment.
    NotContains,
}

impl Operator {
    /// All operators, longest symbols first (the order the parser tries them).
    pub const ALL: [Operator; 7] = [
        Operator::Lte,
        Operator::Gte,
        Operator::Contains,
        Operator::NotContains,
        Operator::Lt,
        Operator::Gt,
        Operator::Eq,
    ];

    /// Returns `true` if this operator is decided by an [`Ordering`].
    pub fn is_ordering_op(self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte | Operator::Eq
        )
    }

    /// Returns `true` if this operator is a substring test.
    pub fn is_containment_op(self) -> bool {
        matches!(self, Operator::Contains | Operator::NotContains)
    }

    /// Evaluates a comparison given an ordering result.
    ///
    /// `ordering` is `value.cmp(literal)`. Containment operators are never
    /// satisfied by an ordering.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::Contains | Operator::NotContains => false,
        }
    }

    /// Like [`eval_ordering`](Self::eval_ordering) but for partially ordered
    /// values; an unordered pair (NaN) never matches.
    pub fn eval_partial(self, ordering: Option<Ordering>) -> bool {
        ordering.is_some_and(|o| self.eval_ordering(o))
    }

    /// Returns the symbol used for this operator in condition text.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Eq => "=",
            Operator::Contains => "=~",
            Operator::NotContains => "!~",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_type_checks() {
        assert!(Operator::Eq.is_ordering_op());
        assert!(Operator::Lte.is_ordering_op());
        assert!(!Operator::Contains.is_ordering_op());

        assert!(Operator::Contains.is_containment_op());
        assert!(Operator::NotContains.is_containment_op());
        assert!(!Operator::Gt.is_containment_op());
    }

    #[test]
    fn op_eval_ordering() {
        // Equal
        assert!(Operator::Eq.eval_ordering(Ordering::Equal));
        assert!(!Operator::Eq.eval_ordering(Ordering::Less));
        assert!(!Operator::Eq.eval_ordering(Ordering::Greater));

        // Greater than
        assert!(!Operator::Gt.eval_ordering(Ordering::Equal));
        assert!(!Operator::Gt.eval_ordering(Ordering::Less));
        assert!(Operator::Gt.eval_ordering(Ordering::Greater));

        // Greater than or equal
        assert!(Operator::Gte.eval_ordering(Ordering::Equal));
        assert!(!Operator::Gte.eval_ordering(Ordering::Less));
        assert!(Operator::Gte.eval_ordering(Ordering::Greater));

        // Less than
        assert!(!Operator::Lt.eval_ordering(Ordering::Equal));
        assert!(Operator::Lt.eval_ordering(Ordering::Less));
        assert!(!Operator::Lt.eval_ordering(Ordering::Greater));

        // Less than or equal
        assert!(Operator::Lte.eval_ordering(Ordering::Equal));
        assert!(Operator::Lte.eval_ordering(Ordering::Less));
        assert!(!Operator::Lte.eval_ordering(Ordering::Greater));

        assert!(!Operator::Contains.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn op_eval_partial_rejects_unordered() {
        assert!(Operator::Lte.eval_partial(Some(Ordering::Less)));
        for op in Operator::ALL {
            assert!(!op.eval_partial(None));
        }
    }

    #[test]
    fn op_display() {
        assert_eq!(Operator::Lte.to_string(), "<=");
        assert_eq!(Operator::Contains.to_string(), "=~");
        assert_eq!(Operator::NotContains.to_string(), "!~");
    }
}
