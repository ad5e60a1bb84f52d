//! Error types for the quarry crate.

use thiserror::Error;

use crate::op::Operator;
use crate::traits::Lookup;
use crate::value::ValueType;

/// Which grammar a [`ParseError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// A boolean filter condition such as `a>3 and b='x'`.
    Condition,
    /// An order-by clause such as `order by a, b desc`.
    OrderBy,
}

impl std::fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClauseKind::Condition => f.write_str("condition"),
            ClauseKind::OrderBy => f.write_str("order-by clause"),
        }
    }
}

/// Malformed condition or order-by text.
///
/// Returned synchronously by the compile functions; no partially built
/// tree is ever produced alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {kind} {input:?} (stopped at byte {offset})")]
pub struct ParseError {
    kind: ClauseKind,
    input: String,
    offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ClauseKind, input: &str, offset: usize) -> Self {
        ParseError {
            kind,
            input: input.to_string(),
            offset,
        }
    }

    /// The grammar that rejected the input.
    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    /// The offending input, verbatim.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset into [`input`](Self::input) where parsing stopped.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Errors that can occur when compiling or evaluating conditions and orderings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuarryError {
    /// Condition or order-by text did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The target has no field or accessor with this name.
    #[error("identifier '{identifier}' has no matching {lookup} on {target}")]
    UnknownIdentifier {
        identifier: String,
        lookup: Lookup,
        target: &'static str,
    },

    /// The resolved value's type has no semantics for the requested
    /// operator, or no natural ordering at all.
    #[error("{}", unsupported_message(.identifier, .value_type, .target, .operator))]
    UnsupportedType {
        identifier: String,
        value_type: ValueType,
        target: &'static str,
        /// The operator being applied, if any. `None` for orderings and
        /// dry-run validation.
        operator: Option<Operator>,
    },

    /// Two values resolved for the same key are each orderable but cannot
    /// be ordered against one another.
    #[error(
        "identifier '{identifier}' resolves to incompatible types: {first_type} on {first_target}, {second_type} on {second_target}"
    )]
    IncompatibleTypes {
        identifier: String,
        first_type: ValueType,
        first_target: &'static str,
        second_type: ValueType,
        second_target: &'static str,
    },

    /// The literal cannot be read as a value of the resolved type.
    #[error("literal '{literal}' for identifier '{identifier}' is not a valid {value_type}")]
    InvalidLiteral {
        identifier: String,
        literal: String,
        value_type: ValueType,
    },

    /// A filter was advanced past its last element.
    #[error("no more elements")]
    Exhausted,
}

fn unsupported_message(
    identifier: &str,
    value_type: &ValueType,
    target: &str,
    operator: &Option<Operator>,
) -> String {
    match operator {
        Some(op) => format!(
            "operator '{op}' is not supported for identifier '{identifier}' of type {value_type} on {target}"
        ),
        None => format!("identifier '{identifier}' has unsupported type {value_type} on {target}"),
    }
}

/// Result type for quarry operations.
pub type Result<T> = std::result::Result<T, QuarryError>;
