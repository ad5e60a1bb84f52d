//! Quarry - compiled filter conditions and order-by clauses for Rust structs.
//!
//! Quarry turns short textual expressions into reusable, immutable
//! objects and evaluates them against in-memory values:
//!
//! - Conditions like `priority>=3 and name=~'bug'` compile into an
//!   [`Evaluator`]
//! - Order-by clauses like `order by priority desc, name` compile into an
//!   [`OrderBy`]
//! - Identifiers are resolved at evaluation time through the
//!   [`Attributes`] trait, either as stored fields (`name`) or as
//!   zero-argument accessors (`name()`)
//!
//! # Quick Start
//!
//! ```rust
//! use quarry::{Attributes, Evaluator, OrderBy};
//!
//! #[derive(Attributes)]
//! #[quarry(accessors(is_old: bool))]
//! struct Task {
//!     name: String,
//!     priority: i32,
//!     age_days: u32,
//! }
//!
//! impl Task {
//!     fn is_old(&self) -> bool {
//!         self.age_days > 30
//!     }
//! }
//!
//! let mut tasks = vec![
//!     Task { name: "Write docs".into(), priority: 3, age_days: 2 },
//!     Task { name: "Fix bug".into(), priority: 5, age_days: 40 },
//!     Task { name: "Old task".into(), priority: 1, age_days: 90 },
//! ];
//!
//! let urgent = Evaluator::compile("priority>=3 or is_old()='true'", true).unwrap();
//! assert!(urgent.matches(&tasks[0]).unwrap());
//!
//! OrderBy::new("order by priority desc").unwrap().sort(&mut tasks).unwrap();
//! assert_eq!(tasks[0].name, "Fix bug");
//! ```
//!
//! # Condition Syntax
//!
//! ```text
//! condition := simple ((AND | OR) simple)*
//! simple    := identifier['()'] operator literal
//! literal   := 'quoted text' | 123 | 1.5
//! ```
//!
//! AND binds tighter than OR. Keywords are case-insensitive and `''`
//! inside a quoted literal is a single quote. Parentheses are accepted
//! only where [`Condition::render`] puts them.
//!
//! # Types and Operators
//!
//! The literal is decoded at the type of the resolved value.
//!
//! | Type | Operators |
//! |------|-----------|
//! | integers (`i8`..`u64`) | `<`, `<=`, `>`, `>=`, `=` |
//! | floats (`f32`, `f64`) | `<`, `<=`, `>`, `>=`, `=` |
//! | `bool` | `=` |
//! | strings | `<`, `<=`, `>`, `>=`, `=`, `=~`, `!~` |
//! | [`Timestamp`] | none (orderable only) |
//!
//! `=~` and `!~` test case-insensitive containment. Integer literals
//! accept `0x`/`#` hex and leading-zero octal.
//!
//! # Errors
//!
//! Compilation returns a [`ParseError`]. Evaluation and ordering return a
//! [`QuarryError`] when an identifier is missing, a type has no meaning
//! for an operator or an ordering, two targets disagree on a key's type,
//! or a literal cannot be decoded.

mod compare;
mod condition;
mod error;
mod evaluator;
mod filter;
mod op;
mod ordering;
pub mod parser;
mod traits;
mod value;

// Re-export public API
pub use condition::{Comparison, Condition, Literal, Resolver};
pub use error::{ClauseKind, ParseError, QuarryError, Result};
pub use evaluator::Evaluator;
pub use filter::{Filter, FilterView};
pub use op::Operator;
pub use ordering::{compare_values, Dir, IdentifierOrder, OrderBy};
pub use traits::{Attributes, Describe, Lookup};
pub use value::{Float, Integer, IntoValue, Timestamp, Typed, Value, ValueType};

pub use quarry_macros::Attributes;
