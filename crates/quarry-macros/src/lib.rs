//! Proc macros for quarry.
//!
//! # Available Macros
//!
//! - [`Attributes`] - Expose struct fields and accessors to quarry
//!   conditions and order-by clauses

mod attributes;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `quarry::Attributes` and `quarry::Describe` for a struct with
/// named fields.
///
/// Every field is exposed under its own name unless marked otherwise.
/// Field types must implement `quarry::IntoValue` (by reference) and
/// `quarry::Typed`; use `opaque` or `skip` for anything else.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Hide the field |
/// | `rename = "..."` | Expose the field under another name |
/// | `opaque` | Expose a field of any type; it resolves but cannot be compared or ordered |
///
/// # Struct Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `name = "..."` | Target name used in error messages (default: struct name) |
/// | `accessors(method: Type, ...)` | Register zero-argument methods as accessors |
///
/// # Example
///
/// ```ignore
/// use quarry::{Attributes, Evaluator, OrderBy};
///
/// #[derive(Attributes)]
/// #[quarry(name = "Animal", accessors(leg_count: usize))]
/// struct Pet {
///     #[quarry(rename = "kind")]
///     animal: String,
///     color: String,
///     #[quarry(opaque)]
///     photo: Vec<u8>,
///     #[quarry(skip)]
///     legs: Vec<Leg>,
/// }
///
/// impl Pet {
///     fn leg_count(&self) -> usize {
///         self.legs.len()
///     }
/// }
///
/// let four_legged = Evaluator::compile("leg_count()=4 and kind=~'DOG'", true)?;
/// let by_color = OrderBy::new("order by color, kind desc")?;
/// ```
#[proc_macro_derive(Attributes, attributes(quarry))]
pub fn attributes_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    attributes::attributes_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
