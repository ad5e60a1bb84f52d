//! Implementation of the `#[derive(Attributes)]` macro.
//!
//! This module provides derive macro support for quarry, generating
//! attribute lookup and type description from struct fields.

mod attrs;
mod derive;

pub use derive::attributes_derive_impl;
