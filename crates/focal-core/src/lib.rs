//! Core value model for Focal.
//!
//! The data domain the optics operate on: scalars, ordered sequences, keyed
//! mappings, positional tuples, and tagged variants (tuples whose first
//! element is an [`Atom`] discriminator). This crate knows nothing about
//! paths or optics; it only defines the values they traverse.

mod atom;
mod json;
mod value;

pub use atom::{Atom, MapKey};
pub use value::Value;

#[cfg(test)]
mod json_tests;
