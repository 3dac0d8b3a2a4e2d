//! Focal: select and transform nested heterogeneous data with a compact
//! path language.
//!
//! A path names one or more foci inside a value tree; [`select`] returns the
//! focused values and [`transform`] rewrites them in place, leaving the rest
//! of the tree untouched.
//!
//! # Example
//!
//! ```
//! use focal::Value;
//!
//! let data = Value::from_json(serde_json::json!({
//!     "users": [{"name": "a", "age": 3}, {"name": "b", "age": 5}]
//! }));
//!
//! let names = focal::select(&data, "users[*].name").expect("valid path");
//! assert_eq!(names, Value::seq([Value::str("a"), Value::str("b")]));
//!
//! let older = focal::transform(&data, "users[*].age", |age| match age {
//!     Value::Int(n) => Value::Int(n + 1),
//!     other => other,
//! })
//! .expect("valid path");
//! assert_eq!(focal::select(&older, "users[1].age").unwrap(), Value::Int(6));
//! ```

pub mod convert;
pub mod engine;
pub mod expr;
pub mod optic;
pub mod parser;

mod error;
mod facade;
mod options;

#[cfg(test)]
mod facade_tests;

pub use focal_core::{Atom, MapKey, Value};

pub use engine::{CollectTracer, NoopTracer, Tracer, Wrapped};
pub use error::{Error, Result};
pub use expr::Expr;
pub use facade::{Path, select, select_with, transform, transform_with};
pub use optic::{Filter, Index, IsoOptic, Optic, Pattern, Prism, Sequence};
pub use options::{Bindings, IsoPair, Options};
pub use parser::Span;
