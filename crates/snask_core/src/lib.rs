//! Core types for the Snask runtime.
//!
//! This crate contains the value model shared by every other part of the runtime:
//! - `Value` - the single tagged runtime datum (nil, number, bool, string, object)
//! - `Object` / `ObjectRef` - ordered association container used for objects and arrays
//! - `heap` - process-wide allocation accounting for strings and objects
//! - `ops` - coercing arithmetic, comparison and concatenation helpers

pub mod heap;
pub mod object;
pub mod ops;
pub mod path;
pub mod value;

pub use heap::HeapStats;
pub use object::{Object, ObjectRef};
pub use path::path_get;
pub use value::{Str, Value};
