//! Snask native runtime.
//!
//! Everything compiled Snask code links against lives here: the JSON engine,
//! the native builtin library, `f_<name>` dynamic dispatch and native threads.

#![allow(clippy::new_without_default)]
#![allow(clippy::unwrap_or_default)]

mod builtins;
pub mod builtins_registry;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod json;
mod runtime;
pub mod thread;

pub use snask_core;
pub use snask_core::{HeapStats, Object, ObjectRef, Str, Value};

pub use builtins_registry::{
    BuiltinFn, BuiltinProvider, BuiltinRegistry, BuiltinTable, StdBuiltinProvider,
};
pub use config::RuntimeConfig;
pub use dispatch::{Dispatcher, ScriptFunction};
pub use json::JsonError;
pub use runtime::Runtime;
pub use thread::ThreadTable;
