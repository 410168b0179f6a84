//! Name-based dispatch into script-defined functions.
//!
//! Compiled script functions are exported under `f_<name>`. Native callers
//! (the HTTP server, spawned threads, UI callbacks) know only the short name;
//! the dispatcher maps it to the exported symbol and invokes it with a fixed
//! number of positional arguments. An unknown name is not an error: the call
//! simply yields `Nil`.

use ahash::RandomState;
use hashbrown::HashMap;
use smallvec::SmallVec;
use snask_core::Value;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Prefix every exported script function carries. This is the only naming
/// contract between the runtime and the compiler producing the functions.
pub const SYMBOL_PREFIX: &str = "f_";

/// Arity of server request handlers: method, path, query, body, cookie, headers.
pub const HANDLER_ARITY: usize = 6;

pub type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

pub type Args = SmallVec<[Value; HANDLER_ARITY]>;

#[derive(Clone)]
pub struct ScriptFunction {
    pub symbol: String,
    pub arity: usize,
    fun: Arc<NativeFn>,
}

impl ScriptFunction {
    /// Calls with exactly `arity` inputs: missing ones are `Nil`, extras are dropped.
    pub fn invoke(&self, args: &[Value]) -> Value {
        let padded: Args = (0..self.arity)
            .map(|i| args.get(i).cloned().unwrap_or_default())
            .collect();
        (self.fun)(&padded)
    }
}

impl std::fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptFunction")
            .field("symbol", &self.symbol)
            .field("arity", &self.arity)
            .finish()
    }
}

pub fn symbol_for(name: &str) -> String {
    let mut s = String::with_capacity(SYMBOL_PREFIX.len() + name.len());
    s.push_str(SYMBOL_PREFIX);
    s.push_str(name);
    s
}

#[derive(Default)]
pub struct Dispatcher {
    table: HashMap<String, ScriptFunction, RandomState>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `fun` as the script function `name` (exported as `f_<name>`).
    pub fn register<F>(&mut self, name: &str, arity: usize, fun: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.register_symbol(&symbol_for(name), arity, fun)
    }

    /// Registers under a raw exported symbol, as a compiler-generated table would.
    pub fn register_symbol<F>(&mut self, symbol: &str, arity: usize, fun: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.table.insert(
            symbol.to_string(),
            ScriptFunction {
                symbol: symbol.to_string(),
                arity,
                fun: Arc::new(fun),
            },
        );
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&ScriptFunction> {
        self.table.get(symbol_for(name).as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Resolves and invokes synchronously. Unresolved names and callees that
    /// panic both produce `Nil`.
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        let Some(func) = self.resolve(name) else {
            tracing::debug!(name, symbol = %symbol_for(name), "dispatch: no such function");
            return Value::Nil;
        };
        tracing::trace!(symbol = %func.symbol, arity = func.arity, "dispatch");
        match catch_unwind(AssertUnwindSafe(|| func.invoke(args))) {
            Ok(v) => v,
            Err(_) => {
                tracing::error!(symbol = %func.symbol, "dispatch: callee panicked");
                Value::Nil
            }
        }
    }

    pub fn call0(&self, name: &str) -> Value {
        self.call(name, &[])
    }

    pub fn call1(&self, name: &str, arg: Value) -> Value {
        self.call(name, &[arg])
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_name_yields_nil() {
        let d = Dispatcher::new();
        assert!(d.call("missing", &[Value::str("x")]).is_nil());
        assert!(d.call0("missing").is_nil());
    }

    #[test]
    fn names_are_resolved_through_the_prefix() {
        let mut d = Dispatcher::new();
        d.register("greet", 1, |args| {
            snask_core::ops::concat(&Value::str("hi "), &args[0])
        });
        assert_eq!(d.symbols(), vec!["f_greet".to_string()]);
        assert!(d.resolve("greet").is_some());
        assert!(d.resolve("f_greet").is_none());
        assert_eq!(d.call1("greet", Value::str("bo")), Value::str("hi bo"));
    }

    #[test]
    fn raw_symbols_resolve_by_short_name() {
        let mut d = Dispatcher::new();
        d.register_symbol("f_zero", 0, |_| Value::from_i64(0));
        assert_eq!(d.call0("zero"), Value::from_i64(0));
    }

    #[test]
    fn arguments_are_padded_and_truncated_to_arity() {
        let mut d = Dispatcher::new();
        d.register("count", 3, |args| {
            let nils = args.iter().filter(|a| a.is_nil()).count();
            Value::from_i64(args.len() as i64 * 10 + nils as i64)
        });
        assert_eq!(d.call("count", &[Value::from_i64(1)]), Value::from_i64(32));
        let many = [Value::Bool(true), Value::Bool(true), Value::Bool(true), Value::Bool(true)];
        assert_eq!(d.call("count", &many), Value::from_i64(30));
    }

    #[test]
    fn panicking_callee_yields_nil() {
        let mut d = Dispatcher::new();
        d.register("boom", 0, |_| panic!("boom"));
        assert!(d.call0("boom").is_nil());
    }
}
