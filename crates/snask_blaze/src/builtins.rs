use crate::config::BlazeConfig;
use crate::fields::{cookie_get, query_get};
use crate::router::Router;
use crate::server::Server;
use snask_core::Value;
use snask_runtime::{BuiltinProvider, BuiltinRegistry, Runtime};

/// Script-facing server functions, installed next to the standard library.
pub struct BlazeBuiltinProvider;

impl BuiltinProvider for BlazeBuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry) {
        registry.register("blaze_qs_get", builtin_blaze_qs_get);
        registry.register("blaze_cookie_get", builtin_blaze_cookie_get);
        registry.register("blaze_run", builtin_blaze_run);
    }
}

fn lookup(
    args: &[Value],
    name: &str,
    find: for<'a> fn(&'a str, &str) -> Option<&'a str>,
) -> Result<Value, String> {
    if args.len() != 2 {
        return Err(format!("{} expects 2 arguments", name));
    }
    let (Some(text), Some(key)) = (args[0].as_str(), args[1].as_str()) else {
        return Ok(Value::Nil);
    };
    Ok(find(text, key).map(Value::str).unwrap_or_default())
}

fn builtin_blaze_qs_get(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    lookup(args, "blaze_qs_get", query_get)
}

fn builtin_blaze_cookie_get(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    lookup(args, "blaze_cookie_get", cookie_get)
}

/// `blaze_run(port, routes)`: serves forever. Returns `false` only when the
/// port is unusable or the listener cannot be bound.
fn builtin_blaze_run(rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    if args.len() != 2 {
        return Err("blaze_run expects 2 arguments".into());
    }
    let port = match args[0].as_index() {
        Some(p) if p <= u16::MAX as usize => p as u16,
        _ => return Ok(Value::Bool(false)),
    };
    let config = BlazeConfig::new(port);
    let server = match Server::bind(config, Router::new(args[1].clone()), rt.dispatcher().clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "blaze_run");
            return Ok(Value::Bool(false));
        }
    };
    Ok(Value::Bool(server.run().is_ok()))
}
