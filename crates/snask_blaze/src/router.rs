//! Route table lookup and handler indirection.

use crate::request::Request;
use crate::response::{Response, build_response};
use snask_core::Value;
use snask_runtime::Dispatcher;
use snask_runtime::json::{self, JsonError};

/// Routes keyed `"METHOD /path"` or `"/path"`. Values are a literal string
/// body, a `{"handler": name}` indirection, or a response descriptor.
#[derive(Clone, Debug, Default)]
pub struct Router {
    routes: Value,
}

impl Router {
    /// Anything other than an object gives an empty table.
    pub fn new(routes: Value) -> Self {
        let routes = if routes.is_obj() { routes } else { Value::new_object() };
        Self { routes }
    }

    pub fn from_json(text: &str) -> Result<Self, JsonError> {
        Ok(Self::new(json::parse(text)?))
    }

    pub fn len(&self) -> usize {
        self.routes.len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact `"METHOD /path"` first, then the method-less `"/path"`.
    pub fn lookup(&self, method: &str, path: &str) -> Option<Value> {
        let table = self.routes.as_object()?.read();
        let exact = format!("{} {}", method, path);
        table.get(&exact).or_else(|| table.get(path)).cloned()
    }

    /// Routes and, for handler routes, dispatches. A missing route and a
    /// handler that resolves to nothing are both 404.
    pub fn respond(&self, req: &Request, dispatcher: &Dispatcher) -> Response {
        let Some(route) = self.lookup(&req.method, &req.path) else {
            return Response::not_found();
        };
        let value = match handler_name(&route) {
            Some(name) => {
                let args = [
                    Value::str(req.method.as_str()),
                    Value::str(req.path.as_str()),
                    Value::str(req.query.as_str()),
                    Value::str(req.body.as_str()),
                    Value::str(req.cookie()),
                    req.headers_value(),
                ];
                let result = dispatcher.call(&name, &args);
                if result.is_nil() {
                    tracing::debug!(handler = %name, path = %req.path, "handler produced nil");
                    return Response::not_found();
                }
                result
            }
            None => route,
        };
        build_response(&value)
    }
}

fn handler_name(route: &Value) -> Option<String> {
    route.as_object()?.get("handler").as_str().map(str::to_string)
}
