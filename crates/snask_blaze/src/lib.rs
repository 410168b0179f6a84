//! Blaze: the embedded HTTP/1.1 server of the Snask runtime.
//!
//! Requests are routed through a route table built from ordinary `Value`s
//! and may be handed to script functions through the runtime dispatcher.

pub mod builtins;
pub mod config;
pub mod error;
pub mod fields;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use builtins::BlazeBuiltinProvider;
pub use config::BlazeConfig;
pub use error::BlazeError;
pub use fields::{cookie_get, query_get};
pub use request::{Request, read_request};
pub use response::{Response, build_response};
pub use router::Router;
pub use server::Server;
