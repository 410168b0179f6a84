//! JSON text <-> `Value`.
//!
//! Two departures from standard JSON:
//! - JSON arrays parse into ordinary objects with positional keys, and every
//!   object (array-shaped or not) serializes as a JSON object (`{"0":...}`).
//! - `\uXXXX` escapes above ASCII decode to a single `?`.

mod parser;
mod writer;

pub use parser::{DEFAULT_MAX_DEPTH, JsonError, parse, parse_ex, parse_or_nil, parse_with_depth};
pub use writer::{stringify, stringify_pretty, write_json};
