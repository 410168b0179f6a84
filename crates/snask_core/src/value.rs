//! Runtime value representation.
//!
//! `Value` is a closed sum type over the five runtime tags. Strings are shared
//! immutable text, objects are shared handles to an ordered container: cloning
//! a `Value` never deep-copies an object, so mutations are visible through
//! every copy and identity is preserved.

use crate::heap;
use crate::object::{Object, ObjectRef};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

pub const TAG_NIL: u8 = 0;
pub const TAG_NUMBER: u8 = 1;
pub const TAG_BOOL: u8 = 2;
pub const TAG_STR: u8 = 3;
pub const TAG_OBJECT: u8 = 4;

/// Nesting limit for recursive comparisons and rendering of cyclic objects.
pub const MAX_DEPTH: usize = 512;

/// Largest run of `Nil` padding a positional write may create past the end.
pub const MAX_INDEX_GAP: usize = 1 << 20;

// ============================================================================
// Strings
// ============================================================================

struct StrPayload(Box<str>);

impl Drop for StrPayload {
    fn drop(&mut self) {
        heap::release_string(self.0.len());
    }
}

/// Immutable, shared runtime string.
#[derive(Clone)]
pub struct Str(Arc<StrPayload>);

impl Str {
    pub fn new(s: &str) -> Self {
        heap::track_string(s.len());
        Str(Arc::new(StrPayload(s.into())))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0.0
    }

    pub fn ptr_eq(&self, other: &Str) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Str {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Str {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_str() == other.as_str()
    }
}

impl Eq for Str {}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Str::new(s)
    }
}

impl From<String> for Str {
    fn from(s: String) -> Self {
        heap::track_string(s.len());
        Str(Arc::new(StrPayload(s.into_boxed_str())))
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// Integral values below this magnitude print without a fractional part.
const INTEGRAL_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Renders a number the way scripts see it: integral values as integers,
/// everything else in shortest round-trip form.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let mut out = String::new();
    push_finite_number(&mut out, n);
    out
}

/// Appends a finite number. Callers handle NaN and infinities themselves.
pub fn push_finite_number(out: &mut String, n: f64) {
    if n.fract() == 0.0 && n.abs() < INTEGRAL_LIMIT {
        let mut buf = itoa::Buffer::new();
        out.push_str(buf.format(n as i64));
    } else {
        let mut buf = ryu::Buffer::new();
        out.push_str(buf.format_finite(n));
    }
}

// ============================================================================
// Value
// ============================================================================

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Number(f64),
    Bool(bool),
    Str(Str),
    Object(ObjectRef),
}

impl Value {
    pub const NIL: Value = Value::Nil;

    #[inline]
    pub fn from_f64(n: f64) -> Self {
        Value::Number(n)
    }

    #[inline]
    pub fn from_i64(n: i64) -> Self {
        Value::Number(n as f64)
    }

    #[inline]
    pub fn from_bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn str(s: impl Into<Str>) -> Self {
        Value::Str(s.into())
    }

    pub fn object(obj: Object) -> Self {
        Value::Object(ObjectRef::new(obj))
    }

    pub fn new_object() -> Self {
        Value::object(Object::new())
    }

    /// Arrays are plain objects whose entries carry positional keys.
    pub fn new_array() -> Self {
        Value::object(Object::new())
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let mut obj = Object::new();
        for item in items {
            obj.push(item);
        }
        Value::object(obj)
    }

    /// Builds the `{ok, value, error}` triple used by non-raising operations.
    pub fn result(ok: bool, value: Value, error: &str) -> Self {
        let mut obj = Object::with_capacity(3);
        obj.set("ok", Value::Bool(ok));
        obj.set("value", value);
        obj.set("error", Value::str(error));
        Value::object(obj)
    }

    pub fn ok(value: Value) -> Self {
        Value::result(true, value, "")
    }

    pub fn err(error: &str) -> Self {
        Value::result(false, Value::Nil, error)
    }

    pub fn tag(&self) -> u8 {
        match self {
            Value::Nil => TAG_NIL,
            Value::Number(_) => TAG_NUMBER,
            Value::Bool(_) => TAG_BOOL,
            Value::Str(_) => TAG_STR,
            Value::Object(_) => TAG_OBJECT,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }
    #[inline]
    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }
    #[inline]
    pub fn is_obj(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Numeric view: numbers as-is, bools as 0.0 / 1.0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Non-negative integral number usable as an array position.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n < INTEGRAL_LIMIT => {
                Some(*n as usize)
            }
            _ => None,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    // ------------------------------------------------------------------------
    // Equality
    // ------------------------------------------------------------------------

    /// Tags must match exactly; objects compare by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Like `strict_eq`, except numbers and bools compare numerically.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(_) | Value::Bool(_), Value::Number(_) | Value::Bool(_)) => {
                self.as_number() == other.as_number()
            }
            _ => self.strict_eq(other),
        }
    }

    /// Loose equality that descends into objects, comparing entries in order
    /// (effective keys and values) instead of identity.
    pub fn deep_loose_eq(&self, other: &Value) -> bool {
        deep_eq_impl(self, other, 0)
    }

    // ------------------------------------------------------------------------
    // Container access
    // ------------------------------------------------------------------------

    /// Looks up a string key or a positional index. Anything else is `Nil`.
    pub fn get(&self, key: &Value) -> Value {
        let Value::Object(obj) = self else {
            return Value::Nil;
        };
        match key {
            Value::Str(k) => obj.get(k.as_str()),
            _ => match key.as_index() {
                Some(idx) => obj.get_index(idx),
                None => Value::Nil,
            },
        }
    }

    pub fn get_key(&self, key: &str) -> Value {
        match self {
            Value::Object(obj) => obj.get(key),
            _ => Value::Nil,
        }
    }

    /// Upserts by string key, or writes by position for numeric keys.
    /// Returns false when `self` is not an object or the key is unusable.
    pub fn set(&self, key: &Value, value: Value) -> bool {
        let Value::Object(obj) = self else {
            return false;
        };
        match key {
            Value::Str(k) => {
                obj.set(k.as_str(), value);
                true
            }
            _ => match key.as_index() {
                Some(idx) => obj.set_index(idx, value),
                None => false,
            },
        }
    }

    pub fn array_push(&self, value: Value) -> bool {
        match self {
            Value::Object(obj) => {
                obj.push(value);
                true
            }
            _ => false,
        }
    }

    pub fn array_set(&self, idx: &Value, value: Value) -> bool {
        match (self, idx.as_index()) {
            (Value::Object(obj), Some(i)) => obj.set_index(i, value),
            _ => false,
        }
    }

    pub fn array_get(&self, idx: &Value) -> Value {
        match (self, idx.as_index()) {
            (Value::Object(obj), Some(i)) => obj.get_index(i),
            _ => Value::Nil,
        }
    }

    /// Entry count for objects, byte length for strings.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.len()),
            Value::Object(o) => Some(o.len()),
            _ => None,
        }
    }

    /// User-facing rendering (`nil` for Nil, strings unquoted at top level).
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

fn deep_eq_impl(a: &Value, b: &Value, depth: usize) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if depth >= MAX_DEPTH {
                return false;
            }
            let (ex, ey) = (x.entries(), y.entries());
            ex.len() == ey.len()
                && ex
                    .iter()
                    .zip(ey.iter())
                    .all(|((kx, vx), (ky, vy))| kx == ky && deep_eq_impl(vx, vy, depth + 1))
        }
        _ => a.loose_eq(b),
    }
}

/// Strict equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::from_i64(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::object(obj)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Number(n) => write!(f, "Number({})", number_to_string(*n)),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Str(s) => write!(f, "Str({:?})", s.as_str()),
            Value::Object(o) => write!(f, "Object(id={}, {})", o.id().0, self),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        let mut visited = HashSet::new();
        write_display(&mut out, self, false, &mut visited);
        f.write_str(&out)
    }
}

fn write_display(out: &mut String, v: &Value, nested: bool, visited: &mut HashSet<u64>) {
    match v {
        Value::Nil => out.push_str("nil"),
        Value::Number(n) => out.push_str(&number_to_string(*n)),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Str(s) => {
            if nested {
                out.push('"');
                out.push_str(s);
                out.push('"');
            } else {
                out.push_str(s);
            }
        }
        Value::Object(o) => {
            let id = o.id().0;
            if !visited.insert(id) {
                out.push_str("{...}");
                return;
            }
            out.push('{');
            for (i, (k, item)) in o.entries().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('"');
                out.push_str(k);
                out.push_str("\": ");
                write_display(out, item, true, visited);
            }
            out.push('}');
            visited.remove(&id);
        }
    }
}
