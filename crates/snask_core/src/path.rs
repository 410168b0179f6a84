//! Dotted path traversal (`"a.b.0.c"`).

use crate::value::Value;

/// Walks `root` segment by segment. Numeric segments select by position,
/// all others by key. Always returns an `{ok, value, error}` object.
pub fn path_get(root: &Value, path: &str) -> Value {
    match walk(root, path) {
        Ok(v) => Value::ok(v),
        Err(msg) => Value::err(&msg),
    }
}

/// Same traversal as `path_get`, returning the value or a message.
pub fn walk(root: &Value, path: &str) -> Result<Value, String> {
    if path.is_empty() {
        return Ok(root.clone());
    }
    let mut current = root.clone();
    for (depth, seg) in path.split('.').enumerate() {
        let Value::Object(obj) = &current else {
            return Err(format!(
                "segment '{}' (#{}): cannot index into {}",
                seg,
                depth,
                current.type_name()
            ));
        };
        let next = if is_index(seg) {
            let idx: usize = seg
                .parse()
                .map_err(|_| format!("segment '{}': index too large", seg))?;
            let guard = obj.read();
            match guard.get_index(idx) {
                Some(v) => v.clone(),
                None => {
                    return Err(format!(
                        "segment '{}': index {} out of range (len {})",
                        seg,
                        idx,
                        guard.len()
                    ));
                }
            }
        } else {
            match obj.read().get(seg) {
                Some(v) => v.clone(),
                None => return Err(format!("segment '{}': key not found", seg)),
            }
        };
        current = next;
    }
    Ok(current)
}

fn is_index(seg: &str) -> bool {
    !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit())
}
