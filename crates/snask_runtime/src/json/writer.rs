use snask_core::Value;
use snask_core::heap::ObjectId;
use snask_core::value::{MAX_DEPTH, push_finite_number};

const HEX: &[u8; 16] = b"0123456789abcdef";

pub fn stringify(value: &Value) -> String {
    let mut out = String::new();
    write_json(&mut out, value, false);
    out
}

/// Two-space indentation, one entry per line.
pub fn stringify_pretty(value: &Value) -> String {
    let mut out = String::new();
    write_json(&mut out, value, true);
    out
}

pub fn write_json(out: &mut String, value: &Value, pretty: bool) {
    let mut w = Writer {
        out,
        pretty,
        stack: Vec::new(),
    };
    w.write_value(value, 0);
}

struct Writer<'a> {
    out: &'a mut String,
    pretty: bool,
    /// Objects on the current path; a repeat is a cycle and renders as `null`,
    /// as does anything nested deeper than `MAX_DEPTH`.
    stack: Vec<ObjectId>,
}

impl Writer<'_> {
    fn write_value(&mut self, value: &Value, indent: usize) {
        match value {
            Value::Nil => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => {
                if n.is_finite() {
                    push_finite_number(self.out, *n);
                } else {
                    self.out.push_str("null");
                }
            }
            Value::Str(s) => write_escaped(self.out, s),
            Value::Object(obj) => {
                if self.stack.len() >= MAX_DEPTH || self.stack.contains(&obj.id()) {
                    self.out.push_str("null");
                    return;
                }
                let entries = obj.entries();
                if entries.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.stack.push(obj.id());
                self.out.push('{');
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    if self.pretty {
                        self.newline(indent + 1);
                    }
                    write_escaped(self.out, key);
                    self.out.push(':');
                    if self.pretty {
                        self.out.push(' ');
                    }
                    self.write_value(item, indent + 1);
                }
                if self.pretty {
                    self.newline(indent);
                }
                self.out.push('}');
                self.stack.pop();
            }
        }
    }

    fn newline(&mut self, indent: usize) {
        self.out.push('\n');
        for _ in 0..indent {
            self.out.push_str("  ");
        }
    }
}

fn write_escaped(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let b = c as u32 as usize;
                out.push('\\');
                out.push('u');
                out.push_str("00");
                out.push(HEX[b >> 4] as char);
                out.push(HEX[b & 0xf] as char);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
