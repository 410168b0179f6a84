use snask_core::{Object, Value};

/// Objects and arrays nested deeper than this are rejected.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {offset}")]
pub struct JsonError {
    pub message: String,
    pub offset: usize,
}

pub fn parse(text: &str) -> Result<Value, JsonError> {
    parse_with_depth(text, DEFAULT_MAX_DEPTH)
}

pub fn parse_with_depth(text: &str, max_depth: usize) -> Result<Value, JsonError> {
    let mut p = Parser {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        depth: 0,
        max_depth,
    };
    p.skip_ws();
    let value = p.parse_value()?;
    p.skip_ws();
    if p.pos < p.bytes.len() {
        return Err(p.error(format!(
            "trailing content after JSON value: '{}'",
            p.snippet()
        )));
    }
    Ok(value)
}

/// Silent form: any syntax error yields `Nil`.
pub fn parse_or_nil(text: &str) -> Value {
    parse(text).unwrap_or_default()
}

/// Explicit form: `{ok, value, error}`.
pub fn parse_ex(text: &str) -> Value {
    match parse(text) {
        Ok(v) => Value::ok(v),
        Err(e) => Value::err(&e.to_string()),
    }
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> JsonError {
        JsonError {
            message: message.into(),
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// A few characters of context at the current position.
    fn snippet(&self) -> String {
        self.text[self.pos..].chars().take(12).collect()
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<Value, JsonError> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(Value::str(self.parse_string()?)),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Nil),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(_) => Err(self.error(format!("unexpected character '{}'", self.snippet_char()))),
        }
    }

    fn snippet_char(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or(' ')
    }

    fn enter(&mut self) -> Result<(), JsonError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(format!("nesting too deep (max {})", self.max_depth)));
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Value, JsonError> {
        self.enter()?;
        self.pos += 1;
        let mut obj = Object::new();
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::object(obj));
        }
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'"') => {}
                None => return Err(self.error("unterminated object")),
                Some(_) => {
                    return Err(self.error(format!(
                        "expected string key in object, found '{}'",
                        self.snippet_char()
                    )));
                }
            }
            let key = self.parse_string()?;
            self.skip_ws();
            if self.peek() != Some(b':') {
                return Err(self.error(format!("expected ':' after key \"{}\"", key)));
            }
            self.pos += 1;
            self.skip_ws();
            let value = self.parse_value()?;
            obj.set(&key, value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unterminated object")),
                Some(_) => {
                    return Err(self.error(format!(
                        "expected ',' or '}}' in object, found '{}'",
                        self.snippet_char()
                    )));
                }
            }
        }
        self.depth -= 1;
        Ok(Value::object(obj))
    }

    fn parse_array(&mut self) -> Result<Value, JsonError> {
        self.enter()?;
        self.pos += 1;
        let mut obj = Object::new();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::object(obj));
        }
        loop {
            self.skip_ws();
            let value = self.parse_value()?;
            obj.push(value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unterminated array")),
                Some(_) => {
                    return Err(self.error(format!(
                        "expected ',' or ']' in array, found '{}'",
                        self.snippet_char()
                    )));
                }
            }
        }
        self.depth -= 1;
        Ok(Value::object(obj))
    }

    fn parse_string(&mut self) -> Result<String, JsonError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut run = self.pos;
        loop {
            let Some(b) = self.peek() else {
                self.pos = start;
                return Err(self.error("unterminated string"));
            };
            match b {
                b'"' => {
                    out.push_str(&self.text[run..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    out.push_str(&self.text[run..self.pos]);
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                    run = self.pos;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), JsonError> {
        let Some(c) = self.peek() else {
            return Err(self.error("unterminated string"));
        };
        self.pos += 1;
        match c {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let text = self.text;
                let hex = text
                    .get(self.pos..self.pos + 4)
                    .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                    .ok_or_else(|| self.error("invalid \\u escape"))?;
                let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid \\u escape"))?;
                self.pos += 4;
                match char::from_u32(code) {
                    Some(ch) if code <= 0x7f => out.push(ch),
                    _ => out.push('?'),
                }
            }
            _ => {
                self.pos -= 1;
                return Err(self.error(format!("invalid escape '\\{}'", self.snippet_char())));
            }
        }
        Ok(())
    }

    fn parse_number(&mut self) -> Result<Value, JsonError> {
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E') = self.peek() {
            self.pos += 1;
        }
        let lexeme = &self.text[start..self.pos];
        match lexeme.parse::<f64>() {
            Ok(n) => Ok(Value::Number(n)),
            Err(_) => {
                self.pos = start;
                Err(self.error(format!("invalid number '{}'", lexeme)))
            }
        }
    }

    fn parse_literal(&mut self, word: &str, value: Value) -> Result<Value, JsonError> {
        if self.bytes[self.pos..].starts_with(word.as_bytes()) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(self.error(format!("invalid literal '{}', expected '{}'", self.snippet(), word)))
        }
    }
}
