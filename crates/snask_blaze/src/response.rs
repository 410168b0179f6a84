//! Turning a handler's `Value` into an HTTP response.

use crate::error::BlazeError;
use snask_core::{ObjectRef, Value};
use snask_runtime::json::stringify;
use std::io::{self, Write};

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: String,
    pub location: Option<String>,
    /// One raw extra header line, written as-is.
    pub header: Option<String>,
    pub cookie: Option<String>,
}

impl Response {
    pub fn new(status: u16, content_type: &str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body: body.into(),
            location: None,
            header: None,
            cookie: None,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, TEXT_PLAIN, body)
    }

    pub fn not_found() -> Self {
        Self::text(404, "Not Found")
    }

    /// Response for a request that failed before routing, if the client
    /// should get one at all.
    pub fn for_error(err: &BlazeError) -> Option<Self> {
        let status = err.status()?;
        Some(Self::text(status, reason_phrase(status)))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        if let Some(location) = &self.location {
            head.push_str("Location: ");
            head.push_str(location);
            head.push_str("\r\n");
        }
        if let Some(header) = self.header.as_deref().filter(|h| !h.is_empty()) {
            head.push_str(header);
            head.push_str("\r\n");
        }
        if let Some(cookie) = &self.cookie {
            head.push_str("Set-Cookie: ");
            head.push_str(cookie);
            head.push_str("\r\n");
        }
        head.push_str("Connection: close\r\n\r\n");
        let mut out = head.into_bytes();
        out.extend_from_slice(self.body.as_bytes());
        out
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_bytes())?;
        out.flush()
    }
}

/// Builds the response for a route or handler value. For objects the first
/// matching field decides: `redirect`, then a string `body`, then `json`;
/// any other object is sent as JSON. `header` and `cookie` apply to every
/// object form.
pub fn build_response(value: &Value) -> Response {
    match value {
        Value::Object(obj) => {
            let mut resp = object_response(value, obj);
            resp.header = string_field(obj, "header");
            resp.cookie = string_field(obj, "cookie");
            resp
        }
        Value::Str(s) => Response::text(200, s.as_str()),
        other => Response::new(200, APPLICATION_JSON, stringify(other)),
    }
}

fn object_response(value: &Value, obj: &ObjectRef) -> Response {
    if obj.contains_key("redirect") {
        let target = obj.get("redirect").to_display_string();
        let mut resp = Response::text(status_field(obj, 302), "");
        resp.location = Some(sanitize(&target));
        return resp;
    }
    if let Value::Str(body) = obj.get("body") {
        let ct = content_type_field(obj, TEXT_PLAIN);
        return Response::new(status_field(obj, 200), &ct, body.as_str());
    }
    if obj.contains_key("json") {
        let ct = content_type_field(obj, APPLICATION_JSON);
        return Response::new(status_field(obj, 200), &ct, stringify(&obj.get("json")));
    }
    Response::new(200, APPLICATION_JSON, stringify(value))
}

/// Integral status in 100..=599, otherwise `default`.
fn status_field(obj: &ObjectRef, default: u16) -> u16 {
    match obj.get("status").as_number() {
        Some(n) if n.fract() == 0.0 && (100.0..=599.0).contains(&n) => n as u16,
        _ => default,
    }
}

fn content_type_field(obj: &ObjectRef, default: &str) -> String {
    string_field(obj, "content_type").unwrap_or_else(|| default.to_string())
}

fn string_field(obj: &ObjectRef, key: &str) -> Option<String> {
    match obj.get(key) {
        Value::Str(s) => Some(sanitize(s.as_str())),
        _ => None,
    }
}

/// Header values may not break out of their line.
fn sanitize(s: &str) -> String {
    s.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        409 => "Conflict",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        s if s < 200 => "Informational",
        s if s < 300 => "OK",
        s if s < 400 => "Redirect",
        s if s < 500 => "Client Error",
        _ => "Server Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snask_runtime::json::parse;

    fn from_json(text: &str) -> Response {
        build_response(&parse(text).unwrap())
    }

    #[test]
    fn plain_string() {
        let r = build_response(&Value::str("pong"));
        assert_eq!((r.status, r.content_type.as_str(), r.body.as_str()), (200, TEXT_PLAIN, "pong"));
    }

    #[test]
    fn json_field_with_status() {
        let r = from_json(r#"{"json": {"a": 1}, "status": 201}"#);
        assert_eq!(r.status, 201);
        assert_eq!(r.content_type, APPLICATION_JSON);
        assert_eq!(r.body, r#"{"a":1}"#);
    }

    #[test]
    fn redirect_wins_over_body() {
        let r = from_json(r#"{"body": "x", "redirect": "/login"}"#);
        assert_eq!(r.status, 302);
        assert_eq!(r.location.as_deref(), Some("/login"));
        assert_eq!(r.body, "");
        let r = from_json(r#"{"redirect": "/new", "status": 301}"#);
        assert_eq!(r.status, 301);
    }

    #[test]
    fn body_field_with_content_type() {
        let r = from_json(r#"{"body": "<b>hi</b>", "content_type": "text/html", "status": 202}"#);
        assert_eq!((r.status, r.content_type.as_str(), r.body.as_str()), (202, "text/html", "<b>hi</b>"));
    }

    #[test]
    fn non_string_body_falls_through() {
        let r = from_json(r#"{"body": 5}"#);
        assert_eq!(r.content_type, APPLICATION_JSON);
        assert_eq!(r.body, r#"{"body":5}"#);
    }

    #[test]
    fn other_values_are_json() {
        let r = from_json(r#"{"a": [1, 2], "status": 500}"#);
        assert_eq!(r.status, 200);
        assert_eq!(r.body, r#"{"a":{"0":1,"1":2},"status":500}"#);
        let r = build_response(&Value::from_i64(3));
        assert_eq!((r.content_type.as_str(), r.body.as_str()), (APPLICATION_JSON, "3"));
        assert_eq!(build_response(&Value::Nil).body, "null");
    }

    #[test]
    fn invalid_status_uses_default() {
        assert_eq!(from_json(r#"{"body": "", "status": 99}"#).status, 200);
        assert_eq!(from_json(r#"{"body": "", "status": 200.5}"#).status, 200);
        assert_eq!(from_json(r#"{"body": "", "status": "404"}"#).status, 200);
    }

    #[test]
    fn header_and_cookie_on_the_wire() {
        let r = from_json(r#"{"body": "ok", "header": "X-A: 1", "cookie": "sid=9\r\nX-Evil: 1"}"#);
        let wire = String::from_utf8(r.to_bytes()).unwrap();
        assert_eq!(
            wire,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nX-A: 1\r\nSet-Cookie: sid=9X-Evil: 1\r\nConnection: close\r\n\r\nok"
        );
    }

    #[test]
    fn redirect_wire_has_location() {
        let wire = String::from_utf8(from_json(r#"{"redirect": "/x"}"#).to_bytes()).unwrap();
        assert!(wire.starts_with("HTTP/1.1 302 Found\r\n"));
        assert!(wire.contains("\r\nLocation: /x\r\n"));
        assert!(wire.ends_with("Content-Length: 0\r\nLocation: /x\r\nConnection: close\r\n\r\n"));
    }

    #[test]
    fn error_responses() {
        let r = Response::for_error(&BlazeError::RequestTooLarge { limit: 1 }).unwrap();
        assert_eq!((r.status, r.body.as_str()), (413, "Payload Too Large"));
        assert!(Response::for_error(&BlazeError::ConnectionClosed).is_none());
    }
}
