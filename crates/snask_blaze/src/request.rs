//! HTTP/1.1 request reading and parsing.
//!
//! Only `Content-Length` framed bodies are understood; chunked transfer
//! encoding is not supported.

use crate::error::BlazeError;
use snask_core::{Object, Value};
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 4096;
const HEAD_END: &[u8] = b"\r\n\r\n";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Request {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    /// Raw query string (after `?`), empty if absent.
    pub query: String,
    pub version: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Request {
    /// Parses the request line and header lines (everything before the blank line).
    pub fn parse_head(head: &str) -> Result<Self, BlazeError> {
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split(' ');
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad_line(request_line));
        };
        if method.is_empty()
            || !method.bytes().all(|b| b.is_ascii_uppercase())
            || !target.starts_with('/')
            || !version.starts_with("HTTP/")
        {
            return Err(bad_line(request_line));
        }

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                return Err(BlazeError::BadRequest(format!(
                    "malformed header line: {:?}",
                    line
                )));
            };
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }

        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Ok(Request {
            method: method.to_string(),
            path: path.to_string(),
            query: query.to_string(),
            version: version.to_string(),
            headers,
            body: String::new(),
        })
    }

    /// First header with this name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw `Cookie` header, empty if absent.
    pub fn cookie(&self) -> &str {
        self.header("cookie").unwrap_or_default()
    }

    pub fn content_length(&self) -> Result<usize, BlazeError> {
        match self.header("content-length") {
            None => Ok(0),
            Some(v) => v
                .parse()
                .map_err(|_| BlazeError::BadRequest(format!("invalid Content-Length: {:?}", v))),
        }
    }

    /// Headers as an object keyed by lowercase name; repeated names keep the last value.
    pub fn headers_value(&self) -> Value {
        let mut obj = Object::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            obj.set(&name.to_ascii_lowercase(), Value::str(value.as_str()));
        }
        Value::object(obj)
    }
}

fn bad_line(line: &str) -> BlazeError {
    BlazeError::BadRequest(format!("malformed request line: {:?}", line))
}

/// Reads one request: the head up to the blank line, then exactly
/// `Content-Length` body bytes. Head plus body may not exceed `max_bytes`.
pub fn read_request<R: Read>(stream: &mut R, max_bytes: usize) -> Result<Request, BlazeError> {
    let mut buf: Vec<u8> = Vec::with_capacity(READ_CHUNK.min(max_bytes));
    let mut chunk = [0u8; READ_CHUNK];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() >= max_bytes {
            return Err(BlazeError::RequestTooLarge { limit: max_bytes });
        }
        let n = read_some(stream, &mut chunk, buf.len())?;
        if n == 0 {
            return Err(if buf.is_empty() {
                BlazeError::ConnectionClosed
            } else {
                BlazeError::BadRequest("incomplete request head".to_string())
            });
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buf[..head_end])
        .map_err(|_| BlazeError::BadRequest("request head is not valid UTF-8".to_string()))?;
    let mut req = Request::parse_head(head)?;

    let body_start = head_end + HEAD_END.len();
    let content_length = req.content_length()?;
    let total = body_start
        .checked_add(content_length)
        .filter(|t| *t <= max_bytes)
        .ok_or(BlazeError::RequestTooLarge { limit: max_bytes })?;

    while buf.len() < total {
        let n = read_some(stream, &mut chunk, buf.len())?;
        if n == 0 {
            return Err(BlazeError::BadRequest(format!(
                "body ended after {} of {} bytes",
                buf.len() - body_start,
                content_length
            )));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    req.body = String::from_utf8_lossy(&buf[body_start..total]).into_owned();
    Ok(req)
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_END.len()).position(|w| w == HEAD_END)
}

fn read_some<R: Read>(stream: &mut R, chunk: &mut [u8], received: usize) -> Result<usize, BlazeError> {
    loop {
        match stream.read(chunk) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(BlazeError::Timeout { received });
            }
            Err(e) => return Err(BlazeError::Io(e)),
        }
    }
}
