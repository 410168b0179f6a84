use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlazeError {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("request exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },
    #[error("timed out reading request after {received} bytes")]
    Timeout { received: usize },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("connection closed before a request arrived")]
    ConnectionClosed,
}

impl BlazeError {
    /// Status to answer the client with, or `None` when the connection
    /// should just be dropped.
    pub fn status(&self) -> Option<u16> {
        match self {
            BlazeError::RequestTooLarge { .. } => Some(413),
            BlazeError::Timeout { received } if *received > 0 => Some(408),
            BlazeError::BadRequest(_) => Some(400),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(BlazeError::RequestTooLarge { limit: 1 }.status(), Some(413));
        assert_eq!(BlazeError::Timeout { received: 3 }.status(), Some(408));
        assert_eq!(BlazeError::Timeout { received: 0 }.status(), None);
        assert_eq!(BlazeError::BadRequest("x".into()).status(), Some(400));
        assert_eq!(BlazeError::ConnectionClosed.status(), None);
    }
}
