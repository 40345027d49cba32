//! HTTP Request types

use crate::parser::{self, Head, Headers, Method, StartLine};
use crate::Result;
use bytes::Bytes;

/// HTTP Request
#[derive(Debug, Clone)]
pub struct Request {
    /// Parsed request line
    pub start_line: StartLine,
    /// Request headers, names lower-cased
    pub headers: Headers,
    /// Request body
    pub body: Bytes,
}

impl Request {
    /// Build a request from a parsed head and its body
    pub fn from_head(head: Head, body: Bytes) -> Self {
        Self {
            start_line: head.start_line,
            headers: head.headers,
            body,
        }
    }

    /// HTTP method
    pub fn method(&self) -> Method {
        self.start_line.method
    }

    /// Request target as sent
    pub fn path(&self) -> &str {
        &self.start_line.path
    }

    /// Get a header value (case-insensitive, first occurrence)
    pub fn header(&self, name: &str) -> Option<&str> {
        parser::find_header(&self.headers, name)
    }

    /// User-Agent header, empty when absent
    pub fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or_default()
    }

    /// Declared body length, 0 when absent
    pub fn content_length(&self) -> Result<usize> {
        parser::content_length(&self.headers)
    }
}

/// Builder for constructing requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request: Request {
                start_line: StartLine {
                    method,
                    path: path.into(),
                    version: "HTTP/1.1".to_string(),
                },
                headers: Headers::new(),
                body: Bytes::new(),
            },
        }
    }

    /// Add a header
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request
            .headers
            .push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_request_header() {
        let req = RequestBuilder::new(Method::Get, "/")
            .header("Content-Type", "application/json")
            .build();

        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn test_user_agent() {
        let req = RequestBuilder::new(Method::Get, "/user-agent")
            .header("Host", "localhost")
            .header("Accept", "*/*")
            .header("User-Agent", "foo/1.0")
            .build();
        assert_eq!(req.user_agent(), "foo/1.0");

        let req = RequestBuilder::new(Method::Get, "/user-agent").build();
        assert_eq!(req.user_agent(), "");
    }

    #[test]
    fn test_content_length() {
        let req = RequestBuilder::new(Method::Post, "/files/a")
            .header("Content-Length", "42")
            .build();
        assert_eq!(req.content_length().unwrap(), 42);

        let req = RequestBuilder::new(Method::Post, "/files/a").build();
        assert_eq!(req.content_length().unwrap(), 0);

        let req = RequestBuilder::new(Method::Post, "/files/a")
            .header("Content-Length", "lots")
            .build();
        assert!(matches!(req.content_length(), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_from_head() {
        let head = parser::parse_head(b"POST /files/x HTTP/1.1\r\nContent-Length: 3\r\n\r\n").unwrap();
        let req = Request::from_head(head, Bytes::from_static(b"abc"));

        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/files/x");
        assert_eq!(req.content_length().unwrap(), 3);
        assert_eq!(&req.body[..], b"abc");
    }
}
