//! Request line parsing: `METHOD SP PATH SP VERSION`

use super::Method;
use crate::{Error, Result};

/// First line of an HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartLine {
    /// HTTP method
    pub method: Method,
    /// Request target, exactly as sent
    pub path: String,
    /// Protocol version, not validated
    pub version: String,
}

impl StartLine {
    /// Parse a request line (without its CRLF terminator)
    ///
    /// The line must split on single spaces into exactly three tokens.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split(' ');
        let (Some(method), Some(path), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Parse(format!("malformed request line: {:?}", line)));
        };

        let method = method.parse::<Method>()?;

        if path.is_empty() {
            return Err(Error::Parse("empty request target".to_string()));
        }

        Ok(Self {
            method,
            path: path.to_string(),
            version: version.to_string(),
        })
    }
}
