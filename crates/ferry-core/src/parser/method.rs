//! HTTP Method enum
//!
//! Only the four methods the server understands. Matching is exact and
//! case-sensitive, as the request line requires.

use crate::{Error, Result};

/// HTTP Method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Method {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
}

impl Method {
    /// All supported methods
    pub const ALL: [Method; 4] = [Method::Get, Method::Post, Method::Put, Method::Patch];

    /// Parse method from bytes
    #[inline(always)]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b"GET" => Some(Method::Get),
            b"POST" => Some(Method::Post),
            b"PUT" => Some(Method::Put),
            b"PATCH" => Some(Method::Patch),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

impl std::str::FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::parse(s.as_bytes()).ok_or_else(|| Error::InvalidMethod(s.to_string()))
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_bytes() {
        assert_eq!(Method::parse(b"GET"), Some(Method::Get));
        assert_eq!(Method::parse(b"POST"), Some(Method::Post));
        assert_eq!(Method::parse(b"PUT"), Some(Method::Put));
        assert_eq!(Method::parse(b"PATCH"), Some(Method::Patch));
        assert_eq!(Method::parse(b"DELETE"), None);
        assert_eq!(Method::parse(b""), None);
    }

    #[test]
    fn test_method_is_case_sensitive() {
        assert_eq!(Method::parse(b"get"), None);
        assert!("Post".parse::<Method>().is_err());
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        match "HEAD".parse::<Method>() {
            Err(Error::InvalidMethod(m)) => assert_eq!(m, "HEAD"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(format!("{} /", Method::Patch), "PATCH /");
    }
}
