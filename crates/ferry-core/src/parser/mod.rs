//! HTTP/1.1 request head parsing
//!
//! The head is the start line plus header lines, terminated by an empty
//! line. Header names are lower-cased once here so lookups elsewhere are
//! plain comparisons.

mod method;
mod start_line;

pub use method::Method;
pub use start_line::StartLine;

use crate::{Error, Result};
use smallvec::SmallVec;

/// Maximum number of headers to parse
pub const MAX_HEADERS: usize = 64;

/// Terminator between head and body
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Header list: (lower-cased name, trimmed value), in arrival order
pub type Headers = SmallVec<[(String, String); 16]>;

/// Parsed request head
#[derive(Debug, Clone)]
pub struct Head {
    pub start_line: StartLine,
    pub headers: Headers,
}

/// Locate the end of the head
///
/// Returns the offset just past the `\r\n\r\n` terminator, which is where
/// the body starts.
#[inline]
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    memchr::memmem::find(buf, HEAD_TERMINATOR).map(|i| i + HEAD_TERMINATOR.len())
}

/// Parse a complete head (start line, headers, optional trailing terminator)
///
/// Bytes that are not UTF-8 (obs-text in header values, raw bytes in the
/// target) are replaced with U+FFFD rather than rejected.
pub fn parse_head(buf: &[u8]) -> Result<Head> {
    let text = String::from_utf8_lossy(buf);
    let text: &str = &text;
    let text = text.strip_suffix("\r\n\r\n").unwrap_or(text);

    let mut lines = text.split("\r\n");
    let start_line = StartLine::parse(lines.next().unwrap_or_default())?;
    let headers = parse_headers(lines)?;

    Ok(Head {
        start_line,
        headers,
    })
}

/// Parse header lines up to the first empty line
pub fn parse_headers<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Headers> {
    let mut headers = Headers::new();

    for line in lines {
        if line.is_empty() {
            break;
        }
        if headers.len() == MAX_HEADERS {
            return Err(Error::TooManyHeaders { limit: MAX_HEADERS });
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeader(line.to_string()))?;

        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::InvalidHeader(line.to_string()));
        }

        headers.push((name.to_ascii_lowercase(), value.trim().to_string()));
    }

    Ok(headers)
}

/// Look up a header by name (case-insensitive, first occurrence)
pub fn find_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Declared body length, 0 when the header is absent
pub fn content_length(headers: &Headers) -> Result<usize> {
    find_header(headers, "content-length").map_or(Ok(0), parse_content_length)
}

/// Parse a Content-Length value
pub fn parse_content_length(value: &str) -> Result<usize> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidHeader(format!("content-length: {}", value)));
    }
    value
        .parse()
        .map_err(|_| Error::InvalidHeader(format!("content-length: {}", value)))
}
