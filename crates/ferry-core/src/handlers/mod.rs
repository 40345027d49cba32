//! Built-in request handlers

pub mod files;

pub use files::FileStore;

use crate::{Request, Response};

/// `/` - liveness ping
pub fn ping() -> Response {
    Response::ok()
}

/// `/echo/<text>` - reflect the text back
pub fn echo(text: &str) -> Response {
    Response::text(text.to_string())
}

/// `/user-agent` - reflect the User-Agent header
pub fn user_agent(req: &Request) -> Response {
    Response::text(req.user_agent().to_string())
}
