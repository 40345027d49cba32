//! ferry-core: a small HTTP/1.1 file server
//!
//! One request per connection, a fixed route table and a flat file store:
//!
//! | Route | Behaviour |
//! |---|---|
//! | `/` | 200, empty |
//! | `/echo/<text>` | 200, `<text>` as text/plain |
//! | `/user-agent` | 200, the User-Agent header as text/plain |
//! | `GET /files/<name>` | 200 with the file, or 404 |
//! | `POST /files/<name>` | 201, file replaced with the body |
//!
//! Anything else is 404. Malformed requests get 400 and local faults 500;
//! neither affects other connections.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod service;

// Re-exports
pub use config::{Limits, ServerConfig};
pub use connection::{read_request, serve_connection};
pub use error::{Error, Result};
pub use handlers::FileStore;
pub use parser::{Method, StartLine};
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use router::{Route, RouteMatch, Router};
pub use server::{create_optimized_socket, ConnectionTracker, Server};
pub use service::Service;
