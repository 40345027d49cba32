//! Request dispatch
//!
//! [`Service`] is shared by every connection task. It holds no mutable
//! state of its own; the file store is the only shared resource.

use crate::config::ServerConfig;
use crate::handlers::{self, FileStore};
use crate::router::{Route, Router};
use crate::{Error, Request, Response, Result, StatusCode};

/// Route table plus file store
#[derive(Debug)]
pub struct Service {
    router: Router,
    files: FileStore,
}

impl Service {
    pub fn new(files: FileStore) -> Self {
        Self {
            router: Router::new(),
            files,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(FileStore::new(config.directory.clone()))
    }

    /// Route and run the handler
    pub async fn handle(&self, req: &Request) -> Result<Response> {
        let Some(matched) = self.router.match_route(req.method(), req.path()) else {
            return Ok(Response::not_found());
        };

        match matched.route {
            Route::Ping => Ok(handlers::ping()),
            Route::UserAgent => Ok(handlers::user_agent(req)),
            Route::Echo => Ok(handlers::echo(&matched.tail)),
            Route::FileGet => self.files.retrieve(&matched.tail).await,
            Route::FilePost => self.files.store(&matched.tail, &req.body).await,
            Route::FileMethodNotAllowed => Ok(Response::new(StatusCode::METHOD_NOT_ALLOWED)),
        }
    }

    /// Like [`Service::handle`], with handler errors turned into responses
    pub async fn respond(&self, req: &Request) -> Response {
        match self.handle(req).await {
            Ok(res) => res,
            Err(err) => error_response(&err),
        }
    }
}

/// Status-only response for an error, logged at a level matching its class
pub fn error_response(err: &Error) -> Response {
    let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::warn!(error = %err, "rejected request");
    }
    Response::new(status)
}
