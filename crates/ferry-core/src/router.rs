//! The server's fixed route table
//!
//! Built on `ferry-router` with strict prefix matching, so `/blahecho`
//! or `/myfiles/x` never reach the echo or file handlers.

use crate::Method;

/// Route handlers, in dispatch priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Route {
    Ping = 0,
    UserAgent = 1,
    Echo = 2,
    FileGet = 3,
    FilePost = 4,
    /// `/files/` with a method that has no file operation
    FileMethodNotAllowed = 5,
}

impl Route {
    fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Route::Ping),
            1 => Some(Route::UserAgent),
            2 => Some(Route::Echo),
            3 => Some(Route::FileGet),
            4 => Some(Route::FilePost),
            5 => Some(Route::FileMethodNotAllowed),
            _ => None,
        }
    }
}

/// Route match result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
    /// Path remainder captured by a prefix route, empty for exact routes
    pub tail: String,
}

/// Route table
#[derive(Debug)]
pub struct Router {
    inner: ferry_router::Router,
}

impl Router {
    pub fn new() -> Self {
        let mut inner = ferry_router::Router::new();
        inner.insert_any("/", Route::Ping as u32);
        inner.insert_any("/user-agent", Route::UserAgent as u32);
        inner.insert_any("/echo/*text", Route::Echo as u32);
        inner.insert(Method::Get.as_str(), "/files/*name", Route::FileGet as u32);
        inner.insert(Method::Post.as_str(), "/files/*name", Route::FilePost as u32);
        inner.insert_any("/files/*name", Route::FileMethodNotAllowed as u32);
        Self { inner }
    }

    /// Match a request; `None` means 404
    pub fn match_route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        let matched = self.inner.find(method.as_str(), path)?;
        let route = Route::from_id(matched.handler_id)?;
        let tail = matched
            .params
            .into_iter()
            .next()
            .map(|(_, value)| value)
            .unwrap_or_default();
        Some(RouteMatch { route, tail })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(method: Method, path: &str) -> Option<(Route, String)> {
        Router::new()
            .match_route(method, path)
            .map(|m| (m.route, m.tail))
    }

    #[test]
    fn test_exact_routes_any_method() {
        for method in Method::ALL {
            assert_eq!(route(method, "/"), Some((Route::Ping, String::new())));
            assert_eq!(
                route(method, "/user-agent"),
                Some((Route::UserAgent, String::new()))
            );
        }
    }

    #[test]
    fn test_echo_prefix() {
        assert_eq!(
            route(Method::Get, "/echo/hello"),
            Some((Route::Echo, "hello".to_string()))
        );
        assert_eq!(
            route(Method::Post, "/echo/a/b"),
            Some((Route::Echo, "a/b".to_string()))
        );
        assert_eq!(route(Method::Get, "/echo/"), Some((Route::Echo, String::new())));
    }

    #[test]
    fn test_file_routes_by_method() {
        assert_eq!(
            route(Method::Get, "/files/a.txt"),
            Some((Route::FileGet, "a.txt".to_string()))
        );
        assert_eq!(
            route(Method::Post, "/files/a.txt"),
            Some((Route::FilePost, "a.txt".to_string()))
        );
        assert_eq!(
            route(Method::Put, "/files/a.txt"),
            Some((Route::FileMethodNotAllowed, "a.txt".to_string()))
        );
        assert_eq!(
            route(Method::Get, "/files/"),
            Some((Route::FileGet, String::new()))
        );
    }

    #[test]
    fn test_unmatched_paths() {
        for path in ["/blahecho", "/echo", "/files", "/myfiles/x", "/user-agent/", "/index.html", "*"] {
            for method in Method::ALL {
                assert_eq!(route(method, path), None, "{} {}", method, path);
            }
        }
    }
}
