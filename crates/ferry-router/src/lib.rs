//! ferry-router: Zero-dependency exact/prefix HTTP route table
//!
//! Routes are keyed by HTTP method, with a method-independent table
//! consulted when the method has no matching route of its own.
//!
//! ## Path Syntax
//! - `/user-agent` - Exact path, matches only the identical string
//! - `/files/*name` - Prefix path, matches anything starting with `/files/`
//!   and captures the remainder (possibly empty) under `name`
//! - `/static/*` - Prefix path with an anonymous capture (`*`)
//!
//! A `*` only starts a capture as the whole last segment; elsewhere (e.g.
//! `/a*/b` or `/v*`) the path is exact.
//!
//! The remainder is captured verbatim: no segment splitting, no
//! normalisation of repeated slashes, no percent-decoding.
//!
//! ## Priority
//! 1. Exact match for the request method
//! 2. Longest prefix match for the request method
//! 3. Exact match registered for any method
//! 4. Longest prefix match registered for any method
//!
//! ## Example
//! ```
//! use ferry_router::Router;
//!
//! let mut router = Router::new();
//! router.insert_any("/", 0);
//! router.insert_any("/echo/*text", 1);
//! router.insert("GET", "/files/*name", 2);
//!
//! let m = router.find("PATCH", "/echo/abc/def").unwrap();
//! assert_eq!(m.handler_id, 1);
//! assert_eq!(m.params, vec![("text".to_string(), "abc/def".to_string())]);
//!
//! assert!(router.find("GET", "/blahecho").is_none());
//! ```

use std::collections::HashMap;

/// Route match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The matched handler ID
    pub handler_id: u32,
    /// Captured path parameters as (name, value) pairs
    pub params: Vec<(String, String)>,
}

impl Match {
    /// Get a captured parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct PrefixRoute {
    prefix: String,
    name: String,
    handler_id: u32,
}

/// Routes registered for one method (or for any method)
#[derive(Debug, Default)]
struct Table {
    exact: HashMap<String, u32>,
    /// Kept sorted by descending prefix length
    prefixes: Vec<PrefixRoute>,
}

impl Table {
    fn insert(&mut self, path: &str, handler_id: u32) {
        match split_wildcard(path) {
            Some((prefix, name)) => {
                let name = if name.is_empty() { "*" } else { name };

                self.prefixes.retain(|r| r.prefix != prefix);
                self.prefixes.push(PrefixRoute {
                    prefix: prefix.to_string(),
                    name: name.to_string(),
                    handler_id,
                });
                self.prefixes
                    .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
            }
            None => {
                self.exact.insert(path.to_string(), handler_id);
            }
        }
    }

    fn find(&self, path: &str) -> Option<Match> {
        if let Some(&handler_id) = self.exact.get(path) {
            return Some(Match {
                handler_id,
                params: Vec::new(),
            });
        }

        self.prefixes.iter().find_map(|route| {
            path.strip_prefix(route.prefix.as_str()).map(|rest| Match {
                handler_id: route.handler_id,
                params: vec![(route.name.clone(), rest.to_string())],
            })
        })
    }

    fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }
}

/// Split `/prefix/*name` into (`/prefix/`, `name`)
fn split_wildcard(path: &str) -> Option<(&str, &str)> {
    let star = path.find('*')?;
    let (prefix, name) = (&path[..star], &path[star + 1..]);
    (prefix.ends_with('/') && !name.contains(['/', '*'])).then_some((prefix, name))
}

/// Zero-dependency exact/prefix router
///
/// Method lookup is O(1); exact paths are a hash lookup and prefix
/// paths a scan over the (short) prefix list.
#[derive(Debug, Default)]
pub struct Router {
    /// Method -> routes
    methods: HashMap<String, Table>,
    /// Routes that apply to every method
    any: Table,
}

impl Router {
    /// Create a new router
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route for a single method
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.), case-insensitive
    /// * `path` - Exact path, or a prefix ending in `*` / `*name`
    /// * `handler_id` - Unique identifier for the handler
    ///
    /// Re-inserting the same method and path replaces the handler.
    pub fn insert(&mut self, method: &str, path: &str, handler_id: u32) {
        self.methods
            .entry(method.to_uppercase())
            .or_default()
            .insert(path, handler_id);
    }

    /// Insert a route that applies to every method
    pub fn insert_any(&mut self, path: &str, handler_id: u32) {
        self.any.insert(path, handler_id);
    }

    /// Find a matching route
    ///
    /// # Returns
    /// `Some(Match)` with handler_id and captured params, or `None` if no match
    ///
    /// # Example
    /// ```
    /// use ferry_router::Router;
    ///
    /// let mut router = Router::new();
    /// router.insert("POST", "/files/*name", 0);
    ///
    /// let m = router.find("POST", "/files/notes.txt").unwrap();
    /// assert_eq!(m.param("name"), Some("notes.txt"));
    /// assert!(router.find("GET", "/files/notes.txt").is_none());
    /// ```
    pub fn find(&self, method: &str, path: &str) -> Option<Match> {
        self.methods
            .get(&method.to_uppercase())
            .and_then(|table| table.find(path))
            .or_else(|| self.any.find(path))
    }

    /// Check if a method has any routes registered
    pub fn has_method(&self, method: &str) -> bool {
        self.methods
            .get(&method.to_uppercase())
            .is_some_and(|table| !table.is_empty())
    }

    /// Check whether no routes at all are registered
    pub fn is_empty(&self) -> bool {
        self.any.is_empty() && self.methods.values().all(Table::is_empty)
    }
}
