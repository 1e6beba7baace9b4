//! Domain Value Objects

/// The single upstream base URL every proxied request is rewritten against.
///
/// Resolved once at startup and immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOrigin {
    base: String,
}

impl BackendOrigin {
    /// Create an origin from a base URL, normalizing away a trailing slash
    /// so path concatenation stays predictable.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Build the target URL for a proxied request.
    ///
    /// The query string is appended verbatim: key order and repeated keys
    /// must survive exactly as received.
    pub fn url_for(&self, path: &str, raw_query: Option<&str>) -> String {
        match raw_query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.base, path, q),
            _ => format!("{}{}", self.base, path),
        }
    }

    /// Whether a redirect `Location` points back under this origin.
    ///
    /// Internal locations are resolved by the gateway itself; anything else
    /// is handed back to the caller to follow. The base must end at an
    /// authority boundary: `http://backend:8000.evil.example/...` extends
    /// the host and is NOT under `http://backend:8000`.
    pub fn contains(&self, location: &str) -> bool {
        match location.strip_prefix(&self.base) {
            Some(rest) => matches!(rest.chars().next(), None | Some('/' | '?' | '#')),
            None => false,
        }
    }
}
