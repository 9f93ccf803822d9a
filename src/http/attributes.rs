//! # Per-request attribute bag.
//!
//! [`Attributes`] is a scoped metadata store attached to a request's extensions,
//! independent of the immutable request fields. Middleware writes into it, the
//! bridge reads from it (e.g. to forward auth info to the worker).
//!
//! Clones share the same storage, so values set by an outer middleware are
//! visible to everything further down the chain.
//!
//! # Example
//! ```rust
//! use httpvisor::{Request, attributes};
//!
//! let req = attributes::init(Request::new(axum::body::Body::empty()));
//! let attrs = attributes::get(&req).unwrap();
//! attrs.set("user", String::from("ferris"));
//!
//! assert_eq!(attrs.get::<String>("user").as_deref().map(String::as_str), Some("ferris"));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::handler::Request;

type Value = Arc<dyn Any + Send + Sync>;

/// Shared, type-erased key/value store scoped to one request.
#[derive(Clone, Default)]
pub struct Attributes {
    inner: Arc<RwLock<HashMap<String, Value>>>,
}

impl Attributes {
    /// Stores `value` under `key`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.inner.write().insert(key.into(), Arc::new(value));
    }

    /// Returns the value under `key` if it was stored with type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self.inner.read().get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    /// Removes `key`; returns whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.inner.write().remove(key).is_some()
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Attaches a fresh, empty attribute bag to `req`.
///
/// An existing bag is replaced.
pub fn init(mut req: Request) -> Request {
    req.extensions_mut().insert(Attributes::default());
    req
}

/// Returns the attribute bag of `req`, if [`init`] was applied.
pub fn get(req: &Request) -> Option<&Attributes> {
    req.extensions().get::<Attributes>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn plain_request_has_no_bag() {
        let req = Request::new(Body::empty());
        assert!(get(&req).is_none());
    }

    #[test]
    fn init_attaches_a_fresh_bag() {
        let req = init(Request::new(Body::empty()));
        get(&req).unwrap().set("k", 1_u8);

        let req = init(req);
        assert!(get(&req).unwrap().is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let attrs = Attributes::default();
        let other = attrs.clone();
        attrs.set("user", String::from("ferris"));
        attrs.set("id", 7_u64);

        assert_eq!(other.get::<u64>("id").as_deref(), Some(&7));
        assert!(other.get::<u32>("id").is_none());
        assert_eq!(other.keys(), vec!["id".to_string(), "user".to_string()]);

        assert!(other.remove("id"));
        assert!(!other.remove("id"));
        assert_eq!(attrs.len(), 1);
    }
}
