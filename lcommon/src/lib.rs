//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use lcommon::{Registry, SessionId, truncate_for_log};
//!
//! let session = SessionId::from("session-1");
//! let mut registry = Registry::new();
//! registry.insert("alpha".to_string(), 1_u32);
//!
//! assert_eq!(session.as_str(), "session-1");
//! assert_eq!(registry.get("alpha"), Some(&1));
//! assert_eq!(truncate_for_log("abcdef", 3), "abc…");
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use lcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Cross-crate identifier newtypes.
    //!
    //! ```rust
    //! use lcommon::SessionId;
    //!
    //! let session = SessionId::new("session-42");
    //! assert_eq!(session.to_string(), "session-42");
    //! assert!(!session.is_blank());
    //! ```

    use std::fmt::{Display, Formatter};

    /// Caller-supplied, opaque conversation key.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }

        pub fn is_blank(&self) -> bool {
            self.0.trim().is_empty()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    impl From<&SessionId> for SessionId {
        fn from(value: &SessionId) -> Self {
            value.clone()
        }
    }
}

pub mod registry {
    //! Generic registry map wrapper used by runtime registries.
    //!
    //! ```rust
    //! use lcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert!(registry.contains_key("alpha"));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash,
    {
        pub fn new() -> Self {
            Self::default()
        }

        /// Inserts `value`, returning the entry it replaced.
        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.values()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub mod text {
    //! Text helpers shared by logging call sites.

    /// Cuts `value` to at most `max_chars` characters, marking the cut with `…`.
    pub fn truncate_for_log(value: &str, max_chars: usize) -> String {
        match value.char_indices().nth(max_chars) {
            Some((index, _)) => format!("{}…", &value[..index]),
            None => value.to_string(),
        }
    }
}

pub use context::SessionId;
pub use future::BoxFuture;
pub use registry::Registry;
pub use text::truncate_for_log;

#[cfg(test)]
mod tests {
    use super::{Registry, SessionId, truncate_for_log};

    #[test]
    fn session_id_round_trips_strings() {
        let session = SessionId::new("session-1");
        let copied = SessionId::from(&session);

        assert_eq!(session.as_str(), "session-1");
        assert_eq!(session.to_string(), "session-1");
        assert_eq!(copied, session);
        assert!(SessionId::from("   ").is_blank());
    }

    #[test]
    fn generic_registry_replaces_existing_keys() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.insert("alpha".to_string(), 1_u32), None);
        assert_eq!(registry.insert("alpha".to_string(), 2_u32), Some(1));
        assert_eq!(registry.get("alpha"), Some(&2));
        assert!(registry.contains_key("alpha"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn truncate_for_log_respects_char_boundaries() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("héllo wörld", 5), "héllo…");
        assert_eq!(truncate_for_log("", 0), "");
    }
}
