//! Ordered API key pool
//!
//! Keys are loaded once at startup and never mutated afterwards; the pool
//! is shared read-only across concurrent requests. Ordering is significant:
//! index 0 has the highest fallback priority.

use std::fmt;

/// An opaque Gemini API key.
///
/// `Display` and `Debug` render a masked form so the raw key never reaches
/// logs; the raw value is only reachable via [`ApiKey::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the raw key value (for the auth header only)
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked rendering: first four characters followed by "****"
    pub fn masked(&self) -> String {
        if self.0.chars().count() < 8 {
            return "****".to_string();
        }
        let prefix: String = self.0.chars().take(4).collect();
        format!("{}****", prefix)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

/// An ordered pool of API keys.
///
/// Duplicates are permitted (they simply yield identical attempts) and an
/// empty pool is a valid degenerate state.
#[derive(Debug, Clone, Default)]
pub struct KeyPool {
    keys: Vec<ApiKey>,
}

impl KeyPool {
    /// Create a pool from keys, preserving their order
    pub fn new(keys: Vec<ApiKey>) -> Self {
        Self { keys }
    }

    /// Create a pool from raw key strings
    pub fn from_raw<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(keys.into_iter().map(ApiKey::new).collect())
    }

    /// Number of keys in the pool
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate keys in fallback order
    pub fn iter(&self) -> impl Iterator<Item = &ApiKey> {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_preserves_order() {
        let pool = KeyPool::from_raw(["first-key-0001", "second-key-0002", "third-key-0003"]);
        let raw: Vec<&str> = pool.iter().map(|k| k.expose()).collect();
        assert_eq!(raw, ["first-key-0001", "second-key-0002", "third-key-0003"]);
    }

    #[test]
    fn test_empty_pool() {
        let pool = KeyPool::default();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_duplicates_are_permitted() {
        let pool = KeyPool::from_raw(["same-key-0001", "same-key-0001"]);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_display_masks_key() {
        let key = ApiKey::new("AIzaSyExampleExampleExample");
        assert_eq!(format!("{}", key), "AIza****");
        assert!(!format!("{:?}", key).contains("Example"));
    }

    #[test]
    fn test_short_key_fully_masked() {
        let key = ApiKey::new("abc");
        assert_eq!(key.masked(), "****");
    }
}
