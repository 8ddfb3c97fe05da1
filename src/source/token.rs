use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-wide store of session tokens, keyed by trivia source.
pub trait TokenCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, token: String);
    fn invalidate(&self, key: &str);
}

#[derive(Clone, Default)]
pub struct InMemoryTokenCache {
    tokens: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds the cache lock for the duration of `f`; a poisoned lock still
    /// yields the map since tokens carry no invariants.
    fn with_tokens<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut guard = self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl TokenCache for InMemoryTokenCache {
    fn get(&self, key: &str) -> Option<String> {
        self.with_tokens(|tokens| tokens.get(key).cloned())
    }

    fn store(&self, key: &str, token: String) {
        self.with_tokens(|tokens| {
            tokens.insert(key.to_string(), token);
        });
    }

    fn invalidate(&self, key: &str) {
        self.with_tokens(|tokens| {
            tokens.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lifecycle() {
        let cache = InMemoryTokenCache::new();
        assert_eq!(cache.get("https://opentdb.com"), None);

        cache.store("https://opentdb.com", "first".to_string());
        assert_eq!(cache.get("https://opentdb.com").as_deref(), Some("first"));

        cache.store("https://opentdb.com", "second".to_string());
        assert_eq!(cache.get("https://opentdb.com").as_deref(), Some("second"));

        cache.invalidate("https://opentdb.com");
        assert_eq!(cache.get("https://opentdb.com"), None);
    }

    #[test]
    fn test_clones_share_tokens() {
        let cache = InMemoryTokenCache::new();
        let shared = cache.clone();
        shared.store("a", "token-a".to_string());
        cache.store("b", "token-b".to_string());

        assert_eq!(cache.get("a").as_deref(), Some("token-a"));
        assert_eq!(shared.get("b").as_deref(), Some("token-b"));
        shared.invalidate("a");
        assert_eq!(cache.get("a"), None);
    }
}
