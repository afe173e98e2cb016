//! Transient preview references.
//!
//! The registry maps [`PreviewUrl`]s to the content they were minted for,
//! the way a browser keeps its object-URL table. Every reference it mints
//! stays live until it is revoked.

use std::collections::HashMap;

use records::{ContentHandle, PreviewUrl};

/// Table of live preview references.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: HashMap<PreviewUrl, ContentHandle>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a reference that resolves to `content` until revoked.
    pub fn create(&mut self, content: &ContentHandle) -> PreviewUrl {
        let url = PreviewUrl::mint();
        self.live.insert(url.clone(), content.clone());
        tracing::debug!("Created preview {} for {:?}", url, content.name());
        url
    }

    /// Resolves a live reference.
    pub fn resolve(&self, url: &PreviewUrl) -> Option<ContentHandle> {
        self.live.get(url).cloned()
    }

    /// Releases a reference. Returns false if it was not live.
    pub fn revoke(&mut self, url: &PreviewUrl) -> bool {
        let revoked = self.live.remove(url).is_some();
        if revoked {
            tracing::debug!("Revoked preview {}", url);
        }
        revoked
    }

    /// Releases every live reference and returns how many there were.
    pub fn revoke_all(&mut self) -> usize {
        let count = self.live.len();
        self.live.clear();
        if count > 0 {
            tracing::debug!("Revoked {} previews", count);
        }
        count
    }

    /// Number of live references.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> ContentHandle {
        ContentHandle::new("a.txt", b"hello".to_vec())
    }

    #[test]
    fn test_create_and_resolve() {
        let mut registry = PreviewRegistry::new();
        let url = registry.create(&content());

        assert_eq!(registry.live_count(), 1);
        let resolved = registry.resolve(&url).unwrap();
        assert_eq!(resolved.bytes().as_ref(), b"hello");
    }

    #[test]
    fn test_each_create_mints_new_reference() {
        let mut registry = PreviewRegistry::new();
        let handle = content();
        let a = registry.create(&handle);
        let b = registry.create(&handle);

        assert_ne!(a, b);
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn test_revoke() {
        let mut registry = PreviewRegistry::new();
        let url = registry.create(&content());

        assert!(registry.revoke(&url));
        assert!(registry.resolve(&url).is_none());
        assert_eq!(registry.live_count(), 0);

        // Second revoke is a no-op
        assert!(!registry.revoke(&url));
    }

    #[test]
    fn test_revoke_all() {
        let mut registry = PreviewRegistry::new();
        for _ in 0..3 {
            registry.create(&content());
        }

        assert_eq!(registry.revoke_all(), 3);
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.revoke_all(), 0);
    }
}
