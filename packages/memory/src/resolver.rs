//! Resolver mapping storage type names to in-memory pools.

use std::collections::HashMap;
use std::sync::Arc;

use devicefs_storage::{DeviceStorage, StorageResolver};

use crate::MemoryStorage;

/// A table of in-memory storage pools keyed by storage type.
///
/// This is the test-time substitute for the native storage subsystem:
/// hand one to `DeviceFs` and every path of the form `"<type>:<rel>"`
/// resolves against the pool registered for `<type>`. Unregistered types
/// resolve to nothing, which the adapter reports as a storage-not-found
/// failure.
pub struct MemoryResolver {
    storages: HashMap<String, Arc<MemoryStorage>>,
}

impl MemoryResolver {
    /// An empty resolver; nothing resolves until pools are inserted.
    pub fn new() -> Self {
        Self {
            storages: HashMap::new(),
        }
    }

    /// A resolver with a fresh default pool per storage type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use devicefs_memory::MemoryResolver;
    /// use devicefs_storage::StorageResolver;
    ///
    /// let resolver = MemoryResolver::with_types(["sdcard", "music"]);
    /// assert!(resolver.resolve("sdcard").is_some());
    /// assert!(resolver.resolve("videos").is_none());
    /// ```
    pub fn with_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut resolver = Self::new();
        for storage_type in types {
            resolver.insert(MemoryStorage::new(storage_type));
        }
        resolver
    }

    /// Register a pool under its own storage type, replacing any previous
    /// pool for that type.
    pub fn insert(&mut self, storage: MemoryStorage) {
        self.storages
            .insert(storage.storage_type().to_string(), Arc::new(storage));
    }

    /// The concrete pool for a storage type, for direct inspection in tests.
    pub fn storage(&self, storage_type: &str) -> Option<Arc<MemoryStorage>> {
        self.storages.get(storage_type).cloned()
    }
}

impl Default for MemoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageResolver for MemoryResolver {
    fn resolve(&self, storage_type: &str) -> Option<Arc<dyn DeviceStorage>> {
        self.storages
            .get(storage_type)
            .map(|storage| storage.clone() as Arc<dyn DeviceStorage>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandleShape;

    #[test]
    fn resolves_registered_types_only() {
        let resolver = MemoryResolver::with_types(["sdcard"]);

        assert!(resolver.resolve("sdcard").is_some());
        assert!(resolver.resolve("music").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn insert_replaces_existing_pool() {
        let mut resolver = MemoryResolver::with_types(["sdcard"]);
        let before = resolver.storage("sdcard").unwrap();

        resolver.insert(MemoryStorage::with_shape("sdcard", HandleShape::Deferred));
        let after = resolver.storage("sdcard").unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn storage_accessor_shares_the_pool() {
        let resolver = MemoryResolver::with_types(["sdcard"]);
        let a = resolver.storage("sdcard").unwrap();
        let b = resolver.storage("sdcard").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
