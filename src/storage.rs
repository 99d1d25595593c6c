use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use uuid::Uuid;

/// StorageError
///
/// Raised when a client partition refuses a write. Reads never fail; a partition
/// that cannot be read behaves as if it were empty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("client storage is unavailable")]
    Unavailable,
    #[error("client storage rejected key `{0}`")]
    Rejected(String),
}

// 1. KeyValueStorage Contract
/// KeyValueStorage
///
/// The synchronous key/value contract of a single browser profile. It mirrors the
/// shape of web storage: string keys, string values, no expiry, no encryption.
/// The session store is built on top of this trait so the production partition
/// (`MemoryStorage`) and the test double (`MockStorage`) are interchangeable.
///
/// The batch operations are the primitive ones. Each must be applied as one
/// step, so a concurrent reader sees either all of a batch or none of it.
pub trait KeyValueStorage: Send + Sync {
    /// Reads `keys` in one consistent view, in the order given.
    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>>;

    /// Stores every pair, or none of them when the write is refused.
    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Removes `keys` together. Missing keys are ignored.
    fn remove_items(&self, keys: &[&str]);

    /// Number of stored keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the stored value, or `None` when the key is absent or unreadable.
    fn get_item(&self, key: &str) -> Option<String> {
        self.get_items(&[key]).pop().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_items(&[(key, value)])
    }

    fn remove_item(&self, key: &str) {
        self.remove_items(&[key]);
    }
}

// 2. The Real Implementation (in-process partition)
/// MemoryStorage
///
/// One browser profile's storage, held in process memory. Every batch runs under
/// a single lock guard. A poisoned lock is treated as "storage unavailable":
/// writes fail, reads come back empty.
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>> {
        match self.items.read() {
            Ok(items) => keys.iter().map(|key| items.get(*key).cloned()).collect(),
            Err(_) => vec![None; keys.len()],
        }
    }

    fn set_items(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Unavailable)?;
        for (key, value) in pairs {
            items.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) {
        if let Ok(mut items) = self.items.write() {
            for key in keys {
                items.remove(*key);
            }
        }
    }

    fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }
}

// 3. The Mock Implementation (For Tests)
/// MockStorage
///
/// A storage double for tests. It behaves like `MemoryStorage` but can be told to
/// reject every write, or any batch touching one key, to exercise the session
/// store's failure path.
#[derive(Default)]
pub struct MockStorage {
    inner: MemoryStorage,
    /// When true, all writes return a simulated failure.
    pub should_fail: bool,
    /// When set, a batch containing this key is refused as a whole.
    pub fail_on_key: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn failing_on(key: &str) -> Self {
        Self {
            fail_on_key: Some(key.to_string()),
            ..Self::default()
        }
    }
}

impl KeyValueStorage for MockStorage {
    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>> {
        self.inner.get_items(keys)
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable);
        }
        if let Some(key) = items
            .iter()
            .map(|(key, _)| *key)
            .find(|key| self.fail_on_key.as_deref() == Some(*key))
        {
            return Err(StorageError::Rejected(key.to_string()));
        }
        self.inner.set_items(items)
    }

    fn remove_items(&self, keys: &[&str]) {
        self.inner.remove_items(keys);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// StorageHandle
///
/// The shared handle to one client partition.
pub type StorageHandle = Arc<dyn KeyValueStorage>;

type StorageFactory = Arc<dyn Fn() -> StorageHandle + Send + Sync>;

/// StorageRegistry
///
/// Maps each client id (the `portal_client` cookie) to its own partition, the
/// server-side stand-in for "one browser profile". A partition exists only while
/// it holds data: it is created by the first write and dropped as soon as it is
/// empty again, so anonymous traffic leaves nothing behind.
#[derive(Clone)]
pub struct StorageRegistry {
    partitions: Arc<RwLock<HashMap<Uuid, StorageHandle>>>,
    factory: StorageFactory,
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::with_factory(|| Arc::new(MemoryStorage::new()) as StorageHandle)
    }
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry whose new partitions come from `factory`.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> StorageHandle + Send + Sync + 'static,
    {
        Self {
            partitions: Arc::new(RwLock::new(HashMap::new())),
            factory: Arc::new(factory),
        }
    }

    /// Returns a handle to the partition of `client_id`. Nothing is allocated
    /// until the handle is written to.
    pub fn partition(&self, client_id: Uuid) -> StorageHandle {
        Arc::new(ClientPartition {
            registry: self.clone(),
            client_id,
        })
    }

    /// Number of partitions currently holding data.
    pub fn len(&self) -> usize {
        self.partitions.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn existing(&self, client_id: Uuid) -> Option<StorageHandle> {
        self.partitions.read().ok()?.get(&client_id).cloned()
    }
}

/// ClientPartition
///
/// Registry-backed handle for one client id. Writes and removals hold the
/// registry lock so that creating and evicting a partition cannot interleave.
struct ClientPartition {
    registry: StorageRegistry,
    client_id: Uuid,
}

impl KeyValueStorage for ClientPartition {
    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>> {
        match self.registry.existing(self.client_id) {
            Some(partition) => partition.get_items(keys),
            None => vec![None; keys.len()],
        }
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut partitions = self
            .registry
            .partitions
            .write()
            .map_err(|_| StorageError::Unavailable)?;
        let partition = partitions
            .entry(self.client_id)
            .or_insert_with(|| (self.registry.factory)())
            .clone();

        let result = partition.set_items(items);
        if partition.is_empty() {
            partitions.remove(&self.client_id);
        }
        result
    }

    fn remove_items(&self, keys: &[&str]) {
        let Ok(mut partitions) = self.registry.partitions.write() else {
            return;
        };
        if let Some(partition) = partitions.get(&self.client_id).cloned() {
            partition.remove_items(keys);
            if partition.is_empty() {
                partitions.remove(&self.client_id);
            }
        }
    }

    fn len(&self) -> usize {
        self.registry
            .existing(self.client_id)
            .map(|partition| partition.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_overwrites_and_removes() {
        let storage = MemoryStorage::new();
        storage.set_item("userToken", "a").unwrap();
        storage.set_item("userToken", "b").unwrap();
        assert_eq!(storage.get_item("userToken").as_deref(), Some("b"));

        storage.remove_item("userToken");
        storage.remove_item("userToken");
        assert_eq!(storage.get_item("userToken"), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn memory_storage_batches() {
        let storage = MemoryStorage::new();
        storage
            .set_items(&[("userToken", "t1"), ("userRole", "ADMIN")])
            .unwrap();
        assert_eq!(
            storage.get_items(&["userRole", "userId", "userToken"]),
            [Some("ADMIN".to_string()), None, Some("t1".to_string())]
        );

        storage.remove_items(&["userToken", "userRole", "userId"]);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn registry_keeps_partitions_apart() {
        let registry = StorageRegistry::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        registry.partition(alice).set_item("userRole", "ADMIN").unwrap();

        assert_eq!(
            registry.partition(alice).get_item("userRole").as_deref(),
            Some("ADMIN")
        );
        assert_eq!(registry.partition(bob).get_item("userRole"), None);
        // Reading bob's partition did not create it
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_drops_emptied_partitions() {
        let registry = StorageRegistry::new();
        let client = registry.partition(Uuid::new_v4());

        client.set_items(&[("userToken", "t1"), ("userRole", "USER")]).unwrap();
        client.remove_item("userToken");
        assert_eq!(registry.len(), 1);

        client.remove_item("userRole");
        assert!(registry.is_empty());
        assert_eq!(client.get_item("userRole"), None);
    }

    #[test]
    fn registry_drops_partition_after_refused_first_write() {
        let registry = StorageRegistry::with_factory(|| {
            Arc::new(MockStorage::new_failing()) as StorageHandle
        });
        let client = registry.partition(Uuid::new_v4());

        assert_eq!(
            client.set_item("userToken", "t1"),
            Err(StorageError::Unavailable)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn mock_refuses_whole_batch_for_failing_key() {
        let storage = MockStorage::failing_on("userId");
        assert!(storage.set_item("userToken", "t1").is_ok());
        assert_eq!(
            storage.set_items(&[("userRole", "USER"), ("userId", "7")]),
            Err(StorageError::Rejected("userId".to_string()))
        );
        assert_eq!(storage.get_item("userRole"), None);
    }
}
