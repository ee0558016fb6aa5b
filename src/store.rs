//! Store Module
//!
//! The key → value container and the single dispatch primitive, `invoke`.
//!
//! ## Responsibilities
//! - Create values through the type registry
//! - Route actions to the value at a key under that key's lock
//! - Delete and enumerate keys
//! - Export / import tagged snapshots for codec adapters

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::codec::{self, Encoded};
use crate::config::StoreConfig;
use crate::datum::Datum;
use crate::error::{KvError, Result};
use crate::registry::{self, TypeRegistry};
use crate::value::Value;

/// Key → type id mapping describing a store's layout
pub type Schema = BTreeMap<String, String>;

/// What to do when creating a value at a key that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreatePolicy {
    /// Fail with `KeyExists`
    #[default]
    FailIfExists,

    /// Atomically replace the existing value
    Replace,
}

/// How `Store::import` treats entries that don't line up with the store
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Add keys that do not exist in the store
    pub add_keys: bool,

    /// Replace existing keys whose type differs from the imported one
    pub update_types: bool,

    /// Fail on keys that do not exist in the store.
    /// Only considered when `add_keys` is false.
    pub err_on_invalid_key: bool,
}

/// One key's slot
///
/// `value` is `None` once the entry has been unlinked from the map by a delete
/// or replace. Invokers that raced with the unlink see the tombstone under the
/// key lock and look the key up again.
struct Entry {
    type_id: String,
    value: Mutex<Option<Box<dyn Value>>>,
}

impl Entry {
    fn new(value: Box<dyn Value>) -> Arc<Self> {
        Arc::new(Self {
            type_id: value.type_id().to_string(),
            value: Mutex::new(Some(value)),
        })
    }

    /// Tombstone an entry that is no longer in the map
    ///
    /// Waits for an in-flight action on it to finish. Must not be called with
    /// the map lock held.
    fn retire(&self) {
        *self.value.lock() = None;
    }
}

/// The in-memory store
///
/// ## Concurrency Model: Per-Key Locking
///
/// - **Map lock** (`RwLock<HashMap>`): held only to look up, insert, or unlink
///   entries. Never held while an action runs or while waiting on a key lock.
/// - **Key lock** (`Mutex` per entry): held for the duration of one action,
///   so actions on the same key are serialized and actions on different keys
///   run in parallel.
///
/// The two locks are never held together. Replace and delete swap the entry
/// out under the map lock, release it, and only then take the old entry's key
/// lock to tombstone it, so a busy key never stalls lookups of other keys.
///
/// There are no multi-key transactions: each operation is atomic for its key
/// only.
pub struct Store {
    /// Store configuration
    config: StoreConfig,

    /// Frozen registry used to construct values
    registry: Arc<TypeRegistry>,

    /// Key → entry
    kv: RwLock<HashMap<String, Arc<Entry>>>,
}

impl Store {
    /// Create an empty store backed by the global type registry
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with the given config and the global registry
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_registry(registry::global(), config)
    }

    /// Create an empty store backed by a specific registry
    pub fn with_registry(registry: Arc<TypeRegistry>, config: StoreConfig) -> Self {
        let kv = HashMap::with_capacity(config.initial_capacity);
        Self {
            config,
            registry,
            kv: RwLock::new(kv),
        }
    }

    /// Create a store and add every key of `schema` with its zero value
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        Self::from_schema_with_registry(registry::global(), StoreConfig::default(), schema)
    }

    /// Like [`Store::from_schema`], with an explicit registry and config
    pub fn from_schema_with_registry(
        registry: Arc<TypeRegistry>,
        config: StoreConfig,
        schema: &Schema,
    ) -> Result<Self> {
        let store = Self::with_registry(registry, config);
        for (key, type_id) in schema {
            store.create_or_fail(key, type_id)?;
        }
        Ok(store)
    }

    // =========================================================================
    // Key Lifecycle
    // =========================================================================

    /// Create a zero value of `type_id` at `key`; fails if the key exists
    pub fn create(&self, key: &str, type_id: &str) -> Result<()> {
        self.create_or_fail(key, type_id)
    }

    /// Create a zero value of `type_id` at `key`; fails if the key exists
    pub fn create_or_fail(&self, key: &str, type_id: &str) -> Result<()> {
        self.create_with_policy(key, type_id, CreatePolicy::FailIfExists)
    }

    /// Create a zero value of `type_id` at `key`, replacing any existing value
    pub fn create_or_replace(&self, key: &str, type_id: &str) -> Result<()> {
        self.create_with_policy(key, type_id, CreatePolicy::Replace)
    }

    fn create_with_policy(&self, key: &str, type_id: &str, policy: CreatePolicy) -> Result<()> {
        self.validate_key(key)?;
        let value = self.registry.new_value(type_id)?;
        self.link(key, value, policy)
    }

    /// Insert an already-constructed value (e.g. one produced by a codec)
    ///
    /// The value's type must be registered with this store's registry and
    /// expose exactly the registered action set.
    pub fn insert_value(&self, key: &str, value: Box<dyn Value>, policy: CreatePolicy) -> Result<()> {
        self.validate_key(key)?;
        self.check_registered(&*value)?;
        self.link(key, value, policy)
    }

    fn check_registered(&self, value: &dyn Value) -> Result<()> {
        let registered = self.registry.actions_of(value.type_id())?;

        let mut actions = value.actions();
        actions.sort_unstable();
        if !actions.iter().copied().eq(registered.iter().map(String::as_str)) {
            tracing::warn!(
                type_id = value.type_id(),
                "Value does not expose its registered action set"
            );
            return Err(KvError::Invariant(format!(
                "{:?} value exposes actions {:?}, registered as {:?}",
                value.type_id(),
                actions,
                registered
            )));
        }
        Ok(())
    }

    fn link(&self, key: &str, value: Box<dyn Value>, policy: CreatePolicy) -> Result<()> {
        let entry = Entry::new(value);
        let type_id = entry.type_id.clone();

        let old = {
            let mut kv = self.kv.write();
            if policy == CreatePolicy::FailIfExists && kv.contains_key(key) {
                return Err(KvError::KeyExists {
                    key: key.to_string(),
                });
            }
            kv.insert(key.to_string(), entry)
        };

        match old {
            Some(old) => {
                old.retire();
                tracing::debug!(key, type_id = %type_id, "Replaced key");
            }
            None => {
                tracing::debug!(key, type_id = %type_id, "Created key");
            }
        }
        Ok(())
    }

    /// Delete a key
    ///
    /// Returns once any in-flight action on the key has finished.
    pub fn delete(&self, key: &str) -> Result<()> {
        let entry = self
            .kv
            .write()
            .remove(key)
            .ok_or_else(|| KvError::key_not_found(key))?;
        entry.retire();

        tracing::debug!(key, "Deleted key");
        Ok(())
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Invoke the named action on the value at `key`
    pub fn invoke(&self, key: &str, action: &str, args: &[Datum]) -> Result<Datum> {
        self.with_value_mut(key, |value| {
            tracing::trace!(key, action, args = args.len(), "Invoking action");
            value
                .invoke(action, args)
                .map_err(|source| KvError::Action {
                    key: key.to_string(),
                    source,
                })
        })?
    }

    /// Run `f` with exclusive access to the value at `key`
    fn with_value_mut<R>(&self, key: &str, f: impl FnOnce(&mut dyn Value) -> R) -> Result<R> {
        loop {
            let entry = self.entry(key)?;
            let mut slot = entry.value.lock();
            if let Some(value) = slot.as_mut() {
                return Ok(f(&mut **value));
            }
            // Unlinked while we waited; the map holds the current entry
        }
    }

    /// Run `f` with read access to the value at `key`
    fn with_value<R>(&self, key: &str, f: impl FnOnce(&dyn Value) -> R) -> Result<R> {
        self.with_value_mut(key, |value| f(value))
    }

    fn entry(&self, key: &str) -> Result<Arc<Entry>> {
        self.kv
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| KvError::key_not_found(key))
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// Point-in-time snapshot of all keys, sorted
    ///
    /// Keys may be deleted before the caller acts on them.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.kv.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.kv.read().contains_key(key)
    }

    /// Type id of the value at `key`
    pub fn type_of(&self, key: &str) -> Result<String> {
        self.entry(key).map(|entry| entry.type_id.clone())
    }

    /// Point-in-time key → type id mapping
    pub fn schema(&self) -> Schema {
        self.kv
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.type_id.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.kv.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.kv.read().is_empty()
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Encode the value at one key
    pub fn export_key(&self, key: &str) -> Result<Encoded> {
        self.with_value(key, codec::encode)
    }

    /// Encode every key
    ///
    /// Each key is captured atomically; the export as a whole is not.
    pub fn export(&self) -> BTreeMap<String, Encoded> {
        let mut out = BTreeMap::new();
        for key in self.keys() {
            match self.export_key(&key) {
                Ok(encoded) => {
                    out.insert(key, encoded);
                }
                // Deleted since `keys()`
                Err(_) => continue,
            }
        }
        out
    }

    /// Load a snapshot into the existing value at `key`
    ///
    /// The snapshot's type must match the key's type. The state is replaced
    /// under the key lock, so concurrent actions see either the old or the
    /// new state.
    pub fn import_key(&self, key: &str, encoded: Encoded) -> Result<()> {
        self.with_value_mut(key, |value| {
            if value.type_id() != encoded.type_id {
                return Err(KvError::TypeMismatch {
                    key: key.to_string(),
                    expected: value.type_id().to_string(),
                    found: encoded.type_id,
                });
            }
            value.restore(encoded.value)
        })?
    }

    /// Load tagged values into the store
    ///
    /// By default keys that are not already in the store are skipped; see
    /// [`ImportOptions`]. Every imported key is replaced atomically, and the
    /// key's presence and type are checked in the same step.
    pub fn import(&self, entries: BTreeMap<String, Encoded>, opts: ImportOptions) -> Result<()> {
        for (key, encoded) in entries {
            if !opts.add_keys && !self.contains_key(&key) {
                if opts.err_on_invalid_key {
                    return Err(KvError::key_not_found(&key));
                }
                tracing::warn!(key = %key, "Skipping import of unknown key");
                continue;
            }

            self.validate_key(&key)?;
            let value = codec::decode(&self.registry, encoded)?;
            self.check_registered(&*value)?;
            self.import_value(&key, value, opts)?;
        }
        Ok(())
    }

    fn import_value(&self, key: &str, value: Box<dyn Value>, opts: ImportOptions) -> Result<()> {
        let entry = Entry::new(value);

        let old = {
            let mut kv = self.kv.write();
            match kv.get(key) {
                Some(current) if current.type_id != entry.type_id && !opts.update_types => {
                    return Err(KvError::TypeMismatch {
                        key: key.to_string(),
                        expected: current.type_id.clone(),
                        found: entry.type_id.clone(),
                    });
                }
                Some(_) => {}
                None if opts.add_keys => {}
                None if opts.err_on_invalid_key => return Err(KvError::key_not_found(key)),
                None => {
                    tracing::warn!(key, "Skipping import of key deleted during import");
                    return Ok(());
                }
            }
            kv.insert(key.to_string(), entry)
        };

        if let Some(old) = old {
            old.retire();
        }
        tracing::debug!(key, "Imported key");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The registry this store constructs values from
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn validate_key(&self, key: &str) -> Result<()> {
        let reason = if key.is_empty() {
            "key must not be empty".to_string()
        } else if key.len() > self.config.max_key_len {
            format!(
                "key is {} bytes, limit is {}",
                key.len(),
                self.config.max_key_len
            )
        } else {
            return Ok(());
        };

        Err(KvError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn setup_store() -> Store {
        let registry = Arc::new(TypeRegistry::with_std_types().unwrap());
        Store::with_registry(registry, StoreConfig::default())
    }

    #[test]
    fn test_import_value_checks_type_while_linking() {
        let store = setup_store();
        store.create("k", "int").unwrap();

        let value = store.registry.new_value("string").unwrap();
        let err = store
            .import_value("k", value, ImportOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(store.type_of("k").unwrap(), "int");

        let opts = ImportOptions {
            update_types: true,
            ..Default::default()
        };
        let value = store.registry.new_value("string").unwrap();
        store.import_value("k", value, opts).unwrap();
        assert_eq!(store.type_of("k").unwrap(), "string");
    }

    #[test]
    fn test_import_value_rechecks_presence() {
        let store = setup_store();

        // Key deleted after the caller saw it: skipped unless keys may be added
        let value = store.registry.new_value("int").unwrap();
        store
            .import_value("gone", value, ImportOptions::default())
            .unwrap();
        assert!(!store.contains_key("gone"));

        let opts = ImportOptions {
            err_on_invalid_key: true,
            ..Default::default()
        };
        let value = store.registry.new_value("int").unwrap();
        let err = store.import_value("gone", value, opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    }

    #[test]
    fn test_retired_entry_is_tombstoned() {
        let store = setup_store();
        store.create("k", "int").unwrap();
        let old = store.entry("k").unwrap();

        store.create_or_replace("k", "string").unwrap();
        assert!(old.value.lock().is_none());
        assert_eq!(store.type_of("k").unwrap(), "string");
    }
}
