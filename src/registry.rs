//! Type Registry
//!
//! Maps type identifiers to constructors producing zero-value instances.
//!
//! ## Lifecycle
//! 1. Build a [`TypeRegistry`] at startup and register every type (`&mut self`).
//! 2. Freeze it behind an `Arc`, either per store ([`crate::Store::with_registry`])
//!    or process-wide via [`install`].
//! 3. From then on it is read-only: concurrent [`TypeRegistry::new_value`]
//!    calls need no locking.
//!
//! Registration takes `&mut self`, so it cannot race with lookups once the
//! registry is shared.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{KvError, Result};
use crate::value::{Bound, Value, ValueType};

/// Constructor producing a zero-value instance with its action set populated
pub type Constructor = Arc<dyn Fn() -> Box<dyn Value> + Send + Sync>;

struct Registration {
    constructor: Constructor,
    /// Sorted action names, captured when the type was registered
    actions: Vec<String>,
}

/// Registry of value types
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<String, Registration>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard value types
    pub fn with_std_types() -> Result<Self> {
        let mut registry = Self::new();
        crate::types::register_std(&mut registry)?;
        Ok(registry)
    }

    /// Register a [`ValueType`]
    ///
    /// The action table is built here, once, and shared by every instance.
    pub fn register<V: ValueType>(&mut self) -> Result<()> {
        if self.contains(V::TYPE_ID) {
            return Err(KvError::DuplicateType {
                type_id: V::TYPE_ID.to_string(),
            });
        }

        let table = Arc::new(V::action_table()?);
        if table.type_id() != V::TYPE_ID {
            return Err(KvError::Invariant(format!(
                "action table for {:?} was built for {:?}",
                V::TYPE_ID,
                table.type_id()
            )));
        }

        self.register_constructor(V::TYPE_ID, move || {
            Box::new(Bound::<V>::new(Arc::clone(&table))) as Box<dyn Value>
        })
    }

    /// Register a type by raw constructor
    ///
    /// The constructor is called once to validate it: the value it yields must
    /// report `type_id` and expose at least one action.
    pub fn register_constructor<F>(&mut self, type_id: &str, constructor: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Value> + Send + Sync + 'static,
    {
        if self.contains(type_id) {
            return Err(KvError::DuplicateType {
                type_id: type_id.to_string(),
            });
        }

        let probe = constructor();
        if probe.type_id() != type_id {
            return Err(KvError::Invariant(format!(
                "constructor registered as {:?} produced a {:?} value",
                type_id,
                probe.type_id()
            )));
        }

        let actions: Vec<String> = probe.actions().into_iter().map(str::to_string).collect();
        if actions.is_empty() {
            return Err(KvError::Invariant(format!(
                "constructor for {:?} produced a value with no actions",
                type_id
            )));
        }

        tracing::debug!(type_id, actions = actions.len(), "Registered value type");

        self.types.insert(
            type_id.to_string(),
            Registration {
                constructor: Arc::new(constructor),
                actions,
            },
        );
        Ok(())
    }

    /// Construct a zero value of the given type
    pub fn new_value(&self, type_id: &str) -> Result<Box<dyn Value>> {
        let registration = self
            .types
            .get(type_id)
            .ok_or_else(|| KvError::unknown_type(type_id))?;

        let value = (registration.constructor)();
        if value.type_id() != type_id {
            tracing::warn!(
                type_id,
                produced = value.type_id(),
                "Constructor produced a value of the wrong type"
            );
            return Err(KvError::Invariant(format!(
                "constructor registered as {:?} produced a {:?} value",
                type_id,
                value.type_id()
            )));
        }

        Ok(value)
    }

    /// Check if a type is registered
    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// All registered type ids, sorted
    pub fn type_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.types.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Action names of a registered type, sorted
    pub fn actions_of(&self, type_id: &str) -> Result<&[String]> {
        self.types
            .get(type_id)
            .map(|r| r.actions.as_slice())
            .ok_or_else(|| KvError::unknown_type(type_id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_ids())
            .finish()
    }
}

// =============================================================================
// Process-wide Registry
// =============================================================================

static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Freeze `registry` as the process-wide registry
///
/// Must run before the first call to [`global`]; fails if a registry was
/// already installed (or the default one was already initialized).
pub fn install(registry: TypeRegistry) -> Result<Arc<TypeRegistry>> {
    let registry = Arc::new(registry);
    GLOBAL.set(Arc::clone(&registry)).map_err(|_| {
        KvError::Invariant("global type registry is already initialized".to_string())
    })?;
    Ok(registry)
}

/// The process-wide registry
///
/// Defaults to the standard value types if nothing was installed.
///
/// # Panics
///
/// Panics if the standard value types fail to register, which means their
/// action tables are malformed.
pub fn global() -> Arc<TypeRegistry> {
    let registry = GLOBAL.get_or_init(|| {
        let registry = TypeRegistry::with_std_types()
            .expect("standard value types must register into an empty registry");
        Arc::new(registry)
    });
    Arc::clone(registry)
}
