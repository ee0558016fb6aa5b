//! Tests for TypeRegistry
//!
//! These tests verify:
//! - Registration of custom value types
//! - Duplicate and unknown type handling
//! - Every instance of a type exposes the same action set
//! - Constructors that break the value protocol are rejected

use std::sync::Arc;

use actionkv::datum::args;
use actionkv::{
    ActionError, ActionTable, Datum, ErrorKind, KvError, Store, StoreConfig, TypeRegistry,
    Value, ValueType,
};

// =============================================================================
// Custom Value Types
// =============================================================================

/// A boolean toggle, registered the same way the standard types are
#[derive(Debug, Default)]
struct Flag(bool);

impl Flag {
    fn get(&mut self, a: &[Datum]) -> Result<Datum, ActionError> {
        args::arity("get", a, 0, 0)?;
        Ok(Datum::Bool(self.0))
    }

    fn toggle(&mut self, a: &[Datum]) -> Result<Datum, ActionError> {
        args::arity("toggle", a, 0, 0)?;
        self.0 = !self.0;
        Ok(Datum::Bool(self.0))
    }
}

impl ValueType for Flag {
    const TYPE_ID: &'static str = "flag";

    fn action_table() -> actionkv::Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action("get", Self::get)
            .action("toggle", Self::toggle)
            .build()
    }

    fn snapshot(&self) -> Datum {
        Datum::Bool(self.0)
    }

    fn from_snapshot(snapshot: Datum) -> actionkv::Result<Self> {
        snapshot
            .as_bool()
            .map(Flag)
            .ok_or_else(|| KvError::Codec("flag snapshot must be a bool".into()))
    }
}

/// A hand-written value that lies about its type id
struct Impostor;

impl Value for Impostor {
    fn type_id(&self) -> &str {
        "something-else"
    }

    fn invoke(&mut self, action: &str, _args: &[Datum]) -> Result<Datum, ActionError> {
        Err(ActionError::UnknownAction {
            type_id: "something-else".into(),
            action: action.into(),
        })
    }

    fn actions(&self) -> Vec<&str> {
        vec!["noop"]
    }

    fn snapshot(&self) -> Datum {
        Datum::Null
    }

    fn restore(&mut self, _snapshot: Datum) -> actionkv::Result<()> {
        Ok(())
    }
}

/// A hand-written `flag` whose action set differs from the registered one
struct Partial;

impl Value for Partial {
    fn type_id(&self) -> &str {
        "flag"
    }

    fn invoke(&mut self, action: &str, _args: &[Datum]) -> Result<Datum, ActionError> {
        match action {
            "get" => Ok(Datum::Bool(false)),
            _ => Err(ActionError::UnknownAction {
                type_id: "flag".into(),
                action: action.into(),
            }),
        }
    }

    fn actions(&self) -> Vec<&str> {
        vec!["get"]
    }

    fn snapshot(&self) -> Datum {
        Datum::Bool(false)
    }

    fn restore(&mut self, _snapshot: Datum) -> actionkv::Result<()> {
        Ok(())
    }
}

/// A hand-written value with no actions
struct Inert;

impl Value for Inert {
    fn type_id(&self) -> &str {
        "inert"
    }

    fn invoke(&mut self, action: &str, _args: &[Datum]) -> Result<Datum, ActionError> {
        Err(ActionError::UnknownAction {
            type_id: "inert".into(),
            action: action.into(),
        })
    }

    fn actions(&self) -> Vec<&str> {
        Vec::new()
    }

    fn snapshot(&self) -> Datum {
        Datum::Null
    }

    fn restore(&mut self, _snapshot: Datum) -> actionkv::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Registration Tests
// =============================================================================

#[test]
fn test_std_types_registered() {
    let registry = TypeRegistry::with_std_types().unwrap();
    assert_eq!(
        registry.type_ids(),
        vec!["hash", "int", "list", "set", "string", "zhash", "zset"]
    );
}

#[test]
fn test_register_custom_type() {
    let mut registry = TypeRegistry::with_std_types().unwrap();
    registry.register::<Flag>().unwrap();

    let store = Store::with_registry(Arc::new(registry), StoreConfig::default());
    store.create("f", "flag").unwrap();

    assert_eq!(store.invoke("f", "toggle", &[]).unwrap(), Datum::Bool(true));
    assert_eq!(store.invoke("f", "get", &[]).unwrap(), Datum::Bool(true));
}

#[test]
fn test_duplicate_type_rejected() {
    let mut registry = TypeRegistry::new();
    registry.register::<Flag>().unwrap();

    let err = registry.register::<Flag>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateType);

    let err = registry
        .register_constructor("flag", || Box::new(Inert) as Box<dyn Value>)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateType);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unknown_type_lookup() {
    let registry = TypeRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(
        registry.new_value("nope").err().map(|e| e.kind()),
        Some(ErrorKind::UnknownType)
    );
    assert_eq!(
        registry.actions_of("nope").err().map(|e| e.kind()),
        Some(ErrorKind::UnknownType)
    );
}

// =============================================================================
// Action Set Invariant Tests
// =============================================================================

#[test]
fn test_every_instance_has_same_nonempty_actions() {
    let registry = TypeRegistry::with_std_types().unwrap();

    for type_id in registry.type_ids() {
        let first = registry.new_value(&type_id).unwrap();
        let second = registry.new_value(&type_id).unwrap();

        assert!(!first.actions().is_empty(), "{} has no actions", type_id);
        assert_eq!(first.actions(), second.actions());
        assert_eq!(first.type_id(), type_id);

        let registered: Vec<&str> = registry
            .actions_of(&type_id)
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(first.actions(), registered);
    }
}

#[test]
fn test_instances_do_not_share_state() {
    let registry = TypeRegistry::with_std_types().unwrap();

    let mut a = registry.new_value("int").unwrap();
    let mut b = registry.new_value("int").unwrap();
    a.invoke("incrementBy", &[Datum::Int(3)]).unwrap();

    assert_eq!(a.invoke("get", &[]).unwrap(), Datum::Int(3));
    assert_eq!(b.invoke("get", &[]).unwrap(), Datum::Int(0));
}

// =============================================================================
// Protocol Violation Tests
// =============================================================================

#[test]
fn test_constructor_with_wrong_type_id_is_invariant_violation() {
    let mut registry = TypeRegistry::new();
    let err = registry
        .register_constructor("impostor", || Box::new(Impostor) as Box<dyn Value>)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invariant);
    assert!(err.is_fatal());
    assert!(!registry.contains("impostor"));
}

#[test]
fn test_constructor_without_actions_is_invariant_violation() {
    let mut registry = TypeRegistry::new();
    let err = registry
        .register_constructor("inert", || Box::new(Inert) as Box<dyn Value>)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[test]
fn test_store_rejects_value_of_unregistered_type() {
    let mut registry = TypeRegistry::new();
    registry.register::<Flag>().unwrap();
    let store = Store::with_registry(Arc::new(registry), StoreConfig::default());

    let err = store
        .insert_value("k", Box::new(Impostor), actionkv::CreatePolicy::FailIfExists)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownType);
}

#[test]
fn test_store_rejects_value_with_foreign_action_set() {
    let mut registry = TypeRegistry::new();
    registry.register::<Flag>().unwrap();
    let store = Store::with_registry(Arc::new(registry), StoreConfig::default());

    let err = store
        .insert_value("k", Box::new(Partial), actionkv::CreatePolicy::FailIfExists)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
    assert!(!store.contains_key("k"));

    // A value built by the store's own registry is accepted
    let genuine = store.registry().new_value("flag").unwrap();
    store
        .insert_value("k", genuine, actionkv::CreatePolicy::FailIfExists)
        .unwrap();
    assert_eq!(store.invoke("k", "toggle", &[]).unwrap(), Datum::Bool(true));
}
