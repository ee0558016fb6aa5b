//! Tests for typed handles
//!
//! These tests verify:
//! - `guard` reports missing keys and type mismatches
//! - Each standard type's handle converts action results
//! - Sorted types rank by score

use std::collections::BTreeMap;
use std::sync::Arc;

use actionkv::types::{ZhashItem, ZsetValue};
use actionkv::{ErrorKind, Store, StoreConfig, TypeRegistry};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> Store {
    let registry = Arc::new(TypeRegistry::with_std_types().unwrap());
    Store::with_registry(registry, StoreConfig::default())
}

// =============================================================================
// Guard Tests
// =============================================================================

#[test]
fn test_guard_checks_presence_and_type() {
    let store = setup_store();
    assert_eq!(
        store.list("todo").guard().unwrap_err().kind(),
        ErrorKind::KeyNotFound
    );

    store.create("todo", "set").unwrap();
    assert_eq!(
        store.list("todo").guard().unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
    store.set("todo").guard().unwrap();

    store.create_or_replace("todo", "list").unwrap();
    store.list("todo").guard().unwrap();
    assert_eq!(store.list("todo").key(), "todo");
}

#[test]
fn test_handle_on_wrong_type_fails_cleanly() {
    let store = setup_store();
    store.create("n", "int").unwrap();

    // `len` is not an int action
    let err = store.string("n").len().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAction);

    // `get` exists on both, but the result is not a string
    let err = store.string("n").get().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[test]
fn test_generic_handle() {
    let store = setup_store();
    store.create("z", "zset").unwrap();

    let z = store.handle::<ZsetValue>("z");
    z.guard().unwrap();
    z.insert(&["a"]).unwrap();
    assert_eq!(z.len().unwrap(), 1);
}

// =============================================================================
// Standard Type Handles
// =============================================================================

#[test]
fn test_string_handle() {
    let store = setup_store();
    store.create("s", "string").unwrap();
    let s = store.string("s");

    s.set("ab").unwrap();
    assert_eq!(s.append(&["c", "d"]).unwrap(), "abcd");
    assert_eq!(s.append(&[]).unwrap(), "abcd");
    assert_eq!(s.len().unwrap(), 4);
    assert_eq!(s.clear().unwrap(), "abcd");
    assert_eq!(s.get().unwrap(), "");
}

#[test]
fn test_int_handle() {
    let store = setup_store();
    store.create("n", "int").unwrap();
    let n = store.int("n");

    assert_eq!(n.increment().unwrap(), 1);
    assert_eq!(n.increment_by(10).unwrap(), 11);
    assert_eq!(n.decrement_by(5).unwrap(), 6);
    assert_eq!(n.decrement().unwrap(), 5);

    n.set(i64::MAX).unwrap();
    assert_eq!(n.increment().unwrap_err().kind(), ErrorKind::Operation);
    assert_eq!(n.get().unwrap(), i64::MAX);
}

#[test]
fn test_list_handle() {
    let store = setup_store();
    store.create("l", "list").unwrap();
    let l = store.list("l");

    l.append(&["a", "b", "c", "d"]).unwrap();
    assert_eq!(l.get(1).unwrap(), "b");
    assert_eq!(l.last().unwrap(), "d");
    assert_eq!(l.slice(1, 3).unwrap(), vec!["b", "c"]);

    l.set(0, "z").unwrap();
    assert_eq!(l.find("z").unwrap(), Some(0));
    assert_eq!(l.find("nope").unwrap(), None);

    assert_eq!(l.pop(2).unwrap(), vec!["c", "d"]);
    l.remove("z").unwrap();
    assert_eq!(l.remove_at(0).unwrap(), "b");
    assert_eq!(l.len().unwrap(), 0);
    assert!(l.all().unwrap().is_empty());
}

#[test]
fn test_set_handle() {
    let store = setup_store();
    store.create("t", "set").unwrap();
    let t = store.set("t");

    t.insert(&["b", "a", "b"]).unwrap();
    assert!(t.has("a").unwrap());
    assert_eq!(t.members().unwrap(), vec!["a", "b"]);

    t.remove(&["a"]).unwrap();
    assert!(!t.has("a").unwrap());
    assert_eq!(t.len().unwrap(), 1);
}

#[test]
fn test_hash_handle() {
    let store = setup_store();
    store.create("h", "hash").unwrap();
    let h = store.hash("h");

    h.insert("name", "ada").unwrap();
    h.insert("lang", "rust").unwrap();
    assert_eq!(h.get("name").unwrap(), "ada");
    assert_eq!(h.get("missing").unwrap(), "");
    assert_eq!(h.keys().unwrap(), vec!["lang", "name"]);

    h.remove(&["lang"]).unwrap();
    let mut expected = BTreeMap::new();
    expected.insert("name".to_string(), "ada".to_string());
    assert_eq!(h.map().unwrap(), expected);
    assert!(!h.has("lang").unwrap());
    assert_eq!(h.len().unwrap(), 1);
}

// =============================================================================
// Sorted Type Handles
// =============================================================================

#[test]
fn test_zset_handle() {
    let store = setup_store();
    store.create("board", "zset").unwrap();
    let board = store.zset("board");

    assert_eq!(board.peek_max().unwrap(), None);

    board.insert(&["ada", "bob", "cy"]).unwrap();
    assert_eq!(board.increment("bob", 7).unwrap(), 7);
    assert_eq!(board.increment("cy", -1).unwrap(), -1);

    assert_eq!(board.peek_max().unwrap().as_deref(), Some("bob"));
    assert_eq!(board.peek_min().unwrap().as_deref(), Some("cy"));
    assert_eq!(board.score("ada").unwrap(), 0);

    assert_eq!(
        board.remove(&["ada", "ghost"]).unwrap_err().kind(),
        ErrorKind::Operation
    );
    assert_eq!(board.len().unwrap(), 3);

    board.remove(&["bob"]).unwrap();
    assert_eq!(board.peek_max().unwrap().as_deref(), Some("ada"));
}

#[test]
fn test_zhash_handle() {
    let store = setup_store();
    store.create("jobs", "zhash").unwrap();
    let jobs = store.zhash("jobs");

    jobs.insert("build", "cargo build").unwrap();
    jobs.insert("test", "cargo test").unwrap();
    jobs.increment("test", 3).unwrap();
    jobs.set("build", "cargo build --release").unwrap();

    assert_eq!(
        jobs.get("build").unwrap(),
        ZhashItem {
            value: "cargo build --release".into(),
            score: 0
        }
    );
    assert_eq!(jobs.peek_max().unwrap().as_deref(), Some("test"));
    assert_eq!(jobs.peek_min().unwrap().as_deref(), Some("build"));

    assert_eq!(
        jobs.set("deploy", "x").unwrap_err().kind(),
        ErrorKind::Operation
    );
    jobs.remove(&["build"]).unwrap();
    assert_eq!(jobs.len().unwrap(), 1);
}
