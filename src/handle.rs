//! Typed Handles
//!
//! Thin per-key views over [`Store::invoke`] for the standard types. A handle
//! names its action and converts the [`Datum`] result, so callers work with
//! `String`, `i64`, `Vec<String>` instead of matching on results.
//!
//! ```rust
//! use actionkv::Store;
//!
//! let store = Store::new();
//! store.create("todo", "list").unwrap();
//!
//! let todo = store.list("todo");
//! todo.guard().unwrap();
//! todo.append(&["write", "test"]).unwrap();
//! assert_eq!(todo.len().unwrap(), 2);
//! ```
//!
//! A handle does not pin the key: it may be deleted or replaced with a value
//! of another type between calls. [`Handle::guard`] checks the type at one
//! point in time.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::datum::Datum;
use crate::error::{KvError, Result};
use crate::store::Store;
use crate::types::{
    HashValue, IntValue, ListValue, SetValue, StrValue, ZhashItem, ZhashValue, ZsetValue,
};
use crate::value::ValueType;

/// A key of the store, expected to hold a `V`
pub struct Handle<'a, V: ValueType> {
    store: &'a Store,
    key: String,
    _type: PhantomData<fn() -> V>,
}

pub type StrHandle<'a> = Handle<'a, StrValue>;
pub type IntHandle<'a> = Handle<'a, IntValue>;
pub type ListHandle<'a> = Handle<'a, ListValue>;
pub type SetHandle<'a> = Handle<'a, SetValue>;
pub type HashHandle<'a> = Handle<'a, HashValue>;
pub type ZsetHandle<'a> = Handle<'a, ZsetValue>;
pub type ZhashHandle<'a> = Handle<'a, ZhashValue>;

impl Store {
    /// Typed view of `key` for any registered [`ValueType`]
    pub fn handle<V: ValueType>(&self, key: &str) -> Handle<'_, V> {
        Handle {
            store: self,
            key: key.to_string(),
            _type: PhantomData,
        }
    }

    pub fn string(&self, key: &str) -> StrHandle<'_> {
        self.handle(key)
    }

    pub fn int(&self, key: &str) -> IntHandle<'_> {
        self.handle(key)
    }

    pub fn list(&self, key: &str) -> ListHandle<'_> {
        self.handle(key)
    }

    pub fn set(&self, key: &str) -> SetHandle<'_> {
        self.handle(key)
    }

    pub fn hash(&self, key: &str) -> HashHandle<'_> {
        self.handle(key)
    }

    pub fn zset(&self, key: &str) -> ZsetHandle<'_> {
        self.handle(key)
    }

    pub fn zhash(&self, key: &str) -> ZhashHandle<'_> {
        self.handle(key)
    }
}

impl<'a, V: ValueType> Handle<'a, V> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Check the key exists and holds a `V`
    ///
    /// Fails with `KeyNotFound` or `TypeMismatch`.
    pub fn guard(&self) -> Result<()> {
        let found = self.store.type_of(&self.key)?;
        if found != V::TYPE_ID {
            return Err(KvError::TypeMismatch {
                key: self.key.clone(),
                expected: V::TYPE_ID.to_string(),
                found,
            });
        }
        Ok(())
    }

    /// Invoke an action by name, untyped
    pub fn invoke(&self, action: &str, args: &[Datum]) -> Result<Datum> {
        self.store.invoke(&self.key, action, args)
    }

    fn unexpected(&self, action: &str, expected: &str, got: &Datum) -> KvError {
        KvError::Invariant(format!(
            "{}.{} on {:?} returned {}, expected {}",
            V::TYPE_ID,
            action,
            self.key,
            got.kind_name(),
            expected
        ))
    }

    fn invoke_str(&self, action: &str, args: &[Datum]) -> Result<String> {
        match self.invoke(action, args)? {
            Datum::Str(s) => Ok(s),
            other => Err(self.unexpected(action, "string", &other)),
        }
    }

    fn invoke_int(&self, action: &str, args: &[Datum]) -> Result<i64> {
        match self.invoke(action, args)? {
            Datum::Int(n) => Ok(n),
            other => Err(self.unexpected(action, "int", &other)),
        }
    }

    fn invoke_len(&self, action: &str) -> Result<usize> {
        let n = self.invoke_int(action, &[])?;
        usize::try_from(n).map_err(|_| self.unexpected(action, "length", &Datum::Int(n)))
    }

    fn invoke_bool(&self, action: &str, args: &[Datum]) -> Result<bool> {
        match self.invoke(action, args)? {
            Datum::Bool(b) => Ok(b),
            other => Err(self.unexpected(action, "bool", &other)),
        }
    }

    fn invoke_strs(&self, action: &str, args: &[Datum]) -> Result<Vec<String>> {
        let result = self.invoke(action, args)?;
        let items = match &result {
            Datum::List(items) => items,
            other => return Err(self.unexpected(action, "list of strings", other)),
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.unexpected(action, "list of strings", &result))
            })
            .collect()
    }

    /// String result, or `None` for null
    fn invoke_opt_str(&self, action: &str) -> Result<Option<String>> {
        match self.invoke(action, &[])? {
            Datum::Null => Ok(None),
            Datum::Str(s) => Ok(Some(s)),
            other => Err(self.unexpected(action, "string or null", &other)),
        }
    }

    /// Invoke a variadic action; a no-op without elements
    fn invoke_each(&self, action: &str, elements: &[&str]) -> Result<()> {
        if elements.is_empty() {
            return Ok(());
        }
        self.invoke(action, &strs(elements))?;
        Ok(())
    }
}

fn strs(items: &[&str]) -> Vec<Datum> {
    items.iter().map(|s| Datum::from(*s)).collect()
}

fn index(i: usize) -> Datum {
    Datum::Int(i as i64)
}

// =============================================================================
// Standard Types
// =============================================================================

impl StrHandle<'_> {
    pub fn get(&self) -> Result<String> {
        self.invoke_str(StrValue::GET, &[])
    }

    pub fn set(&self, value: &str) -> Result<()> {
        self.invoke(StrValue::SET, &[value.into()])?;
        Ok(())
    }

    /// Append every part; returns the new string
    pub fn append(&self, parts: &[&str]) -> Result<String> {
        if parts.is_empty() {
            return self.get();
        }
        self.invoke_str(StrValue::APPEND, &strs(parts))
    }

    pub fn len(&self) -> Result<usize> {
        self.invoke_len(StrValue::LEN)
    }

    /// Empty the string; returns the old value
    pub fn clear(&self) -> Result<String> {
        self.invoke_str(StrValue::CLEAR, &[])
    }
}

impl IntHandle<'_> {
    pub fn get(&self) -> Result<i64> {
        self.invoke_int(IntValue::GET, &[])
    }

    pub fn set(&self, value: i64) -> Result<()> {
        self.invoke(IntValue::SET, &[Datum::Int(value)])?;
        Ok(())
    }

    pub fn increment(&self) -> Result<i64> {
        self.invoke_int(IntValue::INCREMENT, &[])
    }

    pub fn decrement(&self) -> Result<i64> {
        self.invoke_int(IntValue::DECREMENT, &[])
    }

    pub fn increment_by(&self, delta: i64) -> Result<i64> {
        self.invoke_int(IntValue::INCREMENT_BY, &[Datum::Int(delta)])
    }

    pub fn decrement_by(&self, delta: i64) -> Result<i64> {
        self.invoke_int(IntValue::DECREMENT_BY, &[Datum::Int(delta)])
    }
}

impl ListHandle<'_> {
    pub fn get(&self, idx: usize) -> Result<String> {
        self.invoke_str(ListValue::GET, &[index(idx)])
    }

    pub fn last(&self) -> Result<String> {
        self.invoke_str(ListValue::GET, &[])
    }

    pub fn set(&self, idx: usize, value: &str) -> Result<()> {
        self.invoke(ListValue::SET, &[index(idx), value.into()])?;
        Ok(())
    }

    /// Elements in `start..end`
    pub fn slice(&self, start: usize, end: usize) -> Result<Vec<String>> {
        self.invoke_strs(ListValue::SLICE, &[index(start), index(end)])
    }

    pub fn all(&self) -> Result<Vec<String>> {
        self.invoke_strs(ListValue::SLICE, &[])
    }

    pub fn len(&self) -> Result<usize> {
        self.invoke_len(ListValue::LEN)
    }

    pub fn append(&self, items: &[&str]) -> Result<()> {
        self.invoke_each(ListValue::APPEND, items)
    }

    /// Remove and return the last `n` elements
    pub fn pop(&self, n: usize) -> Result<Vec<String>> {
        self.invoke_strs(ListValue::POP, &[index(n)])
    }

    /// Remove the first occurrence of `item`, if any
    pub fn remove(&self, item: &str) -> Result<()> {
        self.invoke(ListValue::REMOVE, &[item.into()])?;
        Ok(())
    }

    /// Remove and return the element at `idx`
    pub fn remove_at(&self, idx: usize) -> Result<String> {
        self.invoke_str(ListValue::REMOVE, &[index(idx)])
    }

    pub fn find(&self, item: &str) -> Result<Option<usize>> {
        let pos = self.invoke_int(ListValue::FIND, &[item.into()])?;
        Ok(usize::try_from(pos).ok())
    }
}

impl SetHandle<'_> {
    pub fn insert(&self, items: &[&str]) -> Result<()> {
        self.invoke_each(SetValue::INSERT, items)
    }

    pub fn remove(&self, items: &[&str]) -> Result<()> {
        self.invoke_each(SetValue::REMOVE, items)
    }

    pub fn has(&self, item: &str) -> Result<bool> {
        self.invoke_bool(SetValue::HAS, &[item.into()])
    }

    pub fn len(&self) -> Result<usize> {
        self.invoke_len(SetValue::LEN)
    }

    /// All members, sorted
    pub fn members(&self) -> Result<Vec<String>> {
        self.invoke_strs(SetValue::GET, &[])
    }
}

impl HashHandle<'_> {
    pub fn insert(&self, field: &str, value: &str) -> Result<()> {
        self.invoke(HashValue::INSERT, &[field.into(), value.into()])?;
        Ok(())
    }

    pub fn remove(&self, fields: &[&str]) -> Result<()> {
        self.invoke_each(HashValue::REMOVE, fields)
    }

    pub fn has(&self, field: &str) -> Result<bool> {
        self.invoke_bool(HashValue::HAS, &[field.into()])
    }

    pub fn len(&self) -> Result<usize> {
        self.invoke_len(HashValue::LEN)
    }

    /// Value of `field`; `""` when absent
    pub fn get(&self, field: &str) -> Result<String> {
        let mut values = self.invoke_strs(HashValue::GET, &[field.into()])?;
        values
            .pop()
            .ok_or_else(|| self.unexpected(HashValue::GET, "one value", &Datum::List(Vec::new())))
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        self.invoke_strs(HashValue::KEYS, &[])
    }

    pub fn map(&self) -> Result<BTreeMap<String, String>> {
        let result = self.invoke(HashValue::MAP, &[])?;
        let map = match &result {
            Datum::Map(map) => map,
            other => return Err(self.unexpected(HashValue::MAP, "map of strings", other)),
        };
        map.iter()
            .map(|(field, value)| match value.as_str() {
                Some(s) => Ok((field.clone(), s.to_string())),
                None => Err(self.unexpected(HashValue::MAP, "map of strings", &result)),
            })
            .collect()
    }
}

impl ZsetHandle<'_> {
    pub fn insert(&self, elements: &[&str]) -> Result<()> {
        self.invoke_each(ZsetValue::INSERT, elements)
    }

    pub fn remove(&self, elements: &[&str]) -> Result<()> {
        self.invoke_each(ZsetValue::REMOVE, elements)
    }

    /// Add `by` to an element's score; returns the new score
    pub fn increment(&self, element: &str, by: i64) -> Result<i64> {
        self.invoke_int(ZsetValue::INCREMENT, &[element.into(), Datum::Int(by)])
    }

    pub fn score(&self, element: &str) -> Result<i64> {
        self.invoke_int(ZsetValue::GET, &[element.into()])
    }

    pub fn len(&self) -> Result<usize> {
        self.invoke_len(ZsetValue::LEN)
    }

    pub fn peek_max(&self) -> Result<Option<String>> {
        self.invoke_opt_str(ZsetValue::PEEK_MAX)
    }

    pub fn peek_min(&self) -> Result<Option<String>> {
        self.invoke_opt_str(ZsetValue::PEEK_MIN)
    }
}

impl ZhashHandle<'_> {
    /// Insert or reset a field with score 0
    pub fn insert(&self, field: &str, value: &str) -> Result<()> {
        self.invoke(ZhashValue::INSERT, &[field.into(), value.into()])?;
        Ok(())
    }

    /// Update an existing field's value, keeping its score
    pub fn set(&self, field: &str, value: &str) -> Result<()> {
        self.invoke(ZhashValue::SET, &[field.into(), value.into()])?;
        Ok(())
    }

    pub fn remove(&self, fields: &[&str]) -> Result<()> {
        self.invoke_each(ZhashValue::REMOVE, fields)
    }

    pub fn increment(&self, field: &str, by: i64) -> Result<i64> {
        self.invoke_int(ZhashValue::INCREMENT, &[field.into(), Datum::Int(by)])
    }

    pub fn get(&self, field: &str) -> Result<ZhashItem> {
        let result = self.invoke(ZhashValue::GET, &[field.into()])?;
        ZhashItem::from_datum(&result)
            .ok_or_else(|| self.unexpected(ZhashValue::GET, "value and score", &result))
    }

    pub fn len(&self) -> Result<usize> {
        self.invoke_len(ZhashValue::LEN)
    }

    pub fn peek_max(&self) -> Result<Option<String>> {
        self.invoke_opt_str(ZhashValue::PEEK_MAX)
    }

    pub fn peek_min(&self) -> Result<Option<String>> {
        self.invoke_opt_str(ZhashValue::PEEK_MIN)
    }
}
