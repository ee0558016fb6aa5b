//! `hash` value type

use std::collections::BTreeMap;

use crate::datum::{args, Datum};
use crate::error::{ActionError, KvError, Result};
use crate::value::{ActionTable, ValueType};

type ActionResult = std::result::Result<Datum, ActionError>;

/// A map from string fields to string values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashValue(pub BTreeMap<String, String>);

impl HashValue {
    pub const TYPE: &'static str = "hash";

    /// `insert(field, value)`; returns the field.
    pub const INSERT: &'static str = "insert";
    /// Removes every field given; returns them.
    pub const REMOVE: &'static str = "remove";
    pub const HAS: &'static str = "has";
    pub const LEN: &'static str = "len";
    /// Values of every field given, in order. Missing fields yield `""`.
    pub const GET: &'static str = "get";
    /// All fields, sorted.
    pub const KEYS: &'static str = "keys";
    /// A copy of the whole map.
    pub const MAP: &'static str = "map";

    fn insert(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INSERT, args, 2, 2)?;
        let field = args::str_at(Self::INSERT, args, 0)?;
        let value = args::str_at(Self::INSERT, args, 1)?;
        self.0.insert(field.to_string(), value.to_string());
        Ok(Datum::from(field))
    }

    fn remove(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::REMOVE, args, 1, usize::MAX)?;
        let fields = args::all_strs(Self::REMOVE, args)?;
        for field in &fields {
            self.0.remove(field);
        }
        Ok(super::strings(fields))
    }

    fn has(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::HAS, args, 1, 1)?;
        let field = args::str_at(Self::HAS, args, 0)?;
        Ok(Datum::Bool(self.0.contains_key(field)))
    }

    fn len(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::LEN, args, 0, 0)?;
        Ok(Datum::from(self.0.len()))
    }

    fn get(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::GET, args, 1, usize::MAX)?;
        let fields = args::all_strs(Self::GET, args)?;
        Ok(super::strings(
            fields
                .iter()
                .map(|f| self.0.get(f).cloned().unwrap_or_default()),
        ))
    }

    fn keys(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::KEYS, args, 0, 0)?;
        Ok(super::strings(self.0.keys().cloned()))
    }

    fn map(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::MAP, args, 0, 0)?;
        Ok(self.snapshot())
    }
}

impl ValueType for HashValue {
    const TYPE_ID: &'static str = Self::TYPE;

    fn action_table() -> Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action(Self::INSERT, Self::insert)
            .action(Self::REMOVE, Self::remove)
            .action(Self::HAS, Self::has)
            .action(Self::LEN, Self::len)
            .action(Self::GET, Self::get)
            .action(Self::KEYS, Self::keys)
            .action(Self::MAP, Self::map)
            .build()
    }

    fn snapshot(&self) -> Datum {
        Datum::from(self.0.clone())
    }

    fn from_snapshot(snapshot: Datum) -> Result<Self> {
        match snapshot {
            Datum::Null => Ok(Self::default()),
            Datum::Map(map) => map
                .into_iter()
                .map(|(field, value)| match value {
                    Datum::Str(s) => Ok((field, s)),
                    other => Err(KvError::Codec(format!(
                        "hash field {:?} must be a string, got {}",
                        field,
                        other.kind_name()
                    ))),
                })
                .collect::<Result<BTreeMap<_, _>>>()
                .map(Self),
            other => Err(super::bad_snapshot(Self::TYPE_ID, "a map", &other)),
        }
    }
}
