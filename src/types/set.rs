//! `set` value type

use std::collections::BTreeSet;

use crate::datum::{args, Datum};
use crate::error::{ActionError, Result};
use crate::value::{ActionTable, ValueType};

type ActionResult = std::result::Result<Datum, ActionError>;

/// A set of unique strings, kept sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetValue(pub BTreeSet<String>);

impl SetValue {
    pub const TYPE: &'static str = "set";

    pub const INSERT: &'static str = "insert";
    pub const REMOVE: &'static str = "remove";
    pub const HAS: &'static str = "has";
    pub const LEN: &'static str = "len";
    /// Returns all elements, sorted.
    pub const GET: &'static str = "get";

    fn insert(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INSERT, args, 1, usize::MAX)?;
        let items = args::all_strs(Self::INSERT, args)?;
        self.0.extend(items.iter().cloned());
        Ok(super::strings(items))
    }

    fn remove(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::REMOVE, args, 1, usize::MAX)?;
        let items = args::all_strs(Self::REMOVE, args)?;
        for item in &items {
            self.0.remove(item);
        }
        Ok(super::strings(items))
    }

    fn has(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::HAS, args, 1, 1)?;
        let item = args::str_at(Self::HAS, args, 0)?;
        Ok(Datum::Bool(self.0.contains(item)))
    }

    fn len(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::LEN, args, 0, 0)?;
        Ok(Datum::from(self.0.len()))
    }

    fn get(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::GET, args, 0, 0)?;
        Ok(super::strings(self.0.iter().cloned()))
    }
}

impl ValueType for SetValue {
    const TYPE_ID: &'static str = Self::TYPE;

    fn action_table() -> Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action(Self::INSERT, Self::insert)
            .action(Self::REMOVE, Self::remove)
            .action(Self::HAS, Self::has)
            .action(Self::LEN, Self::len)
            .action(Self::GET, Self::get)
            .build()
    }

    fn snapshot(&self) -> Datum {
        super::strings(self.0.iter().cloned())
    }

    fn from_snapshot(snapshot: Datum) -> Result<Self> {
        let items = super::snapshot_strings(Self::TYPE_ID, snapshot)?;
        Ok(Self(items.into_iter().collect()))
    }
}
