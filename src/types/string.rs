//! `string` value type

use crate::datum::{args, Datum};
use crate::error::{ActionError, Result};
use crate::value::{ActionTable, ValueType};

type ActionResult = std::result::Result<Datum, ActionError>;

/// A UTF-8 string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrValue(pub String);

impl StrValue {
    pub const TYPE: &'static str = "string";

    /// Returns the string.
    pub const GET: &'static str = "get";
    /// Replaces the string; returns the new string.
    pub const SET: &'static str = "set";
    /// Appends every argument in order; returns the new string.
    pub const APPEND: &'static str = "append";
    /// Returns the length in bytes.
    pub const LEN: &'static str = "len";
    /// Empties the string; returns the old string.
    pub const CLEAR: &'static str = "clear";

    fn get(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::GET, args, 0, 0)?;
        Ok(Datum::Str(self.0.clone()))
    }

    fn set(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::SET, args, 1, 1)?;
        self.0 = args::str_at(Self::SET, args, 0)?.to_string();
        Ok(Datum::Str(self.0.clone()))
    }

    fn append(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::APPEND, args, 1, usize::MAX)?;
        // Validate everything before mutating
        let parts = args::all_strs(Self::APPEND, args)?;
        for part in parts {
            self.0.push_str(&part);
        }
        Ok(Datum::Str(self.0.clone()))
    }

    fn len(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::LEN, args, 0, 0)?;
        Ok(Datum::from(self.0.len()))
    }

    fn clear(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::CLEAR, args, 0, 0)?;
        Ok(Datum::Str(std::mem::take(&mut self.0)))
    }
}

impl ValueType for StrValue {
    const TYPE_ID: &'static str = Self::TYPE;

    fn action_table() -> Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action(Self::GET, Self::get)
            .action(Self::SET, Self::set)
            .action(Self::APPEND, Self::append)
            .action(Self::LEN, Self::len)
            .action(Self::CLEAR, Self::clear)
            .build()
    }

    fn snapshot(&self) -> Datum {
        Datum::Str(self.0.clone())
    }

    fn from_snapshot(snapshot: Datum) -> Result<Self> {
        match snapshot {
            Datum::Null => Ok(Self::default()),
            Datum::Str(s) => Ok(Self(s)),
            other => Err(super::bad_snapshot(Self::TYPE_ID, "a string", &other)),
        }
    }
}
