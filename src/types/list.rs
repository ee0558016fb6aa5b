//! `list` value type

use crate::datum::{args, Datum};
use crate::error::{ActionError, Result};
use crate::value::{ActionTable, ValueType};

type ActionResult = std::result::Result<Datum, ActionError>;

/// An ordered list of strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListValue(pub Vec<String>);

impl ListValue {
    pub const TYPE: &'static str = "list";

    /// `get()` returns the last element, `get(i)` the element at `i`.
    pub const GET: &'static str = "get";
    /// `set(s)` replaces the last element, `set(i, s)` the element at `i`.
    pub const SET: &'static str = "set";
    /// `slice()`, `slice(end)` or `slice(start, end)`, end exclusive.
    pub const SLICE: &'static str = "slice";
    pub const LEN: &'static str = "len";
    /// Appends every argument; returns the appended elements.
    pub const APPEND: &'static str = "append";
    /// `pop()` or `pop(n)`; removes and returns the last `n` elements.
    pub const POP: &'static str = "pop";
    /// `remove(s)` drops the first occurrence of `s`, `remove(i)` the element
    /// at `i`. Returns the removed element.
    pub const REMOVE: &'static str = "remove";
    /// Index of the first occurrence, or -1.
    pub const FIND: &'static str = "find";

    fn get(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::GET, args, 0, 1)?;
        let idx = match args.first() {
            Some(_) => args::index_at(Self::GET, args, 0)?,
            None => self.last_index(Self::GET)?,
        };
        self.check_index(Self::GET, idx)?;
        Ok(Datum::Str(self.0[idx].clone()))
    }

    fn set(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::SET, args, 1, 2)?;
        let (idx, new) = if args.len() == 1 {
            (self.last_index(Self::SET)?, args::str_at(Self::SET, args, 0)?)
        } else {
            (
                args::index_at(Self::SET, args, 0)?,
                args::str_at(Self::SET, args, 1)?,
            )
        };
        self.check_index(Self::SET, idx)?;
        self.0[idx] = new.to_string();
        Ok(Datum::from(new))
    }

    fn slice(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::SLICE, args, 0, 2)?;
        let (start, end) = match args.len() {
            0 => (0, self.0.len()),
            1 => (0, args::index_at(Self::SLICE, args, 0)?),
            _ => (
                args::index_at(Self::SLICE, args, 0)?,
                args::index_at(Self::SLICE, args, 1)?,
            ),
        };
        if start > end || end > self.0.len() {
            return Err(ActionError::operation(
                Self::SLICE,
                format!(
                    "range {}..{} out of bounds for list of length {}",
                    start,
                    end,
                    self.0.len()
                ),
            ));
        }
        Ok(super::strings(self.0[start..end].iter().cloned()))
    }

    fn len(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::LEN, args, 0, 0)?;
        Ok(Datum::from(self.0.len()))
    }

    fn append(&mut self, args: &[Datum]) -> ActionResult {
        let items = args::all_strs(Self::APPEND, args)?;
        self.0.extend(items.iter().cloned());
        Ok(super::strings(items))
    }

    fn pop(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::POP, args, 0, 1)?;
        let n = match args.first() {
            Some(_) => args::index_at(Self::POP, args, 0)?,
            None => 1,
        };
        if n > self.0.len() {
            return Err(ActionError::operation(
                Self::POP,
                format!("cannot pop {} from list of length {}", n, self.0.len()),
            ));
        }
        let removed = self.0.split_off(self.0.len() - n);
        Ok(super::strings(removed))
    }

    fn remove(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::REMOVE, args, 1, 1)?;
        match &args[0] {
            Datum::Str(target) => {
                if let Some(pos) = self.0.iter().position(|s| s == target) {
                    self.0.remove(pos);
                }
                Ok(Datum::Str(target.clone()))
            }
            _ => {
                let idx = args::index_at(Self::REMOVE, args, 0)?;
                self.check_index(Self::REMOVE, idx)?;
                Ok(Datum::Str(self.0.remove(idx)))
            }
        }
    }

    fn find(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::FIND, args, 1, 1)?;
        let target = args::str_at(Self::FIND, args, 0)?;
        let idx = self
            .0
            .iter()
            .position(|s| s == target)
            .map(|i| i as i64)
            .unwrap_or(-1);
        Ok(Datum::Int(idx))
    }

    fn last_index(&self, action: &str) -> std::result::Result<usize, ActionError> {
        self.0
            .len()
            .checked_sub(1)
            .ok_or_else(|| ActionError::operation(action, "list is empty"))
    }

    fn check_index(&self, action: &str, idx: usize) -> std::result::Result<(), ActionError> {
        if idx >= self.0.len() {
            return Err(ActionError::operation(
                action,
                format!("index {} out of bounds for list of length {}", idx, self.0.len()),
            ));
        }
        Ok(())
    }
}

impl ValueType for ListValue {
    const TYPE_ID: &'static str = Self::TYPE;

    fn action_table() -> Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action(Self::GET, Self::get)
            .action(Self::SET, Self::set)
            .action(Self::SLICE, Self::slice)
            .action(Self::LEN, Self::len)
            .action(Self::APPEND, Self::append)
            .action(Self::POP, Self::pop)
            .action(Self::REMOVE, Self::remove)
            .action(Self::FIND, Self::find)
            .build()
    }

    fn snapshot(&self) -> Datum {
        super::strings(self.0.iter().cloned())
    }

    fn from_snapshot(snapshot: Datum) -> Result<Self> {
        super::snapshot_strings(Self::TYPE_ID, snapshot).map(Self)
    }
}
