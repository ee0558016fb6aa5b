//! `zset` value type

use std::collections::BTreeMap;

use super::ranked::Ranked;
use crate::datum::{args, Datum};
use crate::error::{ActionError, KvError, Result};
use crate::value::{ActionTable, ValueType};

type ActionResult = std::result::Result<Datum, ActionError>;

/// A set of strings ranked by integer score
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZsetValue(Ranked);

impl ZsetValue {
    pub const TYPE: &'static str = "zset";

    /// Adds every element with score 0, resetting the score of elements
    /// already present. Returns the elements.
    pub const INSERT: &'static str = "insert";
    /// Removes every element given; fails without removing anything if one
    /// is missing.
    pub const REMOVE: &'static str = "remove";
    /// `increment(element, by)`; returns the new score.
    pub const INCREMENT: &'static str = "increment";
    pub const LEN: &'static str = "len";
    /// Score of one element.
    pub const GET: &'static str = "get";
    /// Element with the highest score, or null when empty.
    pub const PEEK_MAX: &'static str = "peekMax";
    /// Element with the lowest score, or null when empty.
    pub const PEEK_MIN: &'static str = "peekMin";

    /// Score of `element`, if present
    pub fn score(&self, element: &str) -> Option<i64> {
        self.0.score(element)
    }

    fn insert(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INSERT, args, 1, usize::MAX)?;
        let elements = args::all_strs(Self::INSERT, args)?;
        for element in &elements {
            self.0.set_score(element, 0);
        }
        Ok(super::strings(elements))
    }

    fn remove(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::REMOVE, args, 1, usize::MAX)?;
        let elements = args::all_strs(Self::REMOVE, args)?;
        if let Some(missing) = elements.iter().find(|e| !self.0.contains(e)) {
            return Err(missing_element(Self::REMOVE, missing));
        }
        for element in &elements {
            self.0.remove(element);
        }
        Ok(super::strings(elements))
    }

    fn increment(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INCREMENT, args, 2, 2)?;
        let element = args::str_at(Self::INCREMENT, args, 0)?;
        let by = args::int_at(Self::INCREMENT, args, 1)?;
        let score = bump(&mut self.0, Self::INCREMENT, element, by)?;
        Ok(Datum::Int(score))
    }

    fn len(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::LEN, args, 0, 0)?;
        Ok(Datum::from(self.0.len()))
    }

    fn get(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::GET, args, 1, 1)?;
        let element = args::str_at(Self::GET, args, 0)?;
        self.0
            .score(element)
            .map(Datum::Int)
            .ok_or_else(|| missing_element(Self::GET, element))
    }

    fn peek_max(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::PEEK_MAX, args, 0, 0)?;
        Ok(Datum::from(self.0.max()))
    }

    fn peek_min(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::PEEK_MIN, args, 0, 0)?;
        Ok(Datum::from(self.0.min()))
    }
}

/// Add `by` to the score of an existing element
pub(super) fn bump(
    ranked: &mut Ranked,
    action: &str,
    element: &str,
    by: i64,
) -> std::result::Result<i64, ActionError> {
    let current = ranked
        .score(element)
        .ok_or_else(|| missing_element(action, element))?;
    let score = current.checked_add(by).ok_or_else(|| {
        ActionError::operation(action, format!("{} + {} overflows", current, by))
    })?;
    ranked.set_score(element, score);
    Ok(score)
}

pub(super) fn missing_element(action: &str, element: &str) -> ActionError {
    ActionError::operation(action, format!("no element {:?}", element))
}

impl ValueType for ZsetValue {
    const TYPE_ID: &'static str = Self::TYPE;

    fn action_table() -> Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action(Self::INSERT, Self::insert)
            .action(Self::REMOVE, Self::remove)
            .action(Self::INCREMENT, Self::increment)
            .action(Self::LEN, Self::len)
            .action(Self::GET, Self::get)
            .action(Self::PEEK_MAX, Self::peek_max)
            .action(Self::PEEK_MIN, Self::peek_min)
            .build()
    }

    fn snapshot(&self) -> Datum {
        let scores: BTreeMap<String, i64> = self
            .0
            .iter()
            .map(|(element, score)| (element.to_string(), score))
            .collect();
        Datum::from(scores)
    }

    fn from_snapshot(snapshot: Datum) -> Result<Self> {
        let mut ranked = Ranked::default();
        match snapshot {
            Datum::Null => {}
            Datum::Map(map) => {
                for (element, score) in map {
                    let score = score.as_int().ok_or_else(|| {
                        KvError::Codec(format!(
                            "zset score of {:?} must be an int, got {}",
                            element,
                            score.kind_name()
                        ))
                    })?;
                    ranked.set_score(&element, score);
                }
            }
            other => return Err(super::bad_snapshot(Self::TYPE_ID, "a map", &other)),
        }
        Ok(Self(ranked))
    }
}
