//! `zhash` value type

use std::collections::BTreeMap;

use super::ranked::Ranked;
use super::zset::{bump, missing_element};
use crate::datum::{args, Datum};
use crate::error::{ActionError, KvError, Result};
use crate::value::{ActionTable, ValueType};

type ActionResult = std::result::Result<Datum, ActionError>;

/// A hash whose fields are also ranked by integer score
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZhashValue {
    ranked: Ranked,
    values: BTreeMap<String, String>,
}

/// One field of a zhash as returned by `get`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZhashItem {
    pub value: String,
    pub score: i64,
}

impl ZhashItem {
    pub fn to_datum(&self) -> Datum {
        let mut map = BTreeMap::new();
        map.insert("value".to_string(), Datum::from(self.value.as_str()));
        map.insert("score".to_string(), Datum::Int(self.score));
        Datum::Map(map)
    }

    /// Parse the `{"value", "score"}` map produced by [`ZhashItem::to_datum`]
    pub fn from_datum(datum: &Datum) -> Option<Self> {
        let map = datum.as_map()?;
        Some(Self {
            value: map.get("value")?.as_str()?.to_string(),
            score: map.get("score")?.as_int()?,
        })
    }
}

impl ZhashValue {
    pub const TYPE: &'static str = "zhash";

    /// `insert(field)` or `insert(field, value)`; the field's score is reset
    /// to 0. Returns the field.
    pub const INSERT: &'static str = "insert";
    /// `set(field, value)` on an existing field, keeping its score.
    pub const SET: &'static str = "set";
    /// Removes every field given; fails without removing anything if one
    /// is missing.
    pub const REMOVE: &'static str = "remove";
    /// `increment(field, by)`; returns the new score.
    pub const INCREMENT: &'static str = "increment";
    pub const LEN: &'static str = "len";
    /// `{"value": .., "score": ..}` of one field.
    pub const GET: &'static str = "get";
    /// Field with the highest score, or null when empty.
    pub const PEEK_MAX: &'static str = "peekMax";
    /// Field with the lowest score, or null when empty.
    pub const PEEK_MIN: &'static str = "peekMin";

    /// Value and score of `field`, if present
    pub fn item(&self, field: &str) -> Option<ZhashItem> {
        Some(ZhashItem {
            value: self.values.get(field)?.clone(),
            score: self.ranked.score(field)?,
        })
    }

    fn put(&mut self, field: &str, value: &str, score: i64) {
        self.ranked.set_score(field, score);
        self.values.insert(field.to_string(), value.to_string());
    }

    fn insert(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INSERT, args, 1, 2)?;
        let field = args::str_at(Self::INSERT, args, 0)?;
        let value = match args.get(1) {
            Some(_) => args::str_at(Self::INSERT, args, 1)?,
            None => "",
        };
        self.put(field, value, 0);
        Ok(Datum::from(field))
    }

    fn set(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::SET, args, 2, 2)?;
        let field = args::str_at(Self::SET, args, 0)?;
        let value = args::str_at(Self::SET, args, 1)?;
        let score = self
            .ranked
            .score(field)
            .ok_or_else(|| missing_element(Self::SET, field))?;
        self.put(field, value, score);
        Ok(Datum::from(field))
    }

    fn remove(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::REMOVE, args, 1, usize::MAX)?;
        let fields = args::all_strs(Self::REMOVE, args)?;
        if let Some(missing) = fields.iter().find(|f| !self.ranked.contains(f)) {
            return Err(missing_element(Self::REMOVE, missing));
        }
        for field in &fields {
            self.ranked.remove(field);
            self.values.remove(field);
        }
        Ok(super::strings(fields))
    }

    fn increment(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INCREMENT, args, 2, 2)?;
        let field = args::str_at(Self::INCREMENT, args, 0)?;
        let by = args::int_at(Self::INCREMENT, args, 1)?;
        let score = bump(&mut self.ranked, Self::INCREMENT, field, by)?;
        Ok(Datum::Int(score))
    }

    fn len(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::LEN, args, 0, 0)?;
        Ok(Datum::from(self.ranked.len()))
    }

    fn get(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::GET, args, 1, 1)?;
        let field = args::str_at(Self::GET, args, 0)?;
        self.item(field)
            .map(|item| item.to_datum())
            .ok_or_else(|| missing_element(Self::GET, field))
    }

    fn peek_max(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::PEEK_MAX, args, 0, 0)?;
        Ok(Datum::from(self.ranked.max()))
    }

    fn peek_min(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::PEEK_MIN, args, 0, 0)?;
        Ok(Datum::from(self.ranked.min()))
    }
}

impl ValueType for ZhashValue {
    const TYPE_ID: &'static str = Self::TYPE;

    fn action_table() -> Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action(Self::INSERT, Self::insert)
            .action(Self::SET, Self::set)
            .action(Self::REMOVE, Self::remove)
            .action(Self::INCREMENT, Self::increment)
            .action(Self::LEN, Self::len)
            .action(Self::GET, Self::get)
            .action(Self::PEEK_MAX, Self::peek_max)
            .action(Self::PEEK_MIN, Self::peek_min)
            .build()
    }

    fn snapshot(&self) -> Datum {
        Datum::Map(
            self.ranked
                .iter()
                .map(|(field, score)| {
                    let item = ZhashItem {
                        value: self.values.get(field).cloned().unwrap_or_default(),
                        score,
                    };
                    (field.to_string(), item.to_datum())
                })
                .collect(),
        )
    }

    fn from_snapshot(snapshot: Datum) -> Result<Self> {
        let mut zhash = Self::default();
        match snapshot {
            Datum::Null => {}
            Datum::Map(map) => {
                for (field, entry) in map {
                    let item = ZhashItem::from_datum(&entry).ok_or_else(|| {
                        KvError::Codec(format!(
                            "zhash field {:?} must be {{\"value\": string, \"score\": int}}",
                            field
                        ))
                    })?;
                    zhash.put(&field, &item.value, item.score);
                }
            }
            other => return Err(super::bad_snapshot(Self::TYPE_ID, "a map", &other)),
        }
        Ok(zhash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> ActionTable<ZhashValue> {
        ZhashValue::action_table().unwrap()
    }

    #[test]
    fn test_insert_set_get() {
        let table = table();
        let mut v = ZhashValue::default();
        table.dispatch(&mut v, "insert", &["a".into(), "one".into()]).unwrap();
        table.dispatch(&mut v, "increment", &["a".into(), Datum::Int(4)]).unwrap();
        table.dispatch(&mut v, "set", &["a".into(), "uno".into()]).unwrap();

        let got = table.dispatch(&mut v, "get", &["a".into()]).unwrap();
        assert_eq!(got.to_json(), json!({"value": "uno", "score": 4}));
        assert_eq!(
            ZhashItem::from_datum(&got),
            Some(ZhashItem {
                value: "uno".into(),
                score: 4
            })
        );
    }

    #[test]
    fn test_set_requires_existing_field() {
        let table = table();
        let mut v = ZhashValue::default();
        let err = table
            .dispatch(&mut v, "set", &["a".into(), "x".into()])
            .unwrap_err();
        assert!(matches!(err, ActionError::Operation { .. }));
    }

    #[test]
    fn test_reinsert_resets_score() {
        let table = table();
        let mut v = ZhashValue::default();
        table.dispatch(&mut v, "insert", &["a".into()]).unwrap();
        table.dispatch(&mut v, "insert", &["b".into()]).unwrap();
        table.dispatch(&mut v, "increment", &["a".into(), Datum::Int(9)]).unwrap();
        assert_eq!(table.dispatch(&mut v, "peekMax", &[]).unwrap(), Datum::from("a"));

        table.dispatch(&mut v, "insert", &["a".into(), "again".into()]).unwrap();
        assert_eq!(v.item("a").unwrap().score, 0);
        assert_eq!(table.dispatch(&mut v, "peekMax", &[]).unwrap(), Datum::from("b"));
    }

    #[test]
    fn test_snapshot_shape() {
        let table = table();
        let mut v = ZhashValue::default();
        table.dispatch(&mut v, "insert", &["k".into(), "v".into()]).unwrap();
        table.dispatch(&mut v, "increment", &["k".into(), Datum::Int(2)]).unwrap();

        let snapshot = v.snapshot();
        assert_eq!(snapshot.to_json(), json!({"k": {"value": "v", "score": 2}}));
        assert_eq!(ZhashValue::from_snapshot(snapshot).unwrap(), v);

        let bad = Datum::from_json(json!({"k": {"value": 3}}));
        assert!(ZhashValue::from_snapshot(bad).is_err());
    }
}
