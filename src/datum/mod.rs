//! Datum Module
//!
//! The dynamically-typed unit passed into actions as arguments and returned
//! from them as results. Also used as the state snapshot handed to codecs.
//!
//! ## JSON Mapping
//! | Datum        | JSON                              |
//! |--------------|-----------------------------------|
//! | `Null`       | `null`                            |
//! | `Bool`       | `true` / `false`                  |
//! | `Int`        | integer number                    |
//! | `Float`      | non-integer number (NaN → `null`) |
//! | `Str`        | string                            |
//! | `List`       | array                             |
//! | `Map`        | object                            |

pub mod args;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Generic argument / result value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Datum {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Datum>),
    Map(BTreeMap<String, Datum>),
}

impl Datum {
    /// Short name of the variant, used in argument errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Bool(_) => "bool",
            Datum::Int(_) => "int",
            Datum::Float(_) => "float",
            Datum::Str(_) => "string",
            Datum::List(_) => "list",
            Datum::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Datum::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Datum::Float(f) => Some(*f),
            Datum::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Datum]> {
        match self {
            Datum::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Datum>> {
        match self {
            Datum::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert into the natural JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Datum::Null => Json::Null,
            Datum::Bool(b) => Json::Bool(*b),
            Datum::Int(i) => Json::from(*i),
            Datum::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Datum::Str(s) => Json::String(s.clone()),
            Datum::List(items) => Json::Array(items.iter().map(Datum::to_json).collect()),
            Datum::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Build a datum from JSON. Integers that fit in `i64` become `Int`.
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Datum::Null,
            Json::Bool(b) => Datum::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Datum::Int(i),
                None => Datum::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Datum::Str(s),
            Json::Array(items) => Datum::List(items.into_iter().map(Datum::from_json).collect()),
            Json::Object(map) => Datum::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Datum::from_json(v)))
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Bool(b)
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Datum::Int(i)
    }
}

impl From<i32> for Datum {
    fn from(i: i32) -> Self {
        Datum::Int(i64::from(i))
    }
}

impl From<usize> for Datum {
    fn from(n: usize) -> Self {
        Datum::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Datum {
    fn from(f: f64) -> Self {
        Datum::Float(f)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::Str(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::Str(s)
    }
}

impl<T: Into<Datum>> From<Vec<T>> for Datum {
    fn from(items: Vec<T>) -> Self {
        Datum::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Datum>> From<BTreeMap<String, T>> for Datum {
    fn from(map: BTreeMap<String, T>) -> Self {
        Datum::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Datum::Null)
    }
}
