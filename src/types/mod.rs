//! Standard Value Types
//!
//! Built-in types registered through the same public contract as any
//! third-party type.
//!
//! | Type id  | State                                    |
//! |----------|------------------------------------------|
//! | `string` | `String`                                 |
//! | `int`    | `i64`                                    |
//! | `list`   | `Vec<String>`                            |
//! | `set`    | `BTreeSet<String>`                       |
//! | `hash`   | `BTreeMap<String, String>`               |
//! | `zset`   | strings ranked by `i64` score            |
//! | `zhash`  | string fields, each with a value and score |

mod hash;
mod int;
mod list;
mod ranked;
mod set;
mod string;
mod zhash;
mod zset;

pub use hash::HashValue;
pub use int::IntValue;
pub use list::ListValue;
pub use set::SetValue;
pub use string::StrValue;
pub use zhash::{ZhashItem, ZhashValue};
pub use zset::ZsetValue;

use crate::datum::Datum;
use crate::error::{KvError, Result};
use crate::registry::TypeRegistry;

/// Register every standard type
pub fn register_std(registry: &mut TypeRegistry) -> Result<()> {
    registry.register::<StrValue>()?;
    registry.register::<IntValue>()?;
    registry.register::<ListValue>()?;
    registry.register::<SetValue>()?;
    registry.register::<HashValue>()?;
    registry.register::<ZsetValue>()?;
    registry.register::<ZhashValue>()?;
    Ok(())
}

/// Snapshot error for a payload of the wrong shape
fn bad_snapshot(type_id: &str, expected: &str, got: &Datum) -> KvError {
    KvError::Codec(format!(
        "{} snapshot must be {}, got {}",
        type_id,
        expected,
        got.kind_name()
    ))
}

/// Read a list of strings out of a snapshot
fn snapshot_strings(type_id: &str, snapshot: Datum) -> Result<Vec<String>> {
    match snapshot {
        Datum::Null => Ok(Vec::new()),
        Datum::List(items) => items
            .into_iter()
            .map(|item| match item {
                Datum::Str(s) => Ok(s),
                other => Err(bad_snapshot(type_id, "a list of strings", &other)),
            })
            .collect(),
        other => Err(bad_snapshot(type_id, "a list of strings", &other)),
    }
}

fn strings(items: impl IntoIterator<Item = impl Into<String>>) -> Datum {
    Datum::List(items.into_iter().map(|s| Datum::Str(s.into())).collect())
}
