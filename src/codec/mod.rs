//! Codec Module
//!
//! The encode/decode contract serialization adapters build on.
//!
//! ## Tag-then-Payload
//! A value is encoded as its type id plus a state snapshot. Decoding asks the
//! registry for a zero value of that type *first*, then applies the snapshot,
//! so a decoded value carries the correct action set from construction on.
//!
//! ## Adapters
//! - [`json`]: `{"type": <type id>, "value": <payload>}` per value
//! - [`binary`]: checksummed bincode frame holding a whole-store snapshot

pub mod binary;
pub mod json;

use serde::{Deserialize, Serialize};

use crate::datum::Datum;
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::value::Value;

/// A type tag paired with a state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoded {
    pub type_id: String,
    pub value: Datum,
}

impl Encoded {
    pub fn new(type_id: impl Into<String>, value: Datum) -> Self {
        Self {
            type_id: type_id.into(),
            value,
        }
    }
}

/// Capture a value's type tag and state
pub fn encode(value: &dyn Value) -> Encoded {
    Encoded {
        type_id: value.type_id().to_string(),
        value: value.snapshot(),
    }
}

/// Rebuild a value: construct through the registry, then restore the state
pub fn decode(registry: &TypeRegistry, encoded: Encoded) -> Result<Box<dyn Value>> {
    let mut value = registry.new_value(&encoded.type_id)?;
    value.restore(encoded.value)?;
    Ok(value)
}
