//! JSON adapter
//!
//! ## Value Format
//! ```json
//! { "type": "list", "value": ["a", "b"] }
//! ```
//!
//! ## Store Format
//! ```json
//! {
//!     "key_1": { "type": "string", "value": "hello" },
//!     "key_2": { "type": "hash", "value": { "a": "b" } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Encoded;
use crate::datum::Datum;
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::store::{ImportOptions, Store};
use crate::value::Value;

/// Wire form of one tagged value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedJson {
    #[serde(rename = "type")]
    pub type_id: String,
    pub value: serde_json::Value,
}

impl From<Encoded> for TaggedJson {
    fn from(encoded: Encoded) -> Self {
        Self {
            type_id: encoded.type_id,
            value: encoded.value.to_json(),
        }
    }
}

impl From<TaggedJson> for Encoded {
    fn from(tagged: TaggedJson) -> Self {
        Encoded {
            type_id: tagged.type_id,
            value: Datum::from_json(tagged.value),
        }
    }
}

/// Wire form of a whole store
pub type StoreJson = BTreeMap<String, TaggedJson>;

/// Encode a single value as tagged JSON
pub fn encode_value(value: &dyn Value) -> Result<Vec<u8>> {
    let tagged = TaggedJson::from(super::encode(value));
    Ok(serde_json::to_vec(&tagged)?)
}

/// Decode a single tagged JSON value
pub fn decode_value(registry: &TypeRegistry, bytes: &[u8]) -> Result<Box<dyn Value>> {
    let tagged: TaggedJson = serde_json::from_slice(bytes)?;
    super::decode(registry, tagged.into())
}

impl Store {
    /// Export every key as a JSON object of tagged values
    pub fn export_json(&self) -> Result<Vec<u8>> {
        let out: StoreJson = self
            .export()
            .into_iter()
            .map(|(key, encoded)| (key, TaggedJson::from(encoded)))
            .collect();
        Ok(serde_json::to_vec(&out)?)
    }

    /// Export one key as a tagged JSON value
    pub fn export_key_json(&self, key: &str) -> Result<Vec<u8>> {
        let tagged = TaggedJson::from(self.export_key(key)?);
        Ok(serde_json::to_vec(&tagged)?)
    }

    /// Load one tagged JSON value into the existing key
    pub fn import_key_json(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let tagged: TaggedJson = serde_json::from_slice(bytes)?;
        self.import_key(key, tagged.into())
    }

    /// Import a JSON object of tagged values
    pub fn import_json(&self, bytes: &[u8], opts: ImportOptions) -> Result<()> {
        let parsed: StoreJson = serde_json::from_slice(bytes)?;
        let entries = parsed
            .into_iter()
            .map(|(key, tagged)| (key, Encoded::from(tagged)))
            .collect();
        self.import(entries, opts)
    }
}
