//! # ActionKV
//!
//! An embeddable, in-memory key-value store whose values are typed objects
//! driven by named actions:
//! - Values expose a fixed, per-type set of actions (`append`, `incrementBy`, ...)
//! - New value types plug in through a type registry
//! - Per-key locking: unrelated keys never contend
//! - Tagged JSON and checksummed binary snapshots
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Embedding Application                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ create / delete / invoke / keys
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store                                 │
//! │          RwLock<key map>  +  Mutex per key                   │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │ new_value(type_id)           │ invoke(action, args)
//!            ▼                              ▼
//!   ┌─────────────────┐            ┌─────────────────┐
//!   │  TypeRegistry   │───builds──►│  Value + shared │
//!   │ (frozen, global)│            │   ActionTable   │
//!   └────────┬────────┘            └─────────────────┘
//!            │ decode(type tag, snapshot)
//!   ┌────────▼────────┐
//!   │  Codec (JSON,   │
//!   │     binary)     │
//!   └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use actionkv::{Datum, Store};
//!
//! let store = Store::new();
//! store.create("greeting", "string").unwrap();
//! store.invoke("greeting", "append", &["hi".into()]).unwrap();
//!
//! let value = store.invoke("greeting", "get", &[]).unwrap();
//! assert_eq!(value, Datum::from("hi"));
//!
//! // Or through a typed handle
//! assert_eq!(store.string("greeting").get().unwrap(), "hi");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod datum;
pub mod value;
pub mod registry;
pub mod store;
pub mod handle;
pub mod codec;
pub mod types;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ActionError, ErrorKind, KvError, Result};
pub use config::StoreConfig;
pub use datum::Datum;
pub use value::{ActionTable, Bound, Value, ValueType};
pub use registry::TypeRegistry;
pub use store::{CreatePolicy, ImportOptions, Schema, Store};
pub use handle::Handle;
pub use codec::Encoded;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ActionKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
