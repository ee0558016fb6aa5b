//! Value Module
//!
//! The value abstraction every store entry implements, and the per-type action
//! table that drives dispatch.
//!
//! ## Two Layers
//! - [`ValueType`]: implemented by concrete state types (`String`, `Vec<String>`,
//!   ...). Declares a type id, an action table, and a snapshot format.
//! - [`Value`]: the object-safe capability the store holds as
//!   `Box<dyn Value>`. [`Bound`] adapts any `ValueType` into a `Value` by pairing
//!   its state with the type's shared action table.
//!
//! ## Dispatch
//! ```text
//! Store::invoke(key, "append", args)
//!   └─► key lock
//!        └─► Value::invoke("append", args)
//!             └─► ActionTable::lookup("append") ─► fn(&mut state, args)
//! ```
//!
//! Actions receive only `&mut` access to their own state, so they cannot reach
//! other keys or the store.

mod action;
mod bound;

pub use action::{ActionFn, ActionTable, ActionTableBuilder};
pub use bound::Bound;

use crate::datum::Datum;
use crate::error::{ActionError, Result};

/// A typed unit of state stored under a key
pub trait Value: Send + Sync {
    /// Stable type identifier, used for registry lookup and serialization
    fn type_id(&self) -> &str;

    /// Run the named action against this value
    fn invoke(&mut self, action: &str, args: &[Datum]) -> std::result::Result<Datum, ActionError>;

    /// Names of all supported actions, sorted
    fn actions(&self) -> Vec<&str>;

    /// Snapshot sufficient to reconstruct the internal state
    fn snapshot(&self) -> Datum;

    /// Replace the internal state from a snapshot
    fn restore(&mut self, snapshot: Datum) -> Result<()>;
}

/// A concrete state type that can be registered with the type registry
///
/// The zero value is `Default::default()`.
pub trait ValueType: Default + Send + Sync + 'static {
    /// Type identifier, stable across versions
    const TYPE_ID: &'static str;

    /// Build the action table. Called once at registration.
    fn action_table() -> Result<ActionTable<Self>>;

    fn snapshot(&self) -> Datum;

    /// Rebuild state from a snapshot produced by [`ValueType::snapshot`]
    fn from_snapshot(snapshot: Datum) -> Result<Self>;
}
