//! Adapter from a concrete [`ValueType`] to the object-safe [`Value`]

use std::fmt;
use std::sync::Arc;

use super::{ActionTable, Value, ValueType};
use crate::datum::Datum;
use crate::error::{ActionError, Result};

/// State of type `V` bound to the action table shared by every `V` instance
pub struct Bound<V: ValueType> {
    state: V,
    table: Arc<ActionTable<V>>,
}

impl<V: ValueType> Bound<V> {
    /// Zero value bound to `table`
    pub fn new(table: Arc<ActionTable<V>>) -> Self {
        Self {
            state: V::default(),
            table,
        }
    }

    pub fn state(&self) -> &V {
        &self.state
    }

    /// The shared action table
    pub fn table(&self) -> &Arc<ActionTable<V>> {
        &self.table
    }
}

impl<V: ValueType> Value for Bound<V> {
    fn type_id(&self) -> &str {
        V::TYPE_ID
    }

    fn invoke(&mut self, action: &str, args: &[Datum]) -> std::result::Result<Datum, ActionError> {
        self.table.dispatch(&mut self.state, action, args)
    }

    fn actions(&self) -> Vec<&str> {
        self.table.names().iter().map(String::as_str).collect()
    }

    fn snapshot(&self) -> Datum {
        self.state.snapshot()
    }

    fn restore(&mut self, snapshot: Datum) -> Result<()> {
        self.state = V::from_snapshot(snapshot)?;
        Ok(())
    }
}

impl<V: ValueType + fmt::Debug> fmt::Debug for Bound<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("type_id", &V::TYPE_ID)
            .field("state", &self.state)
            .finish()
    }
}
