//! Per-type action tables
//!
//! Built once when a type is registered and never modified afterwards.

use std::collections::HashMap;
use std::fmt;

use crate::datum::Datum;
use crate::error::{ActionError, KvError, Result};

/// An action implementation for state type `V`
pub type ActionFn<V> = fn(&mut V, &[Datum]) -> std::result::Result<Datum, ActionError>;

/// Immutable mapping from action name to implementation
pub struct ActionTable<V> {
    type_id: String,
    actions: HashMap<String, ActionFn<V>>,
    /// Sorted once at build time
    names: Vec<String>,
}

impl<V> ActionTable<V> {
    /// Start building a table for the given type
    pub fn builder(type_id: impl Into<String>) -> ActionTableBuilder<V> {
        ActionTableBuilder {
            type_id: type_id.into(),
            actions: Vec::new(),
        }
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Resolve an action by name
    pub fn lookup(&self, name: &str) -> Option<ActionFn<V>> {
        self.actions.get(name).copied()
    }

    /// Resolve and run an action against `state`
    pub fn dispatch(
        &self,
        state: &mut V,
        name: &str,
        args: &[Datum],
    ) -> std::result::Result<Datum, ActionError> {
        let action = self.lookup(name).ok_or_else(|| ActionError::UnknownAction {
            type_id: self.type_id.clone(),
            action: name.to_string(),
        })?;
        action(state, args)
    }

    /// All action names, sorted
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<V> fmt::Debug for ActionTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTable")
            .field("type_id", &self.type_id)
            .field("actions", &self.names)
            .finish()
    }
}

/// Builder for ActionTable
pub struct ActionTableBuilder<V> {
    type_id: String,
    actions: Vec<(String, ActionFn<V>)>,
}

impl<V> ActionTableBuilder<V> {
    /// Add an action
    pub fn action(mut self, name: impl Into<String>, f: ActionFn<V>) -> Self {
        self.actions.push((name.into(), f));
        self
    }

    /// Freeze the table. Duplicate names or an empty table are defects in the
    /// type provider.
    pub fn build(self) -> Result<ActionTable<V>> {
        if self.actions.is_empty() {
            return Err(KvError::Invariant(format!(
                "type {:?} declares no actions",
                self.type_id
            )));
        }

        let mut actions = HashMap::with_capacity(self.actions.len());
        for (name, f) in self.actions {
            if actions.insert(name.clone(), f).is_some() {
                return Err(KvError::Invariant(format!(
                    "type {:?} declares action {:?} twice",
                    self.type_id, name
                )));
            }
        }

        let mut names: Vec<String> = actions.keys().cloned().collect();
        names.sort();

        Ok(ActionTable {
            type_id: self.type_id,
            actions,
            names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(state: &mut i64, _args: &[Datum]) -> std::result::Result<Datum, ActionError> {
        *state += 1;
        Ok(Datum::Int(*state))
    }

    fn read(state: &mut i64, _args: &[Datum]) -> std::result::Result<Datum, ActionError> {
        Ok(Datum::Int(*state))
    }

    #[test]
    fn test_lookup_and_dispatch() {
        let table = ActionTable::<i64>::builder("counter")
            .action("bump", bump)
            .action("read", read)
            .build()
            .unwrap();

        let mut state = 0i64;
        assert_eq!(table.dispatch(&mut state, "bump", &[]).unwrap(), Datum::Int(1));
        assert_eq!(table.dispatch(&mut state, "read", &[]).unwrap(), Datum::Int(1));
        assert_eq!(table.names(), &["bump".to_string(), "read".to_string()]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unknown_action_is_error() {
        let table = ActionTable::<i64>::builder("counter")
            .action("bump", bump)
            .build()
            .unwrap();

        let mut state = 0i64;
        let err = table.dispatch(&mut state, "explode", &[]).unwrap_err();
        assert!(matches!(err, ActionError::UnknownAction { .. }));
        assert_eq!(state, 0);
    }

    #[test]
    fn test_duplicate_action_rejected() {
        let result = ActionTable::<i64>::builder("counter")
            .action("bump", bump)
            .action("bump", read)
            .build();
        assert!(matches!(result, Err(KvError::Invariant(_))));
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = ActionTable::<i64>::builder("nothing").build();
        assert!(matches!(result, Err(KvError::Invariant(_))));
    }
}
