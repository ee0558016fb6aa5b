//! `int` value type

use crate::datum::{args, Datum};
use crate::error::{ActionError, Result};
use crate::value::{ActionTable, ValueType};

type ActionResult = std::result::Result<Datum, ActionError>;

/// A signed 64-bit counter. Every arithmetic action is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntValue(pub i64);

impl IntValue {
    pub const TYPE: &'static str = "int";

    pub const GET: &'static str = "get";
    pub const SET: &'static str = "set";
    pub const INCREMENT: &'static str = "increment";
    pub const DECREMENT: &'static str = "decrement";
    pub const INCREMENT_BY: &'static str = "incrementBy";
    pub const DECREMENT_BY: &'static str = "decrementBy";

    fn get(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::GET, args, 0, 0)?;
        Ok(Datum::Int(self.0))
    }

    fn set(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::SET, args, 1, 1)?;
        self.0 = args::int_at(Self::SET, args, 0)?;
        Ok(Datum::Int(self.0))
    }

    fn increment(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INCREMENT, args, 0, 0)?;
        self.add(Self::INCREMENT, 1)
    }

    fn decrement(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::DECREMENT, args, 0, 0)?;
        self.sub(Self::DECREMENT, 1)
    }

    fn increment_by(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::INCREMENT_BY, args, 1, 1)?;
        let delta = args::int_at(Self::INCREMENT_BY, args, 0)?;
        self.add(Self::INCREMENT_BY, delta)
    }

    fn decrement_by(&mut self, args: &[Datum]) -> ActionResult {
        args::arity(Self::DECREMENT_BY, args, 1, 1)?;
        let delta = args::int_at(Self::DECREMENT_BY, args, 0)?;
        self.sub(Self::DECREMENT_BY, delta)
    }

    fn add(&mut self, action: &str, delta: i64) -> ActionResult {
        self.0 = self
            .0
            .checked_add(delta)
            .ok_or_else(|| ActionError::operation(action, format!("{} + {} overflows", self.0, delta)))?;
        Ok(Datum::Int(self.0))
    }

    fn sub(&mut self, action: &str, delta: i64) -> ActionResult {
        self.0 = self
            .0
            .checked_sub(delta)
            .ok_or_else(|| ActionError::operation(action, format!("{} - {} overflows", self.0, delta)))?;
        Ok(Datum::Int(self.0))
    }
}

impl ValueType for IntValue {
    const TYPE_ID: &'static str = Self::TYPE;

    fn action_table() -> Result<ActionTable<Self>> {
        ActionTable::<Self>::builder(Self::TYPE_ID)
            .action(Self::GET, Self::get)
            .action(Self::SET, Self::set)
            .action(Self::INCREMENT, Self::increment)
            .action(Self::DECREMENT, Self::decrement)
            .action(Self::INCREMENT_BY, Self::increment_by)
            .action(Self::DECREMENT_BY, Self::decrement_by)
            .build()
    }

    fn snapshot(&self) -> Datum {
        Datum::Int(self.0)
    }

    fn from_snapshot(snapshot: Datum) -> Result<Self> {
        match snapshot {
            Datum::Null => Ok(Self::default()),
            Datum::Int(i) => Ok(Self(i)),
            other => Err(super::bad_snapshot(Self::TYPE_ID, "an int", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_decrement() {
        let table = IntValue::action_table().unwrap();
        let mut v = IntValue::default();

        assert_eq!(table.dispatch(&mut v, "increment", &[]).unwrap(), Datum::Int(1));
        assert_eq!(
            table.dispatch(&mut v, "incrementBy", &[Datum::Int(10)]).unwrap(),
            Datum::Int(11)
        );
        assert_eq!(
            table.dispatch(&mut v, "decrementBy", &[Datum::Int(20)]).unwrap(),
            Datum::Int(-9)
        );
        assert_eq!(table.dispatch(&mut v, "decrement", &[]).unwrap(), Datum::Int(-10));
    }

    #[test]
    fn test_overflow_is_operation_error() {
        let table = IntValue::action_table().unwrap();
        let mut v = IntValue(i64::MAX);

        let err = table.dispatch(&mut v, "increment", &[]).unwrap_err();
        assert!(matches!(err, ActionError::Operation { .. }));
        assert_eq!(v.0, i64::MAX);

        let mut v = IntValue(i64::MIN);
        assert!(table.dispatch(&mut v, "decrementBy", &[Datum::Int(1)]).is_err());
    }

    #[test]
    fn test_float_argument_rejected() {
        let table = IntValue::action_table().unwrap();
        let mut v = IntValue::default();
        let err = table.dispatch(&mut v, "set", &[Datum::Float(1.5)]).unwrap_err();
        assert!(matches!(err, ActionError::InvalidArgument { .. }));
    }
}
