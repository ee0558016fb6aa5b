//! Argument helpers for action implementations
//!
//! Every helper reports a mismatch as [`ActionError::InvalidArgument`] naming
//! the action, so implementations can simply use `?`.

use super::Datum;
use crate::error::ActionError;

/// Check the argument count lies in `min..=max`
pub fn arity(action: &str, args: &[Datum], min: usize, max: usize) -> Result<(), ActionError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(ActionError::invalid_argument(
            action,
            format!("expected {} argument(s), got {}", expected, args.len()),
        ));
    }
    Ok(())
}

/// Argument `idx` as a string
pub fn str_at<'a>(action: &str, args: &'a [Datum], idx: usize) -> Result<&'a str, ActionError> {
    let arg = required(action, args, idx)?;
    arg.as_str().ok_or_else(|| mismatch(action, idx, "string", arg))
}

/// Argument `idx` as an integer
pub fn int_at(action: &str, args: &[Datum], idx: usize) -> Result<i64, ActionError> {
    let arg = required(action, args, idx)?;
    arg.as_int().ok_or_else(|| mismatch(action, idx, "int", arg))
}

/// Argument `idx` as a non-negative index
pub fn index_at(action: &str, args: &[Datum], idx: usize) -> Result<usize, ActionError> {
    let n = int_at(action, args, idx)?;
    usize::try_from(n).map_err(|_| {
        ActionError::invalid_argument(
            action,
            format!("argument {} must be a non-negative index, got {}", idx, n),
        )
    })
}

/// Every argument as a string, in order
pub fn all_strs(action: &str, args: &[Datum]) -> Result<Vec<String>, ActionError> {
    args.iter()
        .enumerate()
        .map(|(idx, arg)| {
            arg.as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(action, idx, "string", arg))
        })
        .collect()
}

fn required<'a>(action: &str, args: &'a [Datum], idx: usize) -> Result<&'a Datum, ActionError> {
    args.get(idx).ok_or_else(|| {
        ActionError::invalid_argument(action, format!("missing argument {}", idx))
    })
}

fn mismatch(action: &str, idx: usize, expected: &str, got: &Datum) -> ActionError {
    ActionError::invalid_argument(
        action,
        format!(
            "argument {} must be {}, got {}",
            idx,
            expected,
            got.kind_name()
        ),
    )
}
