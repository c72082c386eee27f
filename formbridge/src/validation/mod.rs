//! Rule derivation and per-field evaluation.
//!
//! A [`ValidationRule`] is derived once per field definition and shared by
//! every instance of a repeatable field. [`ValidationEngine::evaluate`] is the
//! only path that flips an instance's error flag and schedules its message
//! transitions.

mod bounds;
mod evaluate;
mod rule;
mod trigger;

pub use bounds::{calendar_date, char_slice, parse_int, strip_separators};
pub use evaluate::ValidationEngine;
pub use rule::{Bounds, ValidationRule, Verdict};
pub use trigger::{Key, Trigger};
