//! Composite date/time pickers.
//!
//! Hosts that cannot show a native date or time control get a row of bounded
//! drop-downs instead. The drop-downs keep a single canonical value in sync
//! (`yyyy-mm-dd` or `HH:MM`); that canonical value is what validates and
//! submits. Setting the canonical value programmatically back-derives the
//! drop-downs when it parses to a consistent date or time.

mod date;
mod time;

pub use date::{DateOrder, DatePart, DatePicker};
pub use time::{TimePart, TimePicker};
