//! Trigger vocabulary for the LEAF network viewer.
//!
//! This crate re-exports the data contracts from `leaf_schema` and defines the
//! events the reconciler consumes, the raw widget frames they are classified
//! from, and a small text syntax for scripting them, without depending on the
//! Bevy runtime in `leaf_core`.

pub use leaf_schema::*;

mod events;
mod frame;
mod trigger_text;

pub use events::{LayoutMode, TriggerCategory, ViewEvent, SELECT_ALL_SENTINEL};
pub use frame::{FrameTriggers, TriggerFrame, TriggerMemory};
pub use trigger_text::{parse_trigger_line, TriggerParseError};
