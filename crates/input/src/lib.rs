//! Input: the per-frame signal snapshot the simulation consumes.
//!
//! # Invariants
//! - The kernel reads one `InputState` per tick, never raw window events.
//! - A back end (window, script, test) only has to implement `InputSource`.

pub mod script;
pub mod state;

pub use script::{ScriptError, ScriptedInput};
pub use state::{InputSource, InputState};
