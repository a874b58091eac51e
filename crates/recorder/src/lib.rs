//! Page-side console capture for logsieve.
//!
//! Runs inside the page execution context: taps the five console entry
//! points, deep-copies every argument into a JSON-safe form, and keeps a
//! bounded ring buffer of captured entries. A small service loop answers
//! dump/clear signals from the bridge through the shared slot.

mod buffer;
mod channel;
mod console;
mod page;
mod recorder;
pub mod snapshot;
pub mod value;

pub use buffer::LogBuffer;
pub use channel::{DataSlot, SignalBus};
pub use console::{Console, ConsoleSink, TracingSink};
pub use page::Page;
pub use recorder::{Recorder, spawn_service};
pub use value::{ComplexObject, PageValue};
