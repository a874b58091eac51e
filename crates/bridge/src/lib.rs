//! Request/response relay across the isolation boundary.
//!
//! The bridge runs in a context that shares a document with the page but
//! none of its memory. It turns panel requests into boundary signals,
//! reads the recorder's answer out of the shared slot, and recovers by
//! re-installing the recorder when nothing answers within the deadline.

mod error;
mod relay;
mod server;

pub use error::BridgeError;
pub use relay::{Reinstaller, Relay};
pub use server::{BridgeHandle, BridgeResponse, spawn};
