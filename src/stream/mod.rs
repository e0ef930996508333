//! Incremental message assembly for query streams.
//!
//! - [`session`]: interprets stream events for one query
//! - [`reducer`]: applies the resulting instructions to a message list
//! - [`processor`]: the synchronous bytes-to-messages pipeline
//! - [`driver`]: pulls the response body and publishes snapshots

pub mod driver;
pub mod processor;
pub mod reducer;
pub mod session;

pub use driver::{StreamDriver, StreamOutcome, CANCELLED_DESCRIPTION};
pub use processor::{StreamProcessor, StreamUpdate};
pub use reducer::{apply, apply_all, ApplyMode, MessageInstruction};
pub use session::{error_text, SessionOutcome, SessionPhase, StreamSession, ERROR_TEXT_PREFIX};
