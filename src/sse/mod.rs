//! Query stream decoding
//!
//! The backend answers a query with a chunked body of newline-delimited
//! frames, each of the form `data: <json>`:
//! - `{"type":"status","message":...}` - progress indicator
//! - `{"type":"content","message":...}` - answer chunk
//! - `{"type":"done"}` - successful completion
//! - `{"type":"error","message":...}` - failure
//!
//! # Module structure
//! - `decoder` - Incremental UTF-8 decoding of raw chunks
//! - `line_buffer` - Line reassembly across chunk boundaries
//! - `events` - Event type definitions (StreamEvent, FrameParseError)
//! - `payloads` - Internal payload deserialization struct
//! - `parser` - Frame parsing (parse_frame, FrameParser)

mod decoder;
mod events;
mod line_buffer;
mod parser;
mod payloads;

pub use decoder::Utf8StreamDecoder;
pub use events::{FrameParseError, StreamEvent};
pub use line_buffer::LineBuffer;
pub use parser::{parse_frame, FrameParser, FRAME_PREFIX};
