//! Frame parsing logic
//!
//! Turns one complete line of the query stream into a typed [`StreamEvent`].

use tracing::{debug, warn};

use crate::sse::events::{FrameParseError, StreamEvent};
use crate::sse::payloads::FramePayload;

/// Marker that starts every meaningful line
pub const FRAME_PREFIX: &str = "data: ";

/// Parse a single line into a stream event
///
/// Returns:
/// - `Ok(Some(event))` - a recognized frame
/// - `Ok(None)` - blank line, non-frame line, or unknown event type
/// - `Err(error)` - a frame whose payload could not be decoded
pub fn parse_frame(line: &str) -> Result<Option<StreamEvent>, FrameParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let data = match line.strip_prefix(FRAME_PREFIX) {
        Some(data) => data,
        None => return Ok(None),
    };

    let payload: FramePayload =
        serde_json::from_str(data).map_err(|e| FrameParseError::InvalidJson {
            payload: data.to_string(),
            source: e.to_string(),
        })?;

    let event_type = payload.event_type;
    let require_message = |message: Option<String>| {
        message.ok_or_else(|| FrameParseError::MissingMessage {
            event_type: event_type.clone(),
        })
    };

    let event = match event_type.as_str() {
        "status" => StreamEvent::Status {
            message: require_message(payload.message)?,
        },
        "content" => StreamEvent::Content {
            message: require_message(payload.message)?,
        },
        "done" => StreamEvent::Done,
        "error" => StreamEvent::Error {
            message: require_message(payload.message)?,
        },
        other => {
            debug!(event_type = other, "Ignoring unknown stream event type");
            return Ok(None);
        }
    };

    Ok(Some(event))
}

/// Frame parser that reports malformed frames instead of failing
///
/// Malformed frames are logged and counted; the stream keeps going.
#[derive(Debug, Default)]
pub struct FrameParser {
    frames_parsed: usize,
    malformed_frames: usize,
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a line, swallowing decode failures after logging them
    pub fn parse(&mut self, line: &str) -> Option<StreamEvent> {
        match parse_frame(line) {
            Ok(Some(event)) => {
                self.frames_parsed += 1;
                Some(event)
            }
            Ok(None) => None,
            Err(err) => {
                self.malformed_frames += 1;
                warn!(error = %err, "Skipping malformed stream frame");
                None
            }
        }
    }

    /// Number of frames decoded into events
    pub fn frames_parsed(&self) -> usize {
        self.frames_parsed
    }

    /// Number of frames that failed to decode
    pub fn malformed_frames(&self) -> usize {
        self.malformed_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_frame() {
        let event = parse_frame(r#"data: {"type":"status","message":"Searching..."}"#).unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::Status {
                message: "Searching...".to_string()
            })
        );
    }

    #[test]
    fn test_parse_content_frame() {
        let event = parse_frame(r#"data: {"type":"content","message":"The "}"#).unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::Content {
                message: "The ".to_string()
            })
        );
    }

    #[test]
    fn test_parse_done_ignores_message() {
        assert_eq!(
            parse_frame(r#"data: {"type":"done"}"#).unwrap(),
            Some(StreamEvent::Done)
        );
        assert_eq!(
            parse_frame(r#"data: {"type":"done","message":"bye"}"#).unwrap(),
            Some(StreamEvent::Done)
        );
    }

    #[test]
    fn test_parse_error_frame() {
        let event = parse_frame(r#"data: {"type":"error","message":"upstream unavailable"}"#)
            .unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::Error {
                message: "upstream unavailable".to_string()
            })
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let event = parse_frame("   data: {\"type\":\"done\"}\r").unwrap();
        assert_eq!(event, Some(StreamEvent::Done));
    }

    #[test]
    fn test_blank_and_non_frame_lines_yield_none() {
        assert_eq!(parse_frame("").unwrap(), None);
        assert_eq!(parse_frame("   \r").unwrap(), None);
        assert_eq!(parse_frame(": keep-alive").unwrap(), None);
        assert_eq!(parse_frame("event: content").unwrap(), None);
        // Prefix requires the space
        assert_eq!(parse_frame(r#"data:{"type":"done"}"#).unwrap(), None);
    }

    #[test]
    fn test_unknown_type_yields_none() {
        assert_eq!(
            parse_frame(r#"data: {"type":"sources","message":"doc.pdf"}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = parse_frame("data: {not valid json}").unwrap_err();
        assert!(matches!(err, FrameParseError::InvalidJson { .. }));
    }

    #[test]
    fn test_missing_type_is_error() {
        let err = parse_frame(r#"data: {"message":"hi"}"#).unwrap_err();
        assert!(matches!(err, FrameParseError::InvalidJson { .. }));
    }

    #[test]
    fn test_missing_message_is_error() {
        let err = parse_frame(r#"data: {"type":"content"}"#).unwrap_err();
        assert_eq!(
            err,
            FrameParseError::MissingMessage {
                event_type: "content".to_string()
            }
        );
    }

    #[test]
    fn test_frame_parser_counts_and_continues() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.parse("data: {not valid json}"), None);
        assert_eq!(
            parser.parse(r#"data: {"type":"content","message":"ok"}"#),
            Some(StreamEvent::Content {
                message: "ok".to_string()
            })
        );
        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.malformed_frames(), 1);
        assert_eq!(parser.frames_parsed(), 1);
    }
}
