//! Synchronous stream pipeline.
//!
//! bytes -> UTF-8 decoder -> line buffer -> frame parser -> session -> reducer
//!
//! Everything between two reads of the response body happens here, without
//! awaiting, so the driver only has to pull chunks and publish snapshots.

use crate::models::Message;
use crate::sse::{FrameParser, LineBuffer, StreamEvent, Utf8StreamDecoder};
use crate::stream::reducer::{self, MessageInstruction};
use crate::stream::session::StreamSession;

/// Snapshot handed to observers after each state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    pub messages: Vec<Message>,
    /// Transient progress text, cleared once content arrives
    pub status: Option<String>,
}

/// Owns one session and the message list it updates
#[derive(Debug)]
pub struct StreamProcessor {
    decoder: Utf8StreamDecoder,
    lines: LineBuffer,
    parser: FrameParser,
    session: StreamSession,
    messages: Vec<Message>,
}

impl StreamProcessor {
    /// Start processing on top of an existing message list.
    pub fn new(messages: Vec<Message>) -> Self {
        Self::with_session(messages, StreamSession::new())
    }

    pub fn with_session(messages: Vec<Message>, session: StreamSession) -> Self {
        Self {
            decoder: Utf8StreamDecoder::new(),
            lines: LineBuffer::new(),
            parser: FrameParser::new(),
            session,
            messages,
        }
    }

    /// Feed a raw body chunk. Returns true if state visible to observers changed.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> bool {
        let text = self.decoder.decode(chunk);
        self.feed_text(&text)
    }

    /// Feed decoded text. Returns true if state visible to observers changed.
    pub fn feed_text(&mut self, text: &str) -> bool {
        let mut changed = false;
        for line in self.lines.feed(text) {
            if let Some(event) = self.parser.parse(&line) {
                changed |= self.apply_event(event);
            }
        }
        changed
    }

    /// Interpret one event and apply its instruction.
    pub fn apply_event(&mut self, event: StreamEvent) -> bool {
        let status_before = self.session.current_status().map(str::to_string);
        let instruction = self.session.handle(event);
        let status_changed = status_before.as_deref() != self.session.current_status();
        self.apply_instruction(instruction) || status_changed
    }

    /// Natural end of the body. Closes the session as if `done` had arrived.
    pub fn finish(&mut self) -> bool {
        let tail = self.decoder.finish();
        let mut changed = self.feed_text(&tail);
        self.lines.finish();
        let status_before = self.session.current_status().is_some();
        let instruction = self.session.close_natural();
        changed |= self.apply_instruction(instruction);
        changed || status_before != self.session.current_status().is_some()
    }

    /// Transport failure. Closes the session as if an error event had arrived.
    pub fn fail(&mut self, description: &str) -> bool {
        self.lines.clear();
        let status_before = self.session.current_status().is_some();
        let instruction = self.session.fail_transport(description);
        let changed = self.apply_instruction(instruction);
        changed || status_before != self.session.current_status().is_some()
    }

    fn apply_instruction(&mut self, instruction: Option<MessageInstruction>) -> bool {
        match instruction {
            Some(instruction) => {
                let next = reducer::apply(&self.messages, &instruction);
                let changed = next != self.messages;
                self.messages = next;
                changed
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> StreamUpdate {
        StreamUpdate {
            messages: self.messages.clone(),
            status: self.session.current_status().map(str::to_string),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    pub fn is_terminal(&self) -> bool {
        self.session.is_terminal()
    }

    pub fn malformed_frames(&self) -> usize {
        self.parser.malformed_frames()
    }

    /// Consume the processor, returning the final message list and session.
    pub fn into_parts(self) -> (Vec<Message>, StreamSession) {
        (self.messages, self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::session::{SessionOutcome, SessionPhase};

    fn streaming_count(messages: &[Message]) -> usize {
        messages.iter().filter(|m| m.is_streaming).count()
    }

    #[test]
    fn test_scenario_answer_with_status() {
        let mut processor = StreamProcessor::new(vec![Message::user("what is it?")]);

        assert!(processor.feed_text("data: {\"type\":\"status\",\"message\":\"Searching...\"}\n"));
        assert_eq!(processor.snapshot().status.as_deref(), Some("Searching..."));
        assert_eq!(processor.messages().len(), 1);

        processor.feed_text("data: {\"type\":\"content\",\"message\":\"The \"}\n");
        assert!(processor.snapshot().status.is_none());
        assert_eq!(streaming_count(processor.messages()), 1);

        processor.feed_text("data: {\"type\":\"content\",\"message\":\"answer is 42.\"}\n");
        processor.feed_text("data: {\"type\":\"done\"}\n");

        let messages = processor.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "The answer is 42.");
        assert!(!messages[1].is_streaming);
        assert!(!messages[1].is_error);
        assert_eq!(processor.session().outcome(), Some(SessionOutcome::Completed));
    }

    #[test]
    fn test_scenario_error_without_content() {
        let mut processor = StreamProcessor::new(Vec::new());
        processor.feed_text("data: {\"type\":\"error\",\"message\":\"upstream unavailable\"}\n");

        let messages = processor.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_error);
        assert!(!messages[0].is_streaming);
        assert!(messages[0].text.contains("upstream unavailable"));
    }

    #[test]
    fn test_partial_chunks_yield_one_event() {
        let mut processor = StreamProcessor::new(Vec::new());
        assert!(!processor.feed_bytes(b"data: {\"type\":\"content\",\"mess"));
        assert!(processor.messages().is_empty());
        assert!(processor.feed_bytes(b"age\":\"hi\"}\n"));
        assert_eq!(processor.messages().len(), 1);
        assert_eq!(processor.messages()[0].text, "hi");
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let frame = "data: {\"type\":\"content\",\"message\":\"caf\u{e9} \u{1F600}\"}\n";
        let bytes = frame.as_bytes();
        let mut processor = StreamProcessor::new(Vec::new());
        for chunk in bytes.chunks(3) {
            processor.feed_bytes(chunk);
        }
        assert_eq!(processor.messages()[0].text, "caf\u{e9} \u{1F600}");
    }

    #[test]
    fn test_malformed_line_tolerated() {
        let mut processor = StreamProcessor::new(Vec::new());
        processor.feed_text("data: {not valid json}\n");
        processor.feed_text("data: {\"type\":\"content\",\"message\":\"ok\"}\n");
        assert_eq!(processor.malformed_frames(), 1);
        assert_eq!(processor.messages().len(), 1);
        assert_eq!(processor.messages()[0].text, "ok");
    }

    #[test]
    fn test_finish_closes_streaming_message() {
        let mut processor = StreamProcessor::new(Vec::new());
        processor.feed_text("data: {\"type\":\"content\",\"message\":\"half\"}\n");
        processor.feed_text("data: {\"type\":\"content\",\"message\":\" more");
        assert!(processor.finish());

        let messages = processor.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "half");
        assert!(!messages[0].is_streaming);
        assert_eq!(processor.session().phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_finish_after_only_malformed_lines() {
        let mut processor = StreamProcessor::new(vec![Message::user("q")]);
        processor.feed_text("data: {broken\n");
        processor.finish();
        assert_eq!(processor.messages().len(), 1);
        assert!(processor.is_terminal());
        assert_eq!(streaming_count(processor.messages()), 0);
    }

    #[test]
    fn test_fail_marks_live_message_as_error() {
        let mut processor = StreamProcessor::new(Vec::new());
        processor.feed_text("data: {\"type\":\"content\",\"message\":\"partial\"}\n");
        assert!(processor.fail("Connection reset"));

        let messages = processor.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "Error: Connection reset");
        assert!(messages[0].is_error);
        assert!(!messages[0].is_streaming);
    }

    #[test]
    fn test_status_only_change_is_reported() {
        let mut processor = StreamProcessor::new(Vec::new());
        processor.feed_text("data: {\"type\":\"status\",\"message\":\"Searching...\"}\n");
        assert!(processor.finish());
        assert!(processor.snapshot().status.is_none());
    }

    #[test]
    fn test_at_most_one_streaming_through_session() {
        let mut processor = StreamProcessor::new(Vec::new());
        let lines = [
            "data: {\"type\":\"status\",\"message\":\"s\"}\n",
            "data: {\"type\":\"content\",\"message\":\"a\"}\n",
            "data: {\"type\":\"content\",\"message\":\"b\"}\n",
            "\n",
            "data: {\"type\":\"done\"}\n",
            "data: {\"type\":\"content\",\"message\":\"late\"}\n",
        ];
        for line in lines {
            processor.feed_text(line);
            assert!(streaming_count(processor.messages()) <= 1);
        }
        assert_eq!(processor.messages()[0].text, "ab");
        assert_eq!(streaming_count(processor.messages()), 0);
    }
}
