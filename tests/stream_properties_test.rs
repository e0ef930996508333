//! Pipeline properties checked over every way of splitting a body.

mod common;

use bytes::Bytes;
use common::{answer_body, frame, mock_api, MockHttpClient, MockResponse};
use ragchat::models::{Message, QueryRequest};
use ragchat::sse::LineBuffer;
use ragchat::stream::{
    apply, MessageInstruction, StreamDriver, StreamProcessor, StreamSession,
};

const QUERY_URL: &str = "http://localhost:8000/retriever/query";

#[test]
fn test_lines_reconstruct_input_for_every_split() {
    let input = "data: a\n\ndata: b\r\npartial";
    for split in 0..=input.len() {
        if !input.is_char_boundary(split) {
            continue;
        }
        let mut buffer = LineBuffer::new();
        let mut lines = buffer.feed(&input[..split]);
        lines.extend(buffer.feed(&input[split..]));

        let mut rebuilt = lines.join("\n");
        rebuilt.push('\n');
        rebuilt.push_str(buffer.carry_over());
        assert_eq!(rebuilt, input, "split at {}", split);
    }
}

#[test]
fn test_every_byte_split_gives_same_answer() {
    let body = answer_body("Searching...", &["Caf\u{e9} ", "na\u{ef}ve \u{1F600}"]);
    let bytes = body.as_bytes();

    for split in 0..=bytes.len() {
        let mut processor =
            StreamProcessor::with_session(Vec::new(), StreamSession::with_message_id("m"));
        processor.feed_bytes(&bytes[..split]);
        processor.feed_bytes(&bytes[split..]);
        processor.finish();

        let messages = processor.messages();
        assert_eq!(messages.len(), 1, "split at {}", split);
        assert_eq!(messages[0].text, "Caf\u{e9} na\u{ef}ve \u{1F600}");
        assert!(!messages[0].is_streaming);
    }
}

#[test]
fn test_reapplying_instruction_is_idempotent() {
    let instruction = MessageInstruction::stream_content("m", "same text", chrono::Utc::now());
    let once = apply(&[Message::user("q")], &instruction);
    let twice = apply(&once, &instruction);
    assert_eq!(once, twice);
}

#[test]
fn test_terminal_closure_for_each_ending() {
    let endings = [
        frame("done", None),
        frame("error", Some("failed")),
        String::new(),
    ];
    for ending in endings {
        let mut processor = StreamProcessor::new(Vec::new());
        processor.feed_text(&frame("content", Some("partial")));
        processor.feed_text(&ending);
        processor.finish();
        assert!(processor.is_terminal());
        assert!(processor.messages().iter().all(|m| !m.is_streaming));
    }
}

#[tokio::test]
async fn test_driver_with_one_byte_chunks() {
    let body = answer_body("Looking up", &["one ", "two"]);
    let chunks: Vec<Bytes> = body.bytes().map(|b| Bytes::from(vec![b])).collect();

    let mock = MockHttpClient::new();
    mock.set_response(QUERY_URL, MockResponse::Stream(chunks));

    let outcome = StreamDriver::new(mock_api(&mock, "tok"))
        .run(Vec::new(), &QueryRequest::new("q", "c1"), None)
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.messages[0].text, "one two");
}
