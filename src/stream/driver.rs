//! Async stream driver.
//!
//! Opens the query stream, pulls body chunks through a [`StreamProcessor`]
//! and publishes a [`StreamUpdate`] after every visible change. Transport
//! failures and cancellation close the session the same way an error
//! event does, so the returned message list never keeps a streaming message.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::api::ChatApiClient;
use crate::error::{ChatError, ChatResult, NetworkError, StreamError};
use crate::models::{Message, QueryRequest};
use crate::stream::processor::{StreamProcessor, StreamUpdate};
use crate::stream::session::{SessionOutcome, StreamSession};

/// Description used when the caller cancels a running query
pub const CANCELLED_DESCRIPTION: &str = "Request cancelled";

/// Result of one driven query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Final message list, with no message left streaming
    pub messages: Vec<Message>,
    /// Id given to the answer message
    pub streaming_message_id: String,
    pub result: SessionOutcome,
    /// What ended the stream, when it failed
    pub failure: Option<ChatError>,
    /// Frames dropped as malformed
    pub malformed_frames: usize,
}

impl StreamOutcome {
    pub fn is_success(&self) -> bool {
        self.result == SessionOutcome::Completed
    }

    /// The failure description, for error events and transport failures.
    pub fn error(&self) -> Option<&str> {
        match &self.result {
            SessionOutcome::Completed => None,
            SessionOutcome::Failed { message } => Some(message),
        }
    }
}

/// Drives query streams against the backend.
pub struct StreamDriver {
    api: Arc<ChatApiClient>,
}

impl StreamDriver {
    pub fn new(api: Arc<ChatApiClient>) -> Self {
        Self { api }
    }

    /// Run one query to completion.
    ///
    /// `messages` is the list the answer is appended to. Snapshots are sent
    /// on `updates` when given; a dropped receiver does not stop the stream.
    ///
    /// Returns `Err` only when no request could be made because no access
    /// token is available. Every other failure is reported through the
    /// outcome and an error-flagged message.
    pub async fn run(
        &self,
        messages: Vec<Message>,
        request: &QueryRequest,
        updates: Option<mpsc::UnboundedSender<StreamUpdate>>,
    ) -> ChatResult<StreamOutcome> {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        self.run_with_cancel(messages, request, updates, cancel_rx)
            .await
    }

    /// Like [`run`](Self::run), aborting when `cancel` becomes `true`.
    ///
    /// Cancellation is honoured while the request is opening as well as
    /// while the body is read.
    pub async fn run_with_cancel(
        &self,
        messages: Vec<Message>,
        request: &QueryRequest,
        updates: Option<mpsc::UnboundedSender<StreamUpdate>>,
        mut cancel: watch::Receiver<bool>,
    ) -> ChatResult<StreamOutcome> {
        let token = self.api.access_token().await?;

        let session = StreamSession::new();
        info!(
            conversation_id = %request.conversation_id,
            message_id = %session.streaming_message_id(),
            "Starting query stream"
        );
        let mut processor = StreamProcessor::with_session(messages, session);

        if *cancel.borrow() {
            return Ok(abort(processor, &updates, cancelled_failure()));
        }

        let opened = tokio::select! {
            opened = self.api.open_query_stream(&token, request) => opened,
            _ = cancelled(&mut cancel) => {
                info!("Query cancelled while opening the stream");
                return Ok(abort(processor, &updates, cancelled_failure()));
            }
        };
        let mut body = match opened {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "Failed to open query stream");
                let description = err.description();
                return Ok(abort(processor, &updates, (description, err.into())));
            }
        };

        let mut failure = None;
        while !processor.is_terminal() {
            tokio::select! {
                chunk = body.next() => {
                    let changed = match chunk {
                        Some(Ok(bytes)) => processor.feed_bytes(&bytes),
                        Some(Err(err)) => {
                            warn!(error = %err, "Query stream read failed");
                            let description = err.description();
                            let changed = processor.fail(&description);
                            failure = Some(ChatError::Stream(StreamError::Interrupted {
                                message: description,
                            }));
                            changed
                        }
                        None => {
                            debug!("Query stream ended");
                            processor.finish()
                        }
                    };
                    if changed {
                        publish(&updates, &processor);
                    }
                }
                _ = cancelled(&mut cancel) => {
                    info!("Query stream cancelled");
                    let (description, err) = cancelled_failure();
                    if processor.fail(&description) {
                        publish(&updates, &processor);
                    }
                    failure = Some(err);
                }
            }
        }

        Ok(finish(processor, failure))
    }
}

/// Resolves once the flag is `true`. Never resolves if the sender is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let closed = cancel.wait_for(|flag| *flag).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

fn cancelled_failure() -> (String, ChatError) {
    (
        CANCELLED_DESCRIPTION.to_string(),
        ChatError::Network(NetworkError::Cancelled),
    )
}

/// Close the session with a transport failure before any body was read.
fn abort(
    mut processor: StreamProcessor,
    updates: &Option<mpsc::UnboundedSender<StreamUpdate>>,
    (description, err): (String, ChatError),
) -> StreamOutcome {
    if processor.fail(&description) {
        publish(updates, &processor);
    }
    finish(processor, Some(err))
}

fn publish(updates: &Option<mpsc::UnboundedSender<StreamUpdate>>, processor: &StreamProcessor) {
    if let Some(tx) = updates {
        let _ = tx.send(processor.snapshot());
    }
}

fn finish(processor: StreamProcessor, transport_failure: Option<ChatError>) -> StreamOutcome {
    let malformed_frames = processor.malformed_frames();
    let (messages, session) = processor.into_parts();
    let result = session.outcome().unwrap_or(SessionOutcome::Completed);
    if malformed_frames > 0 {
        warn!(malformed_frames, "Dropped malformed frames");
    }
    let failure = match &result {
        SessionOutcome::Completed => None,
        SessionOutcome::Failed { message } => Some(transport_failure.unwrap_or_else(|| {
            ChatError::Stream(StreamError::BackendError {
                message: message.clone(),
            })
        })),
    };
    StreamOutcome {
        messages,
        streaming_message_id: session.streaming_message_id().to_string(),
        result,
        failure,
        malformed_frames,
    }
}
