//! Result type alias for chat client operations.

use super::chat_error::ChatError;

/// Type alias for Results using ChatError.
///
/// # Example
///
/// ```ignore
/// use ragchat::error::ChatResult;
///
/// async fn titles(store: &dyn ConversationStore) -> ChatResult<Vec<String>> {
///     let conversations = store.list().await?;
///     Ok(conversations.into_iter().map(|c| c.title).collect())
/// }
/// ```
pub type ChatResult<T> = Result<T, ChatError>;
