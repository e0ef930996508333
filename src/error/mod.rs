//! Unified error handling for the chat client.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **Domain-specific Errors**: Network, Auth and Stream errors
//! - **Unified Error Type**: `ChatError` consolidates all error types
//! - **Result Type Alias**: `ChatResult<T>` for consistent return types
//!
//! # Error Categories
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout | Yes |
//! | Auth | Missing or rejected token | No |
//! | Server | Backend errors (5xx, `error` events) | Yes |
//! | Client | Malformed data | No |
//! | User | Rejected request (4xx) | No |
//! | Configuration | Config issues | No |
//! | Cancelled | Stopped by the caller | No |

mod auth;
mod category;
mod chat_error;
mod network;
mod result;
mod stream;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use network::{http_error_description, NetworkError};
pub use result::ChatResult;
pub use stream::StreamError;
