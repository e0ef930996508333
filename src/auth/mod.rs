//! Authentication for the chat backend.
//!
//! - Credentials storage ([`CredentialsManager`])
//! - Sign-in and sign-up ([`AuthApi`])

pub mod api;
pub mod credentials;

pub use api::AuthApi;
pub use credentials::{Credentials, CredentialsManager};
