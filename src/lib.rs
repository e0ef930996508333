//! ragchat - streaming client for a retrieval-augmented chat backend
//!
//! The core decodes the backend's `data: <json>` event stream into an
//! incrementally assembled message list:
//!
//! - [`sse`]: UTF-8 decoding, line buffering and frame parsing
//! - [`stream`]: session interpretation, the message reducer and the driver
//!
//! Around it sit the backend client ([`api`], [`auth`]), the caller-level
//! chat state ([`app`]) and the `ragchat` binary ([`cli`]).

pub mod adapters;
pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod sse;
pub mod stream;
pub mod traits;
