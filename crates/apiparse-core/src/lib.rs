//! Core types for apiparse — messages, the dispatch error taxonomy, configuration.
//!
//! Shared by the provider crate and the CLI.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{DispatchError, ErrorKind};
pub use types::{ChatMessage, PromptRequest};
