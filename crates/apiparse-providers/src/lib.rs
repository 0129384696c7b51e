//! Provider layer for apiparse.
//!
//! # Architecture
//!
//! - [`registry`] — static routing table: model id → provider route
//! - [`prompt`] — per-route message wrapping and Bedrock payload templates
//! - [`workers_ai`], [`openai`], [`bedrock`] — one adapter per provider API
//! - [`sigv4`] — AWS request signing for Bedrock
//! - [`dispatcher::Dispatcher`] — looks up the route and calls the adapter
//! - [`traits::ModelDispatch`] — trait the dispatcher implements

pub mod bedrock;
pub mod dispatcher;
pub mod http;
pub mod openai;
pub mod prompt;
pub mod registry;
pub mod sigv4;
pub mod traits;
pub mod workers_ai;

// Re-export main types for convenience
pub use dispatcher::Dispatcher;
pub use http::CallOptions;
pub use registry::{find_model, models_for, BedrockFamily, ModelSpec, Provider, Route, MODELS};
pub use traits::ModelDispatch;
