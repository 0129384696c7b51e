//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use apiparse_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("OpenAI temperature: {}", cfg.sampling.openai.temperature);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{apply_env_overrides, ensure_env_loaded, get_config_path, load_config, save_config};
pub use schema::{BedrockSampling, Config, Credentials, EndpointsConfig, HttpConfig, OpenAiSampling, SamplingConfig};
