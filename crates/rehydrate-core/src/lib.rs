//! Rehydrate Core - Fundamental types for server state hydration
//!
//! This crate defines the types shared by every hydration-aware reducer:
//! - Identifiers (PayloadId)
//! - Execution context (browser session vs one-shot server render)
//! - Signals, hydrate payloads and raw JSON signals
//! - Shallow merge of slice states
//! - Configuration and errors

pub mod id;
pub mod context;
pub mod signal;
pub mod merge;
pub mod config;
pub mod error;

pub use id::*;
pub use context::*;
pub use signal::*;
pub use merge::*;
pub use config::*;
pub use error::*;
