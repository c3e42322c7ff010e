//! Rehydrate State - Merge-once hydration for slice reducers
//!
//! This crate implements hydration reconciliation:
//! - Slice reducers
//! - Reconciliation markers scoped to a hydration session
//! - The slice reconciler (merge server state exactly once)
//! - The reducer set composer
//! - A combined reducer over global state

pub mod reducer;
pub mod session;
pub mod hydrate;
pub mod compose;
pub mod combine;

pub use reducer::*;
pub use session::*;
pub use hydrate::*;
pub use compose::*;
pub use combine::*;
