//! Hydration configuration

use crate::ExecutionContext;

/// Hydration session configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HydrationConfig {
    /// Where the session runs
    pub context: ExecutionContext,
    /// Log a warning when a hydrate payload has no state for a slice
    pub warn_on_missing_slice: bool,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        HydrationConfig::browser()
    }
}

impl HydrationConfig {
    /// Client session that lives for a whole page load
    pub fn browser() -> Self {
        HydrationConfig {
            context: ExecutionContext::Browser,
            warn_on_missing_slice: true,
        }
    }

    /// One-shot server render
    pub fn server() -> Self {
        HydrationConfig {
            context: ExecutionContext::Server,
            warn_on_missing_slice: true,
        }
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    /// Silence the missing-slice warning (payloads that hydrate only some slices)
    pub fn quiet(mut self) -> Self {
        self.warn_on_missing_slice = false;
        self
    }
}
