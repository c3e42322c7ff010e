//! Execution context - where reducers are running
//!
//! The context is injected into a hydration session, never probed from
//! ambient globals.

use std::fmt;
use std::str::FromStr;

use crate::RehydrateError;

/// Where a hydration session lives
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionContext {
    /// Long-lived client session; markers stay in memory for the page load
    #[default]
    Browser,
    /// One-shot server render; every render starts fresh
    Server,
}

impl ExecutionContext {
    /// Whether reconciliation markers survive between dispatches
    #[inline]
    pub fn persists_markers(self) -> bool {
        matches!(self, ExecutionContext::Browser)
    }

    pub fn name(self) -> &'static str {
        match self {
            ExecutionContext::Browser => "browser",
            ExecutionContext::Server => "server",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExecutionContext {
    type Err = RehydrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" | "client" | "csr" => Ok(ExecutionContext::Browser),
            "server" | "ssr" => Ok(ExecutionContext::Server),
            _ => Err(RehydrateError::UnknownContext(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_browser_persists_markers() {
        assert!(ExecutionContext::Browser.persists_markers());
        assert!(!ExecutionContext::Server.persists_markers());
    }

    #[test]
    fn test_parse_context() {
        assert_eq!("Browser".parse::<ExecutionContext>().unwrap(), ExecutionContext::Browser);
        assert_eq!(" csr ".parse::<ExecutionContext>().unwrap(), ExecutionContext::Browser);
        assert_eq!("SSR".parse::<ExecutionContext>().unwrap(), ExecutionContext::Server);

        let err = "edge".parse::<ExecutionContext>().unwrap_err();
        assert!(matches!(err, RehydrateError::UnknownContext(ref s) if s == "edge"));
    }
}
