//! Hydration session - reconciliation markers for one execution context
//!
//! A marker records that one slice of one hydrate payload has been merged.
//! Markers live beside the state, keyed by payload identity, so they never
//! show up in slice state, in equality or in anything serialized.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use rehydrate_core::{ExecutionContext, HydrationConfig, PayloadId};

/// Set of (payload, slice) pairs already merged
#[derive(Debug, Default)]
pub struct MarkerLedger {
    marked: HashMap<PayloadId, HashSet<String>>,
}

impl MarkerLedger {
    pub fn new() -> Self {
        MarkerLedger::default()
    }

    /// Check if a slice of a payload has been merged
    #[inline]
    pub fn is_marked(&self, payload: PayloadId, slice: &str) -> bool {
        self.marked
            .get(&payload)
            .is_some_and(|slices| slices.contains(slice))
    }

    /// Mark a slice of a payload; returns false if it was already marked
    pub fn mark(&mut self, payload: PayloadId, slice: &str) -> bool {
        let slices = self.marked.entry(payload).or_default();
        if slices.contains(slice) {
            return false;
        }
        slices.insert(slice.to_string())
    }

    /// Drop every marker of a payload, returning how many there were
    pub fn forget(&mut self, payload: PayloadId) -> usize {
        self.marked.remove(&payload).map_or(0, |slices| slices.len())
    }

    pub fn clear(&mut self) {
        self.marked.clear();
    }

    /// Number of marked (payload, slice) pairs
    pub fn len(&self) -> usize {
        self.marked.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.values().all(HashSet::is_empty)
    }
}

/// One execution context's hydration state
///
/// In the browser the session lives for the page load and is shared by
/// every slice reconciler of the store. On the server each render gets a
/// fresh session and nothing is ever marked.
#[derive(Debug)]
pub struct HydrationSession {
    config: HydrationConfig,
    ledger: Mutex<MarkerLedger>,
}

impl HydrationSession {
    pub fn new(config: HydrationConfig) -> Self {
        HydrationSession {
            config,
            ledger: Mutex::new(MarkerLedger::new()),
        }
    }

    /// Shared session, ready to hand to reducers
    pub fn shared(config: HydrationConfig) -> Arc<Self> {
        Arc::new(HydrationSession::new(config))
    }

    pub fn browser() -> Arc<Self> {
        HydrationSession::shared(HydrationConfig::browser())
    }

    pub fn server() -> Arc<Self> {
        HydrationSession::shared(HydrationConfig::server())
    }

    pub fn config(&self) -> &HydrationConfig {
        &self.config
    }

    #[inline]
    pub fn context(&self) -> ExecutionContext {
        self.config.context
    }

    #[inline]
    pub fn is_marked(&self, payload: PayloadId, slice: &str) -> bool {
        self.ledger.lock().is_marked(payload, slice)
    }

    pub fn mark(&self, payload: PayloadId, slice: &str) -> bool {
        self.ledger.lock().mark(payload, slice)
    }

    /// Release a payload's markers once it can no longer be dispatched
    pub fn forget(&self, payload: PayloadId) -> usize {
        self.ledger.lock().forget(payload)
    }

    /// Start over, as on a full page reload
    pub fn reset(&self) {
        self.ledger.lock().clear();
    }

    pub fn marked_count(&self) -> usize {
        self.ledger.lock().len()
    }
}

impl Default for HydrationSession {
    fn default() -> Self {
        HydrationSession::new(HydrationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_marks_per_slice() {
        let mut ledger = MarkerLedger::new();
        let payload = PayloadId::next();

        assert!(!ledger.is_marked(payload, "todos"));
        assert!(ledger.mark(payload, "todos"));
        assert!(!ledger.mark(payload, "todos"));

        assert!(ledger.is_marked(payload, "todos"));
        assert!(!ledger.is_marked(payload, "user"));
        assert!(!ledger.is_marked(PayloadId::next(), "todos"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ledger_forget_and_clear() {
        let mut ledger = MarkerLedger::new();
        let first = PayloadId::next();
        let second = PayloadId::next();

        ledger.mark(first, "a");
        ledger.mark(first, "b");
        ledger.mark(second, "a");

        assert_eq!(ledger.forget(first), 2);
        assert_eq!(ledger.forget(first), 0);
        assert!(ledger.is_marked(second, "a"));

        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_session_reset() {
        let session = HydrationSession::browser();
        let payload = PayloadId::next();

        session.mark(payload, "counter");
        assert_eq!(session.marked_count(), 1);
        assert_eq!(session.context(), ExecutionContext::Browser);

        session.reset();
        assert!(!session.is_marked(payload, "counter"));
        assert_eq!(session.marked_count(), 0);
    }
}
