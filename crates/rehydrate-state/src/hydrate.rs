//! Slice reconciler - merge server state into a slice exactly once
//!
//! Server-rendered pages deliver authoritative initial state once. Any
//! later hydrate signal carrying the same payload (client-side navigation
//! re-entering a page, for instance) must not stomp client state that has
//! moved on, so after the first merge the signal goes to the slice reducer
//! like any other.
//!
//! Decision per signal:
//!
//! ```text
//! not hydrate                       → wrapped reducer
//! hydrate, no state for this slice  → wrapped reducer
//! hydrate, slice already marked     → wrapped reducer
//! hydrate, first time               → mark (browser only), shallow merge
//! ```

use std::sync::Arc;

use rehydrate_core::{HydratePayload, HydrationSignal, ShallowMerge};
use tracing::{debug, warn};

use crate::{HydrationSession, Reducer};

/// Hydration-aware wrapper around one slice reducer
pub struct HydrateReducer<R> {
    /// Slice name, the key into hydrate payloads
    name: String,
    /// Wrapped slice reducer
    inner: R,
    /// Session holding the reconciliation markers
    session: Arc<HydrationSession>,
}

impl<R> HydrateReducer<R> {
    pub fn new(name: impl Into<String>, inner: R, session: Arc<HydrationSession>) -> Self {
        HydrateReducer {
            name: name.into(),
            inner,
            session,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn session(&self) -> &Arc<HydrationSession> {
        &self.session
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Merged state on a first hydration, `None` when the signal should go
    /// to the wrapped reducer instead
    fn reconcile<S: ShallowMerge>(&self, state: &S, payload: &HydratePayload<S>) -> Option<S> {
        let incoming = match payload.slice(&self.name) {
            Some(incoming) if !incoming.is_absent() => incoming,
            _ => {
                if self.session.config().warn_on_missing_slice {
                    warn!(
                        slice = %self.name,
                        payload = %payload.id(),
                        "hydrate payload carries no state for slice, delegating"
                    );
                }
                return None;
            }
        };

        if self.session.is_marked(payload.id(), &self.name) {
            debug!(
                slice = %self.name,
                payload = %payload.id(),
                "slice already hydrated from this payload, delegating"
            );
            return None;
        }

        let context = self.session.context();
        if context.persists_markers() {
            self.session.mark(payload.id(), &self.name);
        }

        debug!(
            slice = %self.name,
            payload = %payload.id(),
            context = %context,
            "hydrating slice from server state"
        );
        Some(state.shallow_merge(incoming))
    }
}

impl<S, A, R> Reducer<S, A> for HydrateReducer<R>
where
    S: ShallowMerge,
    A: HydrationSignal<S>,
    R: Reducer<S, A>,
{
    fn reduce(&self, state: &S, action: &A) -> S {
        let Some(payload) = action.hydration() else {
            return self.inner.reduce(state, action);
        };

        match self.reconcile(state, payload) {
            Some(merged) => merged,
            None => self.inner.reduce(state, action),
        }
    }
}

/// Wrap one slice reducer with merge-once hydration
pub fn compose_hydrate_reducer<R>(
    name: impl Into<String>,
    reducer: R,
    session: &Arc<HydrationSession>,
) -> HydrateReducer<R> {
    HydrateReducer::new(name, reducer, Arc::clone(session))
}
