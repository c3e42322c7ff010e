//! Reducer set composer

use std::sync::Arc;

use crate::{HydrateReducer, HydrationSession};

/// Wrap every slice reducer of a mapping with merge-once hydration
///
/// Keys come out exactly as they went in; each value is the slice
/// reconciler for that key. Collect into whatever mapping the store takes.
///
/// ```rust
/// use std::collections::HashMap;
/// use rehydrate_core::Action;
/// use rehydrate_state::{compose_hydrate_reducers, HydrateReducer, HydrationSession};
///
/// type Act = Action<(), i64>;
/// let reducers: HashMap<String, fn(&i64, &Act) -> i64> = HashMap::new();
///
/// let session = HydrationSession::browser();
/// let wrapped: HashMap<String, HydrateReducer<_>> = compose_hydrate_reducers(reducers, &session);
/// assert!(wrapped.is_empty());
/// ```
pub fn compose_hydrate_reducers<I, K, R, M>(reducers: I, session: &Arc<HydrationSession>) -> M
where
    I: IntoIterator<Item = (K, R)>,
    K: AsRef<str>,
    M: FromIterator<(K, HydrateReducer<R>)>,
{
    reducers
        .into_iter()
        .map(|(name, reducer)| {
            let wrapped = HydrateReducer::new(name.as_ref(), reducer, Arc::clone(session));
            (name, wrapped)
        })
        .collect()
}
