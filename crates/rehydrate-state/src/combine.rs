//! Combined reducer over global state
//!
//! Folds a slice reducer mapping into one reducer over the whole state
//! tree. Not a store: no subscribers, no dispatch queue.

use std::collections::BTreeMap;

use crate::Reducer;

/// Slice name → slice state
pub type GlobalState<S> = BTreeMap<String, S>;

/// One reducer per slice, applied together
pub struct CombinedReducer<R> {
    slices: BTreeMap<String, R>,
}

impl<R> CombinedReducer<R> {
    pub fn new<I, K>(slices: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
    {
        slices.into_iter().collect()
    }

    /// Get a slice reducer by name
    pub fn get(&self, name: &str) -> Option<&R> {
        self.slices.get(name)
    }

    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

impl<R, K: Into<String>> FromIterator<(K, R)> for CombinedReducer<R> {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        CombinedReducer {
            slices: iter.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }
}

/// Slices without a reducer are carried over untouched; registered slices
/// missing from the state start from `S::default()`.
impl<S, A, R> Reducer<GlobalState<S>, A> for CombinedReducer<R>
where
    S: Default + Clone,
    R: Reducer<S, A>,
{
    fn reduce(&self, state: &GlobalState<S>, action: &A) -> GlobalState<S> {
        let mut next: GlobalState<S> = state
            .iter()
            .filter(|(name, _)| !self.slices.contains_key(name.as_str()))
            .map(|(name, slice)| (name.clone(), slice.clone()))
            .collect();

        for (name, reducer) in &self.slices {
            let slice = match state.get(name) {
                Some(current) => reducer.reduce(current, action),
                None => reducer.reduce(&S::default(), action),
            };
            next.insert(name.clone(), slice);
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compose_hydrate_reducers, HydrateReducer, HydrationSession};
    use rehydrate_core::Action;
    use serde_json::{json, Value};

    type TestAction = Action<&'static str, Value>;

    fn counter(state: &Value, action: &TestAction) -> Value {
        match action.kind() {
            Some(&"increment") => json!({ "count": state["count"].as_i64().unwrap_or(0) + 1 }),
            _ => state.clone(),
        }
    }

    fn global(entries: &[(&str, Value)]) -> GlobalState<Value> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_combined_dispatch() {
        let root = CombinedReducer::new([("left", counter), ("right", counter)]);
        let state = global(&[("left", json!({ "count": 1 })), ("right", json!({ "count": 5 }))]);

        let next = root.reduce(&state, &Action::Dispatch("increment"));
        assert_eq!(next, global(&[("left", json!({ "count": 2 })), ("right", json!({ "count": 6 }))]));
    }

    #[test]
    fn test_unknown_slices_carried_and_missing_slices_defaulted() {
        let root = CombinedReducer::new([("counter", counter)]);
        let state = global(&[("router", json!({ "path": "/" }))]);

        let next = root.reduce(&state, &Action::Dispatch("increment"));
        assert_eq!(next["router"], json!({ "path": "/" }));
        assert_eq!(next["counter"], json!({ "count": 1 }));
    }

    #[test]
    fn test_hydrate_whole_tree_once() {
        let session = HydrationSession::browser();
        let wrapped: Vec<(String, HydrateReducer<_>)> = compose_hydrate_reducers(
            [("a".to_string(), counter as fn(&Value, &TestAction) -> Value), ("b".to_string(), counter)],
            &session,
        );
        let root: CombinedReducer<_> = wrapped.into_iter().collect();

        let hydrate: TestAction = Action::hydrate([
            ("a", json!({ "count": 10 })),
            ("b", json!({ "count": 20, "server": true })),
        ]);
        let state = global(&[("a", json!({ "count": 0 })), ("b", json!({ "count": 0, "local": 1 }))]);

        let hydrated = root.reduce(&state, &hydrate);
        assert_eq!(hydrated["a"], json!({ "count": 10 }));
        assert_eq!(hydrated["b"], json!({ "count": 20, "server": true, "local": 1 }));

        let evolved = root.reduce(&hydrated, &Action::Dispatch("increment"));
        let replayed = root.reduce(&evolved, &hydrate);
        assert_eq!(replayed, evolved);
    }
}
