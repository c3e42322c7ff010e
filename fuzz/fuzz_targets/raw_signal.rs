//! Arbitrary bytes as JSON signals through hydration reducers
//!
//! Parsing may reject input; reducing must never panic, and a hydrate
//! signal replayed in the browser must leave state untouched.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rehydrate_core::{HydrationConfig, HydrationSignal, JsonAction, RawAction};
use rehydrate_state::{
    compose_hydrate_reducers, CombinedReducer, GlobalState, HydrateReducer, HydrationSession,
    Reducer,
};
use serde_json::Value;

type SliceFn = fn(&Value, &JsonAction) -> Value;

fn keep(state: &Value, _: &JsonAction) -> Value {
    state.clone()
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(raw) = RawAction::from_json(text) else {
        return;
    };
    let Ok(action) = JsonAction::try_from(raw) else {
        return;
    };

    let session = HydrationSession::shared(HydrationConfig::browser().quiet());
    let wrapped: Vec<(String, HydrateReducer<SliceFn>)> = compose_hydrate_reducers(
        [
            ("a".to_string(), keep as SliceFn),
            ("b".to_string(), keep as SliceFn),
        ],
        &session,
    );
    let root: CombinedReducer<_> = wrapped.into_iter().collect();

    let first = root.reduce(&GlobalState::<Value>::new(), &action);
    let second = root.reduce(&first, &action);
    if action.is_hydrate() {
        assert_eq!(first, second);
    }
});
