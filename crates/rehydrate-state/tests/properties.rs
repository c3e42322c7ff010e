//! Property tests for hydration reducers

use std::collections::{BTreeMap, HashMap};

use proptest::prelude::*;
use rehydrate_core::{Action, HydrationConfig};
use rehydrate_state::{
    compose_hydrate_reducer, compose_hydrate_reducers, HydrateReducer, HydrationSession, Reducer,
};
use serde_json::{json, Map, Value};

type TestAction = Action<String, Value>;

/// Slice reducer that records the last signal it saw
fn recorder(state: &Value, action: &TestAction) -> Value {
    let mut next = match state {
        Value::Object(fields) => fields.clone(),
        _ => Map::new(),
    };
    let seen = match action {
        Action::Dispatch(kind) => json!(kind),
        Action::Hydrate(payload) => json!(format!("hydrate:{}", payload.len())),
    };
    next.insert("seen".into(), seen);
    Value::Object(next)
}

fn slice_state() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-d]", 0i64..50, 0..5).prop_map(|fields| {
        Value::Object(fields.into_iter().map(|(k, v)| (k, json!(v))).collect())
    })
}

fn quiet_browser() -> std::sync::Arc<HydrationSession> {
    HydrationSession::shared(HydrationConfig::browser().quiet())
}

proptest! {
    #[test]
    fn prop_pass_through(
        name in "[a-z]{1,8}",
        state in slice_state(),
        kind in "[a-z/]{1,12}",
    ) {
        let session = quiet_browser();
        let reducer = compose_hydrate_reducer(name, recorder, &session);
        let action: TestAction = Action::Dispatch(kind);

        prop_assert_eq!(reducer.reduce(&state, &action), recorder(&state, &action));
        prop_assert_eq!(session.marked_count(), 0);
    }

    #[test]
    fn prop_first_merge_then_delegate(
        current in slice_state(),
        incoming in slice_state(),
        later in slice_state(),
    ) {
        let session = quiet_browser();
        let reducer = compose_hydrate_reducer("slice", recorder, &session);
        let action: TestAction = Action::hydrate([("slice", incoming.clone())]);

        let merged = reducer.reduce(&current, &action);
        let (Value::Object(merged_fields), Value::Object(current_fields), Value::Object(incoming_fields)) =
            (&merged, &current, &incoming) else {
            unreachable!("slice states are objects");
        };
        for (key, value) in incoming_fields {
            prop_assert_eq!(merged_fields.get(key), Some(value));
        }
        for (key, value) in current_fields {
            if !incoming_fields.contains_key(key) {
                prop_assert_eq!(merged_fields.get(key), Some(value));
            }
        }

        prop_assert_eq!(reducer.reduce(&later, &action), recorder(&later, &action));
    }

    #[test]
    fn prop_server_always_merges(
        current in slice_state(),
        incoming in slice_state(),
        repeats in 1usize..5,
    ) {
        let session = HydrationSession::shared(HydrationConfig::server().quiet());
        let reducer = compose_hydrate_reducer("slice", recorder, &session);
        let action: TestAction = Action::hydrate([("slice", incoming.clone())]);

        let expected = rehydrate_core::ShallowMerge::shallow_merge(&current, &incoming);
        for _ in 0..repeats {
            prop_assert_eq!(reducer.reduce(&current, &action), expected.clone());
        }
        prop_assert_eq!(session.marked_count(), 0);
    }

    #[test]
    fn prop_composer_preserves_keys(names in prop::collection::hash_set("[a-z]{1,6}", 0..8)) {
        let session = quiet_browser();
        let reducers: HashMap<String, fn(&Value, &TestAction) -> Value> =
            names.iter().map(|n| (n.clone(), recorder as fn(&Value, &TestAction) -> Value)).collect();

        let wrapped: BTreeMap<String, HydrateReducer<_>> = compose_hydrate_reducers(reducers, &session);

        prop_assert_eq!(wrapped.len(), names.len());
        for name in &names {
            prop_assert!(wrapped.contains_key(name));
            let state = json!({ "n": 1 });
            let action: TestAction = Action::Dispatch(format!("{}/ping", name));
            prop_assert_eq!(wrapped[name].reduce(&state, &action), recorder(&state, &action));
        }
    }
}
