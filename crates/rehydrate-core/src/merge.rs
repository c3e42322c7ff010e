//! Shallow merge of slice states
//!
//! Hydration overlays server state on client state one level deep:
//! every top-level field of the incoming state replaces the field of the
//! same name, fields only the current state has are kept, nothing nested
//! is merged.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde_json::{Map, Value};

/// Slice state that can absorb incoming server state
pub trait ShallowMerge: Sized {
    /// New state with `incoming` overlaid on `self`; neither input changes
    fn shallow_merge(&self, incoming: &Self) -> Self;

    /// True when this value carries nothing to hydrate from
    fn is_absent(&self) -> bool {
        false
    }
}

/// Object spread semantics: a non-object side contributes no fields, so
/// the result is always an object. `null` is absent.
impl ShallowMerge for Value {
    fn shallow_merge(&self, incoming: &Self) -> Self {
        let mut merged = match self {
            Value::Object(fields) => fields.clone(),
            _ => Map::new(),
        };
        if let Value::Object(fields) = incoming {
            for (key, value) in fields {
                merged.insert(key.clone(), value.clone());
            }
        }
        Value::Object(merged)
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl ShallowMerge for Map<String, Value> {
    fn shallow_merge(&self, incoming: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in incoming {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K, V, H> ShallowMerge for HashMap<K, V, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    H: BuildHasher + Clone,
{
    fn shallow_merge(&self, incoming: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

impl<K, V> ShallowMerge for BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn shallow_merge(&self, incoming: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

impl<T> ShallowMerge for Option<T>
where
    T: ShallowMerge + Clone,
{
    fn shallow_merge(&self, incoming: &Self) -> Self {
        match (self, incoming) {
            (Some(current), Some(incoming)) => Some(current.shallow_merge(incoming)),
            (None, Some(incoming)) => Some(incoming.clone()),
            (current, None) => current.clone(),
        }
    }

    fn is_absent(&self) -> bool {
        match self {
            Some(value) => value.is_absent(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_incoming_fields_win() {
        let current = json!({ "a": 1, "keep": true });
        let incoming = json!({ "a": 2, "b": 3 });

        let merged = current.shallow_merge(&incoming);
        assert_eq!(merged, json!({ "a": 2, "b": 3, "keep": true }));
        // inputs untouched
        assert_eq!(current, json!({ "a": 1, "keep": true }));
        assert_eq!(incoming, json!({ "a": 2, "b": 3 }));
    }

    #[test]
    fn test_merge_is_shallow() {
        let current = json!({ "user": { "name": "ada", "age": 36 } });
        let incoming = json!({ "user": { "name": "grace" } });

        let merged = current.shallow_merge(&incoming);
        assert_eq!(merged, json!({ "user": { "name": "grace" } }));
    }

    #[test]
    fn test_non_object_sides() {
        assert_eq!(json!(5).shallow_merge(&json!({ "a": 1 })), json!({ "a": 1 }));
        assert_eq!(json!({ "a": 1 }).shallow_merge(&json!("text")), json!({ "a": 1 }));
        assert_eq!(Value::Null.shallow_merge(&Value::Null), json!({}));
    }

    #[test]
    fn test_absence() {
        assert!(Value::Null.is_absent());
        assert!(!json!({}).is_absent());
        assert!(None::<Value>.is_absent());
        assert!(Some(Value::Null).is_absent());
        assert!(!Some(json!({})).is_absent());
    }

    #[test]
    fn test_option_merge() {
        let current: Option<BTreeMap<&str, i32>> = None;
        let incoming = Some(BTreeMap::from([("a", 1)]));
        assert_eq!(current.shallow_merge(&incoming), incoming);
        assert_eq!(incoming.shallow_merge(&None), incoming);
    }

    #[test]
    fn test_hash_map_merge() {
        let current = HashMap::from([("a", 1), ("b", 2)]);
        let incoming = HashMap::from([("b", 20), ("c", 30)]);
        let merged = current.shallow_merge(&incoming);
        assert_eq!(merged, HashMap::from([("a", 1), ("b", 20), ("c", 30)]));
    }

    proptest! {
        #[test]
        fn prop_btree_merge_is_key_union_with_incoming_winning(
            current in prop::collection::btree_map("[a-e]", 0i64..100, 0..6),
            incoming in prop::collection::btree_map("[a-e]", 0i64..100, 0..6),
        ) {
            let merged = current.shallow_merge(&incoming);

            for (key, value) in &incoming {
                prop_assert_eq!(merged.get(key), Some(value));
            }
            for (key, value) in &current {
                if !incoming.contains_key(key) {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
            prop_assert!(merged.keys().all(|k| current.contains_key(k) || incoming.contains_key(k)));
        }
    }
}
