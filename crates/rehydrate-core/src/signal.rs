//! Signals and hydrate payloads
//!
//! A signal is a tagged record `{ type, payload? }`. The reserved
//! [`HYDRATE`] type carries server-computed state for every slice; every
//! other type belongs to the slice reducers.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{PayloadId, RehydrateError, RehydrateResult};

/// Reserved signal type of the hydrate signal
pub const HYDRATE: &str = "__NEXT_REDUX_WRAPPER_HYDRATE__";

/// Server-computed slice states carried by a hydrate signal
///
/// The payload id is its identity: clones share it, equality and
/// serialization ignore it.
#[derive(Clone, Debug)]
pub struct HydratePayload<S> {
    id: PayloadId,
    slices: BTreeMap<String, S>,
}

impl<S> HydratePayload<S> {
    /// Build a payload with a fresh identity
    pub fn new(slices: BTreeMap<String, S>) -> Self {
        HydratePayload {
            id: PayloadId::next(),
            slices,
        }
    }

    pub fn id(&self) -> PayloadId {
        self.id
    }

    /// Incoming state for a slice
    #[inline]
    pub fn slice(&self, name: &str) -> Option<&S> {
        self.slices.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    pub fn slices(&self) -> &BTreeMap<String, S> {
        &self.slices
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

    pub fn into_slices(self) -> BTreeMap<String, S> {
        self.slices
    }
}

impl<S: Serialize> HydratePayload<S> {
    /// JSON object of slice states
    pub fn to_json(&self) -> RehydrateResult<Value> {
        Ok(serde_json::to_value(&self.slices)?)
    }
}

impl<S, K: Into<String>> FromIterator<(K, S)> for HydratePayload<S> {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        HydratePayload::new(iter.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }
}

impl<S: PartialEq> PartialEq for HydratePayload<S> {
    fn eq(&self, other: &Self) -> bool {
        self.slices == other.slices
    }
}

impl<S: Serialize> Serialize for HydratePayload<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        self.slices.serialize(serializer)
    }
}

impl<'de, S: Deserialize<'de>> Deserialize<'de> for HydratePayload<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, S>::deserialize(deserializer).map(HydratePayload::new)
    }
}

/// Anything a hydration-aware reducer can receive
pub trait HydrationSignal<S> {
    /// The payload when this is the hydrate signal, `None` otherwise
    fn hydration(&self) -> Option<&HydratePayload<S>>;

    fn is_hydrate(&self) -> bool {
        self.hydration().is_some()
    }
}

/// Signal with a typed application action
#[derive(Clone, Debug, PartialEq)]
pub enum Action<A, S> {
    /// Reconciliation signal carrying server state
    Hydrate(HydratePayload<S>),
    /// Any other signal, owned by the slice reducers
    Dispatch(A),
}

impl<A, S> Action<A, S> {
    /// Hydrate signal with a fresh payload
    pub fn hydrate<I, K>(slices: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
    {
        Action::Hydrate(slices.into_iter().collect())
    }

    pub fn payload(&self) -> Option<&HydratePayload<S>> {
        match self {
            Action::Hydrate(payload) => Some(payload),
            Action::Dispatch(_) => None,
        }
    }

    pub fn kind(&self) -> Option<&A> {
        match self {
            Action::Hydrate(_) => None,
            Action::Dispatch(action) => Some(action),
        }
    }
}

impl<A, S> HydrationSignal<S> for Action<A, S> {
    #[inline]
    fn hydration(&self) -> Option<&HydratePayload<S>> {
        self.payload()
    }
}

/// Untyped `{ type, payload? }` signal as it travels between processes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl RawAction {
    pub fn new(kind: impl Into<String>, payload: Option<Value>) -> Self {
        RawAction {
            kind: kind.into(),
            payload,
        }
    }

    /// Hydrate signal for a payload; the payload identity is not carried
    pub fn hydrate<S: Serialize>(payload: &HydratePayload<S>) -> RehydrateResult<Self> {
        Ok(RawAction::new(HYDRATE, Some(payload.to_json()?)))
    }

    pub fn from_json(text: &str) -> RehydrateResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> RehydrateResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[inline]
    pub fn is_hydrate(&self) -> bool {
        self.kind == HYDRATE
    }
}

/// Signal decoded from JSON
pub type JsonAction = Action<RawAction, Value>;

/// Each conversion of a hydrate signal yields a payload with a fresh identity
impl TryFrom<RawAction> for JsonAction {
    type Error = RehydrateError;

    fn try_from(raw: RawAction) -> RehydrateResult<Self> {
        if !raw.is_hydrate() {
            return Ok(Action::Dispatch(raw));
        }

        match raw.payload {
            Some(Value::Object(fields)) => Ok(Action::Hydrate(fields.into_iter().collect())),
            Some(other) => Err(RehydrateError::InvalidPayload(value_kind(&other))),
            None => Err(RehydrateError::MissingPayload),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
