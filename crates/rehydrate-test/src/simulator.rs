//! Page load simulator
//!
//! Plays both sides of a server-rendered page:
//! - A one-shot server render reduces signals and serializes its state
//!   as a hydrate signal
//! - A long-lived client session parses that JSON, hydrates, evolves its
//!   own state and may see the same hydrate signal again on navigation

use std::sync::Arc;

use rehydrate_core::{HydratePayload, HydrationConfig, JsonAction, RawAction, RehydrateError};
use rehydrate_state::{
    compose_hydrate_reducers, CombinedReducer, GlobalState, HydrateReducer, HydrationSession,
    Reducer,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

type PageFn = fn(&Value, &JsonAction) -> Value;

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Signal rejected: {0}")]
    Signal(#[from] RehydrateError),

    #[error("No hydrate signal received yet")]
    NothingToReplay,
}

pub type SimulationResult<T> = Result<T, SimulationError>;

fn fields(state: &Value) -> Map<String, Value> {
    match state {
        Value::Object(fields) => fields.clone(),
        _ => Map::new(),
    }
}

/// `counter/increment` and `counter/add` with a numeric payload
pub fn counter_slice(state: &Value, action: &JsonAction) -> Value {
    let Some(raw) = action.kind() else {
        return state.clone();
    };
    let step = match raw.kind.as_str() {
        "counter/increment" => 1,
        "counter/add" => raw.payload.as_ref().and_then(Value::as_i64).unwrap_or(0),
        _ => return state.clone(),
    };
    let mut next = fields(state);
    let count = next.get("count").and_then(Value::as_i64).unwrap_or(0);
    next.insert("count".into(), json!(count + step));
    Value::Object(next)
}

/// `user/login` with a name payload, `user/logout`
pub fn user_slice(state: &Value, action: &JsonAction) -> Value {
    let Some(raw) = action.kind() else {
        return state.clone();
    };
    let mut next = fields(state);
    match raw.kind.as_str() {
        "user/login" => {
            next.insert("name".into(), raw.payload.clone().unwrap_or(Value::Null));
            next.insert("signed_in".into(), json!(true));
        }
        "user/logout" => {
            next.remove("name");
            next.insert("signed_in".into(), json!(false));
        }
        _ => return state.clone(),
    }
    Value::Object(next)
}

/// Slice reducers of the simulated page
pub fn page_reducers() -> Vec<(String, PageFn)> {
    vec![
        ("counter".to_string(), counter_slice as PageFn),
        ("user".to_string(), user_slice as PageFn),
    ]
}

fn page_root(session: &Arc<HydrationSession>) -> CombinedReducer<HydrateReducer<PageFn>> {
    let wrapped: Vec<(String, HydrateReducer<PageFn>)> =
        compose_hydrate_reducers(page_reducers(), session);
    wrapped.into_iter().collect()
}

/// One server render
pub struct ServerRender {
    session: Arc<HydrationSession>,
    root: CombinedReducer<HydrateReducer<PageFn>>,
    state: GlobalState<Value>,
}

impl ServerRender {
    pub fn new() -> Self {
        let session = HydrationSession::shared(HydrationConfig::server().quiet());
        let root = page_root(&session);
        ServerRender {
            session,
            root,
            state: GlobalState::new(),
        }
    }

    pub fn dispatch(&mut self, action: RawAction) -> SimulationResult<()> {
        let action = JsonAction::try_from(action)?;
        self.state = self.root.reduce(&self.state, &action);
        Ok(())
    }

    pub fn state(&self) -> &GlobalState<Value> {
        &self.state
    }

    pub fn session(&self) -> &Arc<HydrationSession> {
        &self.session
    }

    /// Rendered state as the JSON hydrate signal shipped to the client
    pub fn hydrate_signal(&self) -> SimulationResult<String> {
        let payload: HydratePayload<Value> = self
            .state
            .iter()
            .map(|(name, slice)| (name.clone(), slice.clone()))
            .collect();
        Ok(RawAction::hydrate(&payload)?.to_json()?)
    }
}

impl Default for ServerRender {
    fn default() -> Self {
        Self::new()
    }
}

/// A browser page load
pub struct ClientSession {
    session: Arc<HydrationSession>,
    root: CombinedReducer<HydrateReducer<PageFn>>,
    state: GlobalState<Value>,
    last_hydrate: Option<JsonAction>,
}

impl ClientSession {
    pub fn new() -> Self {
        let session = HydrationSession::shared(HydrationConfig::browser().quiet());
        let root = page_root(&session);
        ClientSession {
            session,
            root,
            state: GlobalState::new(),
            last_hydrate: None,
        }
    }

    /// Receive a JSON signal from the server
    pub fn receive(&mut self, text: &str) -> SimulationResult<()> {
        let action = JsonAction::try_from(RawAction::from_json(text)?)?;
        self.apply(action);
        Ok(())
    }

    pub fn dispatch(&mut self, action: RawAction) -> SimulationResult<()> {
        let action = JsonAction::try_from(action)?;
        self.apply(action);
        Ok(())
    }

    /// Client-side navigation back into the page re-dispatches the same
    /// hydrate signal object
    pub fn replay_hydrate(&mut self) -> SimulationResult<()> {
        let action = self
            .last_hydrate
            .clone()
            .ok_or(SimulationError::NothingToReplay)?;
        self.apply(action);
        Ok(())
    }

    /// Full page reload: fresh state, fresh markers
    pub fn reload(&mut self) {
        self.session.reset();
        self.state = GlobalState::new();
        self.last_hydrate = None;
    }

    pub fn state(&self) -> &GlobalState<Value> {
        &self.state
    }

    pub fn session(&self) -> &Arc<HydrationSession> {
        &self.session
    }

    fn apply(&mut self, action: JsonAction) {
        self.state = self.root.reduce(&self.state, &action);
        if let JsonAction::Hydrate(_) = action {
            self.last_hydrate = Some(action);
        }
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}
