//! Rehydrate SSR Demo
//!
//! Walks one page load end to end:
//! - Server render builds state and ships it as a hydrate signal
//! - Browser session hydrates once
//! - Client-side navigation replays the signal without stomping local state
//!
//! Usage: `ssr-demo [--context browser|server] [--json]`
//! Log level comes from `RUST_LOG` (default `debug`).

use std::env;
use std::sync::Arc;

use rehydrate_core::{ExecutionContext, HydratePayload, HydrationConfig, JsonAction, RawAction};
use rehydrate_state::{
    compose_hydrate_reducers, CombinedReducer, GlobalState, HydrateReducer, HydrationSession,
    Reducer,
};
use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

type SliceFn = fn(&Value, &JsonAction) -> Value;

fn todos(state: &Value, action: &JsonAction) -> Value {
    let Some(raw) = action.kind() else {
        return state.clone();
    };
    if raw.kind != "todos/add" {
        return state.clone();
    }
    let mut items = state["items"].as_array().cloned().unwrap_or_default();
    items.push(raw.payload.clone().unwrap_or(Value::Null));
    json!({ "items": items })
}

fn theme(state: &Value, action: &JsonAction) -> Value {
    let Some(raw) = action.kind() else {
        return state.clone();
    };
    if raw.kind != "theme/toggle" {
        return state.clone();
    }
    let mut next = match state {
        Value::Object(fields) => fields.clone(),
        _ => Map::new(),
    };
    let dark = next.get("dark").and_then(Value::as_bool).unwrap_or(false);
    next.insert("dark".into(), json!(!dark));
    Value::Object(next)
}

fn store_root(session: &Arc<HydrationSession>) -> CombinedReducer<HydrateReducer<SliceFn>> {
    let reducers = [
        ("todos".to_string(), todos as SliceFn),
        ("theme".to_string(), theme as SliceFn),
    ];
    let wrapped: Vec<(String, HydrateReducer<SliceFn>)> = compose_hydrate_reducers(reducers, session);
    wrapped.into_iter().collect()
}

fn show(label: &str, state: &GlobalState<Value>) {
    println!("   {:<28} {}", label, json!(state));
}

fn init_tracing(json_output: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json_output {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let json_output = args.iter().any(|a| a == "--json");
    let client_context: ExecutionContext = match args.iter().position(|a| a == "--context") {
        Some(i) => args.get(i + 1).map(String::as_str).unwrap_or("browser").parse()?,
        None => ExecutionContext::Browser,
    };

    init_tracing(json_output);

    println!("=== Rehydrate SSR Demo ===\n");

    // 1. Server render
    println!("1. Server render");
    let server_session = HydrationSession::shared(HydrationConfig::server());
    let server = store_root(&server_session);
    let mut server_state: GlobalState<Value> = GlobalState::new();
    for raw in [
        RawAction::new("todos/add", Some(json!("write docs"))),
        RawAction::new("theme/toggle", None),
    ] {
        server_state = server.reduce(&server_state, &JsonAction::try_from(raw)?);
    }
    show("server state:", &server_state);

    let payload: HydratePayload<Value> = server_state.clone().into_iter().collect();
    let signal = RawAction::hydrate(&payload)?.to_json()?;
    println!("   shipped signal: {}", signal);

    // 2. Client session
    println!("\n2. Client session ({})", client_context);
    let client_session = HydrationSession::shared(HydrationConfig::browser().with_context(client_context));
    let client = store_root(&client_session);
    let init = JsonAction::try_from(RawAction::new("@@INIT", None))?;
    let mut state = client.reduce(&GlobalState::<Value>::new(), &init);
    show("initial state:", &state);

    let hydrate = JsonAction::try_from(RawAction::from_json(&signal)?)?;
    state = client.reduce(&state, &hydrate);
    show("after hydrate:", &state);

    state = client.reduce(&state, &JsonAction::try_from(RawAction::new("todos/add", Some(json!("ship it"))))?);
    show("after local todo:", &state);

    // 3. Navigation re-enters the page with the same hydrate signal
    println!("\n3. Navigation replays the hydrate signal");
    state = client.reduce(&state, &hydrate);
    show("after replay:", &state);

    info!(
        context = %client_context,
        markers = client_session.marked_count(),
        todos = state["todos"]["items"].as_array().map_or(0, Vec::len),
        "demo complete"
    );
    Ok(())
}
