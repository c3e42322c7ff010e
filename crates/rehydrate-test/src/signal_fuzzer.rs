//! Signal Fuzzer - Randomized signal streams against merge-once hydration
//!
//! Tests:
//! - Pass-through of ordinary signals
//! - First hydrate of a payload merges
//! - Re-dispatched payloads delegate in the browser, merge again on the server
//! - Absent and null slice entries delegate
//! - Markers are per (payload, slice)

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rehydrate_core::{
    Action, ExecutionContext, HydrationConfig, HydrationSignal, PayloadId, ShallowMerge,
};
use rehydrate_state::{
    compose_hydrate_reducers, CombinedReducer, GlobalState, HydrateReducer, HydrationSession,
    Reducer,
};
use serde_json::{json, Map, Value};

/// Signal type driven through the fuzzed reducers
pub type FuzzAction = Action<u32, Value>;

type SliceFn = fn(&Value, &FuzzAction) -> Value;

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Number of slices
    pub slice_count: usize,
    /// Number of signals to generate
    pub signal_count: usize,
    /// Probability a signal is a hydrate signal
    pub hydrate_prob: f64,
    /// Probability a hydrate signal re-dispatches an earlier payload
    pub redispatch_prob: f64,
    /// Probability a payload omits a slice
    pub omit_prob: f64,
    /// Probability a payload carries null for a slice
    pub null_prob: f64,
    /// Execution context of the fuzzed session
    pub context: ExecutionContext,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            slice_count: 4,
            signal_count: 500,
            hydrate_prob: 0.3,
            redispatch_prob: 0.5,
            omit_prob: 0.1,
            null_prob: 0.05,
            context: ExecutionContext::Browser,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            slice_count: 2,
            signal_count: 100,
            ..FuzzerConfig::default()
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            slice_count: 16,
            signal_count: 10_000,
            hydrate_prob: 0.5,
            redispatch_prob: 0.7,
            omit_prob: 0.2,
            null_prob: 0.1,
            ..FuzzerConfig::default()
        }
    }

    /// Same stream shape, one-shot server context
    pub fn server(mut self) -> Self {
        self.context = ExecutionContext::Server;
        self
    }
}

/// Outcome of a fuzzing run
#[derive(Clone, Debug, Default)]
pub struct FuzzReport {
    pub signals: u64,
    pub hydrates: u64,
    pub redispatches: u64,
    /// Slice-level merges
    pub merges: u64,
    /// Slice-level hydrate delegations
    pub delegations: u64,
    pub violations: Vec<String>,
}

impl FuzzReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Slice reducer: ordinary signals bump `local`, delegated hydrates bump `delegated`
fn fuzz_slice(state: &Value, action: &FuzzAction) -> Value {
    let mut next = match state {
        Value::Object(fields) => fields.clone(),
        _ => Map::new(),
    };
    let (field, step) = match action {
        Action::Dispatch(step) => ("local", u64::from(*step)),
        Action::Hydrate(_) => ("delegated", 1),
    };
    let current = next.get(field).and_then(Value::as_u64).unwrap_or(0);
    next.insert(field.to_string(), json!(current + step));
    Value::Object(next)
}

/// Hydration fuzzer checked against a reference model
pub struct SignalFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
    session: Arc<HydrationSession>,
    root: CombinedReducer<HydrateReducer<SliceFn>>,
    slice_names: Vec<String>,
    state: GlobalState<Value>,
    /// Reference model of merged (payload, slice) pairs
    model: HashSet<(PayloadId, String)>,
    history: Vec<FuzzAction>,
    payload_seq: u64,
}

impl SignalFuzzer {
    /// Create a new fuzzer
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let session = HydrationSession::shared(
            HydrationConfig::browser()
                .with_context(config.context)
                .quiet(),
        );

        let slice_names: Vec<String> = (0..config.slice_count)
            .map(|i| format!("slice{}", i))
            .collect();
        let reducers = slice_names
            .iter()
            .map(|name| (name.clone(), fuzz_slice as SliceFn));
        let wrapped: Vec<(String, HydrateReducer<SliceFn>)> =
            compose_hydrate_reducers(reducers, &session);

        SignalFuzzer {
            config,
            rng,
            session,
            root: wrapped.into_iter().collect(),
            slice_names,
            state: GlobalState::new(),
            model: HashSet::new(),
            history: Vec::new(),
            payload_seq: 0,
        }
    }

    pub fn session(&self) -> &Arc<HydrationSession> {
        &self.session
    }

    pub fn state(&self) -> &GlobalState<Value> {
        &self.state
    }

    /// Generate a fresh hydrate signal
    fn generate_hydrate(&mut self) -> FuzzAction {
        self.payload_seq += 1;
        let mut slices = Vec::with_capacity(self.slice_names.len());

        for name in &self.slice_names {
            if self.rng.gen_bool(self.config.omit_prob) {
                continue;
            }
            let incoming = if self.rng.gen_bool(self.config.null_prob) {
                Value::Null
            } else {
                json!({ "server": self.rng.gen::<u32>(), "payload": self.payload_seq })
            };
            slices.push((name.clone(), incoming));
        }

        Action::hydrate(slices)
    }

    /// Pick the next signal; returns it with whether it is a re-dispatch
    fn generate_signal(&mut self) -> (FuzzAction, bool) {
        if !self.rng.gen_bool(self.config.hydrate_prob) {
            return (Action::Dispatch(self.rng.gen_range(1..10)), false);
        }

        if !self.history.is_empty() && self.rng.gen_bool(self.config.redispatch_prob) {
            let idx = self.rng.gen_range(0..self.history.len());
            return (self.history[idx].clone(), true);
        }

        let action = self.generate_hydrate();
        self.history.push(action.clone());
        (action, false)
    }

    /// Expected next state of one slice under the reference model
    fn expected_slice(&mut self, name: &str, current: &Value, action: &FuzzAction) -> (Value, bool) {
        let Some(payload) = action.hydration() else {
            return (fuzz_slice(current, action), false);
        };

        match payload.slice(name) {
            Some(incoming) if !incoming.is_absent() => {
                let key = (payload.id(), name.to_string());
                if self.model.contains(&key) {
                    (fuzz_slice(current, action), false)
                } else {
                    if self.config.context.persists_markers() {
                        self.model.insert(key);
                    }
                    (current.shallow_merge(incoming), true)
                }
            }
            _ => (fuzz_slice(current, action), false),
        }
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> FuzzReport {
        let mut report = FuzzReport::default();

        for step in 0..self.config.signal_count {
            let (action, redispatch) = self.generate_signal();
            report.signals += 1;
            if action.is_hydrate() {
                report.hydrates += 1;
            }
            if redispatch {
                report.redispatches += 1;
            }

            let next = self.root.reduce(&self.state, &action);

            let names = self.slice_names.clone();
            for name in &names {
                let current = self.state.get(name).cloned().unwrap_or_default();
                let (expected, merged) = self.expected_slice(name, &current, &action);

                if action.is_hydrate() {
                    if merged {
                        report.merges += 1;
                    } else {
                        report.delegations += 1;
                    }
                }

                if next.get(name) != Some(&expected) {
                    report.violations.push(format!(
                        "step {}: slice {} expected {} got {:?}",
                        step,
                        name,
                        expected,
                        next.get(name)
                    ));
                }
            }

            self.state = next;
        }

        tracing::debug!(
            signals = report.signals,
            merges = report.merges,
            delegations = report.delegations,
            violations = report.violations.len(),
            "fuzz run complete"
        );
        report
    }
}
