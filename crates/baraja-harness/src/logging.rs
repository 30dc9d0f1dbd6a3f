#![forbid(unsafe_code)]

//! Test logging.
//!
//! [`init_test_logging`] installs a global `fmt` subscriber filtered by
//! `RUST_LOG`. [`with_captured_events`] runs a closure under a scoped
//! subscriber and returns every event it emitted, for assertions on log
//! output.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

static INIT: Once = Once::new();

/// Install the global test subscriber once. Later calls are no-ops.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One emitted event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: Option<String>,
    pub fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned();
        if let Ok(mut events) = self.events.lock() {
            events.push(CapturedEvent {
                level: *event.metadata().level(),
                message,
                fields,
            });
        }
    }
}

/// Run `f` with a capturing subscriber and return its result and events.
pub fn with_captured_events<T>(f: impl FnOnce() -> T) -> (T, Vec<CapturedEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    let out = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().map(|e| e.clone()).unwrap_or_default();
    (out, captured)
}
