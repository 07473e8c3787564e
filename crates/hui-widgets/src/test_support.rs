#![forbid(unsafe_code)]

//! Helpers shared by unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

/// Messages of every `WARN` event emitted while `f` runs on this thread.
pub(crate) fn capture_warnings(f: impl FnOnce()) -> Vec<String> {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(WarnCapture(Arc::clone(&captured)));
    tracing::subscriber::with_default(subscriber, f);
    captured.lock().unwrap().clone()
}

struct WarnCapture(Arc<Mutex<Vec<String>>>);

impl<S: Subscriber> Layer<S> for WarnCapture {
    fn on_event(&self, event: &Event<'_>, _cx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut message = MessageVisitor(String::new());
            event.record(&mut message);
            self.0.lock().unwrap().push(message.0);
        }
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
