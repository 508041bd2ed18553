//! Browser console output for `tracing` events
//!
//! Native builds log through the fmt subscriber set up by the `factcheck`
//! binary. In the browser there is no stderr, so `main()` installs a
//! [`ConsoleLayer`] that forwards each event to `console.log` / `warn` / `error`.

use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Forwards formatted events to a sink, one line per event:
/// `[target] message key=value ...`
pub struct ConsoleLayer<W> {
    sink: W,
}

impl<W> ConsoleLayer<W>
where
    W: Fn(&Level, &str) + Send + Sync + 'static,
{
    pub fn with_sink(sink: W) -> Self {
        Self { sink }
    }
}

impl<S, W> Layer<S> for ConsoleLayer<W>
where
    S: Subscriber,
    W: Fn(&Level, &str) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = EventLine::default();
        event.record(&mut line);

        let metadata = event.metadata();
        (self.sink)(
            metadata.level(),
            &format!("[{}] {}{}", metadata.target(), line.message, line.fields),
        );
    }
}

#[derive(Default)]
struct EventLine {
    message: String,
    fields: String,
}

impl Visit for EventLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Route `tracing` events at info and above to the browser console
#[cfg(target_arch = "wasm32")]
pub fn init() {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;
    use wasm_bindgen::JsValue;

    let layer = ConsoleLayer::with_sink(|level: &Level, line: &str| {
        let line = JsValue::from_str(line);
        match *level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    });

    // Err only when a global subscriber is already set
    let _ = tracing_subscriber::registry()
        .with(layer.with_filter(LevelFilter::INFO))
        .try_init();
}
