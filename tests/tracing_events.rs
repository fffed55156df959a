//! Events emitted with the `tracing` feature enabled.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use funcbox::Function;
use tracing::{
    Level,
    field::{Field, Visit},
};
use tracing_subscriber::{Registry, layer::SubscriberExt};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Recorded {
    level: Level,
    target: String,
    fields: String,
}

#[derive(Clone, Default)]
struct RecordingLayer {
    events: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingLayer {
    fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for RecordingLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        struct FieldVisitor<'a> {
            output: &'a mut String,
        }

        impl Visit for FieldVisitor<'_> {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                use std::fmt::Write;
                if !self.output.is_empty() {
                    let _ = write!(self.output, " ");
                }
                let _ = write!(self.output, "{}={:?}", field.name(), value);
            }
        }

        let mut fields = String::new();
        event.record(&mut FieldVisitor {
            output: &mut fields,
        });
        self.events.lock().unwrap().push(Recorded {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            fields,
        });
    }
}

fn with_recording(f: impl FnOnce()) -> Vec<Recorded> {
    let layer = RecordingLayer::default();
    let subscriber = Registry::default()
        .with(layer.clone())
        .with(tracing_subscriber::fmt::layer().with_test_writer());
    tracing::subscriber::with_default(subscriber, f);
    layer.events()
}

#[test]
fn test_wrapping_emits_trace_events() {
    let events = with_recording(|| {
        let _boxed: Function<fn(u8) -> u8> = Function::new(|x: u8| x.wrapping_add(1));
    });

    assert_eq!(events.len(), 1, "{events:?}");
    assert_eq!(events[0].target, "funcbox");
    assert_eq!(events[0].level, Level::TRACE);
    assert!(events[0].fields.contains("fn_ptr=false"));
    assert!(events[0].fields.contains("wrapping callable"));
}

#[test]
fn test_pointer_wrapping_is_marked() {
    let events = with_recording(|| {
        let _pointer: Function<fn(u8) -> u8> = Function::new(u8::reverse_bits as fn(u8) -> u8);
    });

    assert_eq!(events.len(), 1, "{events:?}");
    assert!(events[0].fields.contains("fn_ptr=true"));
    assert!(events[0].fields.contains("fn(u8) -> u8"));
}

#[test]
fn test_cloning_boxed_callable_is_traced() {
    let original: Function<fn() -> u8> = Function::new(|| 7_u8);
    let events = with_recording(|| {
        let mut copy = original.clone();
        assert_eq!(copy.call(()), Ok(7));
    });

    assert_eq!(events.len(), 1, "{events:?}");
    assert!(events[0].fields.contains("cloning callable"));
}

#[test]
fn test_empty_call_emits_debug_event() {
    let events = with_recording(|| {
        let mut empty: Function<fn(u8) -> u8> = Function::empty();
        assert!(empty.call((1,)).is_err());
    });

    assert_eq!(events.len(), 1, "{events:?}");
    assert_eq!(events[0].level, Level::DEBUG);
    assert!(events[0].fields.contains("empty function wrapper"));
}
