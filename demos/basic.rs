//! An event dispatcher storing heterogeneous callbacks behind one signature.
//!
//! Run with `cargo run --example basic`.

use std::collections::BTreeMap;

use funcbox::{BadFunctionCall, Callable, Function};

type Handler = fn(&'static str) -> String;

fn shout(message: &'static str) -> String {
    message.to_uppercase()
}

/// A functor that numbers every message it sees.
#[derive(Clone, Default)]
struct Numbered {
    seen: usize,
}

impl Callable<Handler> for Numbered {
    fn invoke(&mut self, (message,): (&'static str,)) -> String {
        self.seen += 1;
        format!("#{} {message}", self.seen)
    }
}

#[derive(Default)]
struct Dispatcher {
    handlers: BTreeMap<&'static str, Function<Handler>>,
}

impl Dispatcher {
    fn register(&mut self, event: &'static str, handler: Function<Handler>) {
        self.handlers.insert(event, handler);
    }

    fn dispatch(
        &mut self,
        event: &'static str,
        message: &'static str,
    ) -> Result<String, BadFunctionCall> {
        self.handlers
            .get_mut(event)
            .map_or(Err(BadFunctionCall), |handler| handler.call((message,)))
    }
}

fn main() {
    let prefix = String::from("log:");

    let mut dispatcher = Dispatcher::default();
    dispatcher.register("shout", Function::new(shout as Handler));
    dispatcher.register(
        "log",
        Function::new(move |m: &'static str| format!("{prefix} {m}")),
    );
    dispatcher.register("count", Function::new(Numbered::default()));
    dispatcher.register("disabled", Function::empty());

    for (event, message) in [
        ("shout", "hello"),
        ("log", "started"),
        ("count", "first"),
        ("count", "second"),
        ("disabled", "ignored"),
        ("missing", "ignored"),
    ] {
        match dispatcher.dispatch(event, message) {
            Ok(output) => println!("{event:>8}: {output}"),
            Err(error) => println!("{event:>8}: {error}"),
        }
    }

    // Copies are deep: the cloned counter starts from the original's state
    // and then evolves on its own.
    if let Some(counter) = dispatcher.handlers.get("count") {
        let mut copy = counter.clone();
        println!("    copy: {:?}", copy.call(("third",)));
        println!("original: {:?}", dispatcher.dispatch("count", "third"));
    }
}
