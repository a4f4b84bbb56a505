//! Basic Counter
//!
//! This example demonstrates a single actuator driving one session.
//!
//! Key concepts:
//! - Pure transitions via the `Stateful` trait
//! - Returning the same `Model` means "no change" and emits nothing
//! - Unhandled messages reach the fallback
//! - Subscriptions run for every emitted state
//!
//! Run with: cargo run --example basic_counter

use futures::StreamExt;
use state_actuator::actuator::Submitter;
use state_actuator::core::{Message, Model, Stateful, TransitionError, Update};
use state_actuator::{message_enum, Actuator};

// Define counter messages using the message_enum macro
message_enum! {
    enum CounterMsg {
        Increment,
        Decrement,
        Noop,
        Launch,
    }
}

struct Counter;

impl Stateful for Counter {
    type State = i64;
    type Msg = CounterMsg;

    fn init(&self) -> i64 {
        0
    }

    fn update(
        &self,
        model: &Model<i64>,
        msg: &CounterMsg,
    ) -> Result<Update<i64, CounterMsg>, TransitionError> {
        Ok(match msg {
            CounterMsg::Increment => Update::state(**model + 1),
            CounterMsg::Decrement => Update::state(**model - 1),
            CounterMsg::Noop => Update::state(model.clone()),
            CounterMsg::Launch => Update::unhandled(),
        })
    }

    fn subscriptions(&self, model: &Model<i64>, _submit: &Submitter<CounterMsg>) {
        println!("  subscription saw count = {}", **model);
    }
}

#[tokio::main]
async fn main() {
    println!("=== Basic Counter Example ===\n");

    let actuator = Actuator::new(Counter);
    actuator.set_fallback(|msg: CounterMsg| println!("  fallback received: {}", msg.id()));

    let mut session = actuator.create_session();
    println!("Initial state: {}", **actuator.initial_model());
    println!("Registered sessions: {}", actuator.reader_count());

    for msg in [
        CounterMsg::Increment,
        CounterMsg::Noop,
        CounterMsg::Increment,
        CounterMsg::Launch,
        CounterMsg::Decrement,
    ] {
        println!("Submitting {}", msg.id());
        actuator.submit(msg);
    }

    // Noop and Launch produce no emissions, so three states arrive.
    for _ in 0..3 {
        let state = session.next().await.unwrap().unwrap();
        println!("Emitted state: {}", *state);
    }

    let stats = session.stats();
    println!("\nReceived: {}", stats.received);
    println!("Emitted: {}", stats.emitted);
    println!("Unchanged: {}", stats.unchanged);
    println!("Unhandled: {}", stats.unhandled);

    drop(session);
    println!("Registered sessions after drop: {}", actuator.reader_count());

    println!("\n=== Example Complete ===");
}
