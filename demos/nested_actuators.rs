//! Nested Actuators
//!
//! This example demonstrates asynchronous follow-up messages and a child
//! actuator that forwards what it cannot handle to its parent.
//!
//! Key concepts:
//! - A transition schedules a pending message (`fetch` -> `fetch-done`)
//! - Resolved pending messages reach every registered session
//! - A child's fallback can submit into a parent actuator
//!
//! Run with: cargo run --example nested_actuators

use std::time::Duration;

use futures::StreamExt;
use state_actuator::core::{pending_ok, Envelope, Message, Model, Stateful, TransitionError, Update};
use state_actuator::Actuator;

type Msg = Envelope<()>;

#[derive(Clone, Debug, PartialEq)]
struct Page {
    loading: bool,
    loads: u32,
}

/// Child: loads a page, knows nothing about sessions.
struct Loader;

impl Stateful for Loader {
    type State = Page;
    type Msg = Msg;

    fn init(&self) -> Page {
        Page {
            loading: false,
            loads: 0,
        }
    }

    fn update(&self, model: &Model<Page>, msg: &Msg) -> Result<Update<Page, Msg>, TransitionError> {
        Ok(match msg.id() {
            "fetch" => Update::with_message(
                Page {
                    loading: true,
                    ..(**model).clone()
                },
                pending_ok(async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Envelope::signal("fetch-done")
                }),
            ),
            "fetch-done" => Update::state(Page {
                loading: false,
                loads: model.loads + 1,
            }),
            _ => Update::unhandled(),
        })
    }
}

/// Parent: tracks how many times the user logged out.
struct Shell;

impl Stateful for Shell {
    type State = u32;
    type Msg = Msg;

    fn init(&self) -> u32 {
        0
    }

    fn update(&self, model: &Model<u32>, msg: &Msg) -> Result<Update<u32, Msg>, TransitionError> {
        Ok(match msg.id() {
            "logout" => Update::state(**model + 1),
            _ => Update::unhandled(),
        })
    }
}

#[tokio::main]
async fn main() {
    println!("=== Nested Actuators Example ===\n");

    let parent = Actuator::builder()
        .definition(Shell)
        .label("shell")
        .fallback(|msg: Msg| println!("  shell dropped: {}", msg.id()))
        .build()
        .unwrap();
    let child = Actuator::builder().definition(Loader).label("loader").build().unwrap();
    child.forward_unhandled_to(parent.submitter());

    let mut shell = parent.create_session();
    let mut left = child.create_session();
    let mut right = child.create_session();

    println!("Submitting fetch to the child");
    child.submit(Envelope::signal("fetch"));

    // Both sessions run `fetch`, so two `fetch-done` messages are broadcast.
    for (name, session) in [("left", &mut left), ("right", &mut right)] {
        for _ in 0..3 {
            let page = session.next().await.unwrap().unwrap();
            println!("  {name}: {:?}", *page);
        }
    }

    println!("\nSubmitting logout to the child");
    child.submit(Envelope::signal("logout"));

    // Each child session forwards it once.
    for _ in 0..2 {
        let logouts = shell.next().await.unwrap().unwrap();
        println!("  shell logouts: {}", *logouts);
    }

    println!("\nPending in flight: {}", child.pending_in_flight());
    println!("\n=== Example Complete ===");
}
