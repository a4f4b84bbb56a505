//! End-to-end behavior of actuators, sessions, and their handlers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use state_actuator::actuator::Submitter;
use state_actuator::core::{
    pending, resolved, Envelope, Message, Model, PendingError, Stateful, TransitionError, Update,
};
use state_actuator::{Actuator, SessionError, StateSession, SubscriptionExt};

type Msg = Envelope<()>;

#[derive(Clone, Debug, PartialEq)]
struct Tally {
    count: i64,
    fetched: u32,
}

/// Counter used by most scenarios.
///
/// - `inc` adds one
/// - `noop` returns the same instance
/// - `fetch` keeps the state and schedules `fetch-done`
/// - `flaky` keeps the state and schedules a rejected message
/// - `lost` keeps the state and schedules a future that panics
/// - `boom` fails once the count reaches two
/// - `explode` panics
struct Counter;

impl Stateful for Counter {
    type State = Tally;
    type Msg = Msg;

    fn init(&self) -> Tally {
        Tally {
            count: 0,
            fetched: 0,
        }
    }

    fn update(&self, model: &Model<Tally>, msg: &Msg) -> Result<Update<Tally, Msg>, TransitionError> {
        Ok(match msg.id() {
            "inc" => Update::state(Tally {
                count: model.count + 1,
                ..(**model).clone()
            }),
            "noop" => Update::state(model.clone()),
            "fetch" => Update::with_message(model.clone(), resolved(Envelope::signal("fetch-done"))),
            "fetch-done" => Update::state(Tally {
                fetched: model.fetched + 1,
                ..(**model).clone()
            }),
            "flaky" => Update::with_message(
                model.clone(),
                pending(async { Err(PendingError::rejected("offline")) }),
            ),
            "lost" => Update::with_message(model.clone(), pending(lost_connection())),
            "boom" if model.count >= 2 => return Err(TransitionError::failed("overflow")),
            "boom" => Update::state(model.clone()),
            "explode" => panic!("counter exploded"),
            _ => Update::unhandled(),
        })
    }
}

async fn lost_connection() -> Result<Msg, PendingError> {
    panic!("lost connection")
}

async fn next_state<D: Stateful>(session: &mut StateSession<D>) -> Result<Model<D::State>, SessionError> {
    tokio::time::timeout(Duration::from_secs(2), session.next())
        .await
        .expect("session produced nothing in time")
        .expect("session ended unexpectedly")
}

async fn count(session: &mut StateSession<Counter>) -> i64 {
    next_state(session).await.unwrap().count
}

#[tokio::test]
async fn increments_are_observed_in_order() {
    let actuator = Actuator::new(Counter);
    let mut session = actuator.create_session();

    for _ in 0..3 {
        actuator.submit(Envelope::signal("inc"));
    }

    assert_eq!(count(&mut session).await, 1);
    assert_eq!(count(&mut session).await, 2);
    assert_eq!(count(&mut session).await, 3);
}

#[tokio::test]
async fn same_instance_is_not_emitted() {
    let actuator = Actuator::new(Counter);
    let mut session = actuator.create_session();

    actuator.submit(Envelope::signal("inc"));
    actuator.submit(Envelope::signal("noop"));
    actuator.submit(Envelope::signal("noop"));
    actuator.submit(Envelope::signal("inc"));

    assert_eq!(count(&mut session).await, 1);
    assert_eq!(count(&mut session).await, 2);

    let stats = session.stats();
    assert_eq!(stats.received, 4);
    assert_eq!(stats.emitted, 2);
    assert_eq!(stats.unchanged, 2);
}

#[tokio::test]
async fn pending_messages_reach_every_session() {
    let actuator = Actuator::new(Counter);
    let mut first = actuator.create_session();
    let mut second = actuator.create_session();

    actuator.submit(Envelope::signal("fetch"));

    // Each session schedules its own `fetch-done`, and each sees both.
    for session in [&mut first, &mut second] {
        assert_eq!(next_state(session).await.unwrap().fetched, 1);
        assert_eq!(next_state(session).await.unwrap().fetched, 2);
    }
}

#[tokio::test]
async fn unhandled_messages_go_to_fallback_in_order() {
    let actuator = Actuator::new(Counter);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    actuator.set_fallback(move |msg: Msg| sink.lock().unwrap().push(msg.id));

    let mut session = actuator.create_session();
    actuator.submit(Envelope::signal("unknown"));
    actuator.submit(Envelope::signal("mystery"));
    actuator.submit(Envelope::signal("inc"));

    // The unhandled messages left the state alone.
    assert_eq!(count(&mut session).await, 1);
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["unknown".to_string(), "mystery".to_string()]
    );
    assert_eq!(session.stats().unhandled, 2);
}

#[tokio::test]
async fn dropping_a_session_releases_its_reader() {
    let actuator = Actuator::new(Counter);
    let mut kept = actuator.create_session();
    let dropped = actuator.create_session();
    assert_eq!(actuator.reader_count(), 2);

    drop(dropped);
    assert_eq!(actuator.reader_count(), 1);
    assert_eq!(actuator.submit(Envelope::signal("inc")), 1);
    assert_eq!(count(&mut kept).await, 1);
}

#[tokio::test]
async fn explicit_deregistration_ends_the_stream() {
    let actuator = Actuator::new(Counter);
    let mut session = actuator.create_session();

    actuator.submit(Envelope::signal("inc"));
    assert!(session.deregister());
    assert!(!session.deregister());
    assert!(!session.is_registered());
    assert_eq!(actuator.reader_count(), 0);

    // Already delivered messages still produce their states.
    assert_eq!(actuator.submit(Envelope::signal("inc")), 0);
    assert_eq!(count(&mut session).await, 1);
    assert!(session.next().await.is_none());
}

#[tokio::test]
async fn transition_failure_ends_only_that_session() {
    let actuator = Actuator::new(Counter);
    let mut doomed = actuator.create_session();
    actuator.submit(Envelope::signal("inc"));
    actuator.submit(Envelope::signal("inc"));
    assert_eq!(count(&mut doomed).await, 1);
    assert_eq!(count(&mut doomed).await, 2);

    let mut survivor = actuator.create_session();
    assert_eq!(actuator.reader_count(), 2);
    actuator.submit(Envelope::signal("boom"));
    actuator.submit(Envelope::signal("inc"));

    let err = next_state(&mut doomed).await.unwrap_err();
    assert_eq!(actuator.reader_count(), 1);
    assert_eq!(err.message_id(), Some("boom"));
    assert!(matches!(
        err,
        SessionError::Transition {
            source: TransitionError::Failed(_),
            ..
        }
    ));
    assert!(doomed.next().await.is_none());
    assert!(doomed.stats().failed);

    assert_eq!(count(&mut survivor).await, 1);
}

/// Records every emitted count and asks for one more increment after the first.
struct Echoing {
    seen: Arc<Mutex<Vec<i64>>>,
}

impl Stateful for Echoing {
    type State = i64;
    type Msg = Msg;

    fn init(&self) -> i64 {
        0
    }

    fn update(&self, model: &Model<i64>, msg: &Msg) -> Result<Update<i64, Msg>, TransitionError> {
        Ok(match msg.id() {
            "inc" => Update::state(**model + 1),
            _ => Update::unhandled(),
        })
    }

    fn subscriptions(&self, model: &Model<i64>, submit: &Submitter<Msg>) {
        self.seen.lock().unwrap().push(**model);
        if **model == 1 {
            submit.submit(Envelope::signal("inc"));
        }
    }
}

#[tokio::test]
async fn subscriptions_run_for_each_emission() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let actuator = Actuator::new(Echoing {
        seen: Arc::clone(&seen),
    });
    let mut session = actuator.create_session();

    actuator.submit(Envelope::signal("inc"));

    assert_eq!(*next_state(&mut session).await.unwrap(), 1);
    assert_eq!(*next_state(&mut session).await.unwrap(), 2);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn consumers_can_stack_their_own_hooks() {
    let actuator = Actuator::new(Counter);
    let mut observed = Vec::new();
    {
        let session = actuator.create_session();
        actuator.submit(Envelope::signal("inc"));
        actuator.submit(Envelope::signal("inc"));

        let mut hooked = session.with_subscriptions(|m: &Model<Tally>| observed.push(m.count));
        hooked.next().await.unwrap().unwrap();
        hooked.next().await.unwrap().unwrap();
    }
    assert_eq!(observed, vec![1, 2]);
}

/// Parent that only understands `reset`.
struct Resetter;

impl Stateful for Resetter {
    type State = u32;
    type Msg = Msg;

    fn init(&self) -> u32 {
        0
    }

    fn update(&self, model: &Model<u32>, msg: &Msg) -> Result<Update<u32, Msg>, TransitionError> {
        Ok(match msg.id() {
            "reset" => Update::state(**model + 1),
            _ => Update::unhandled(),
        })
    }
}

#[tokio::test]
async fn child_forwards_unhandled_to_parent() {
    let parent = Actuator::new(Resetter);
    let child = Actuator::new(Counter);
    child.forward_unhandled_to(parent.submitter());

    let mut parent_session = parent.create_session();
    let mut child_session = child.create_session();

    child.submit(Envelope::signal("reset"));
    child.submit(Envelope::signal("inc"));

    assert_eq!(*next_state(&mut parent_session).await.unwrap(), 1);
    assert_eq!(count(&mut child_session).await, 1);
}

#[tokio::test]
async fn pending_rejections_reach_the_handler() {
    let actuator = Actuator::new(Counter);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    actuator.on_pending_rejected(move |err: &PendingError| {
        let _ = tx.send(err.clone());
    });
    let mut session = actuator.create_session();

    actuator.submit(Envelope::signal("flaky"));
    let err = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap();
    assert_eq!(err, Some(PendingError::Rejected("offline".into())));

    // The session keeps going.
    actuator.submit(Envelope::signal("inc"));
    assert_eq!(count(&mut session).await, 1);
}

#[tokio::test]
async fn session_stats_serialize() {
    let actuator = Actuator::new(Counter);
    let mut session = actuator.create_session();
    actuator.submit(Envelope::signal("inc"));
    count(&mut session).await;

    let json = serde_json::to_value(session.stats()).unwrap();
    assert_eq!(json["session_id"], session.id().to_string());
    assert_eq!(json["emitted"], 1);
    assert!(json["started_at"].is_string());
}

#[tokio::test]
async fn panicking_update_surfaces_in_every_session() {
    let actuator = Actuator::new(Counter);
    let mut first = actuator.create_session();
    let mut second = actuator.create_session();
    assert_eq!(actuator.reader_count(), 2);

    actuator.submit(Envelope::signal("explode"));

    for session in [&mut first, &mut second] {
        let err = next_state(session).await.unwrap_err();
        assert_eq!(
            err,
            SessionError::Transition {
                message_id: "explode".into(),
                source: TransitionError::Panicked("counter exploded".into()),
            }
        );
        assert!(session.next().await.is_none());
    }
    assert_eq!(actuator.reader_count(), 0);
}

#[tokio::test]
async fn panicking_update_releases_exactly_one_reader() {
    let actuator = Actuator::new(Counter);
    let mut doomed = actuator.create_session();
    actuator.submit(Envelope::signal("explode"));

    let mut bystander = actuator.create_session();
    assert_eq!(actuator.reader_count(), 2);

    let err = next_state(&mut doomed).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Transition {
            source: TransitionError::Panicked(_),
            ..
        }
    ));
    assert_eq!(actuator.reader_count(), 1);

    actuator.submit(Envelope::signal("inc"));
    assert_eq!(count(&mut bystander).await, 1);
}

#[tokio::test]
async fn panicking_pending_future_is_a_rejection() {
    let actuator = Actuator::new(Counter);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    actuator.on_pending_rejected(move |err: &PendingError| {
        let _ = tx.send(err.clone());
    });
    let mut session = actuator.create_session();

    actuator.submit(Envelope::signal("lost"));
    let err = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap();
    assert_eq!(err, Some(PendingError::Panicked("lost connection".into())));
    assert_eq!(actuator.reader_count(), 1);

    actuator.submit(Envelope::signal("inc"));
    assert_eq!(count(&mut session).await, 1);
}

#[tokio::test]
async fn panicking_fallback_keeps_the_session_running() {
    let actuator = Actuator::new(Counter);
    actuator.set_fallback(|msg: Msg| panic!("cannot route {}", msg.id()));
    let mut session = actuator.create_session();

    actuator.submit(Envelope::signal("unknown"));
    actuator.submit(Envelope::signal("inc"));

    assert_eq!(count(&mut session).await, 1);
    assert_eq!(actuator.reader_count(), 1);
    assert_eq!(session.stats().unhandled, 1);
}

#[test]
fn sessions_cannot_start_without_a_runtime() {
    let actuator = Actuator::new(Counter);
    let err = actuator.try_create_session().unwrap_err();
    assert_eq!(err, SessionError::NoRuntime);
    assert_eq!(actuator.reader_count(), 0);
}
