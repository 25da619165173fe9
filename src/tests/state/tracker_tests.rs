use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::sync::mpsc;

use super::*;

use crate::state::gateway::test_support::FakeGateway;
use crate::state::ActivePoll;

fn fact(id: u64) -> MachineFact {
    MachineFact::from_summary(id, format!("box-{}", id), Some("10.10.10.5".to_string()), false)
}

#[tokio::test]
async fn publishes_every_poll_even_when_unchanged() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.push_fact(fact(7));

    let mut tracker = ActiveMachineTracker::new(gateway);
    for _ in 0..2 {
        match tracker.refresh().await {
            TrackerEvent::Fact { fact: published, detail_error } => {
                assert_eq!(published, fact(7));
                assert_eq!(detail_error, None);
            }
            other => panic!("expected a fact, got {:?}", other),
        }
    }
    assert_eq!(tracker.fact(), &fact(7));
}

#[tokio::test]
async fn failed_refresh_retains_the_previous_fact() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.push_fact(fact(7));
    gateway.push_poll(Err(anyhow::anyhow!("connection reset")));
    gateway.push_fact(MachineFact::none());

    let mut tracker = ActiveMachineTracker::new(gateway);

    tracker.refresh().await;
    assert_eq!(tracker.fact().id, Some(7));

    match tracker.refresh().await {
        TrackerEvent::Error(err) => assert!(err.contains("connection reset")),
        other => panic!("expected an error, got {:?}", other),
    }
    assert_eq!(
        tracker.fact().id,
        Some(7),
        "stale-but-valid beats discarding known state"
    );

    // The next poll through succeeds and replaces the fact wholesale.
    tracker.refresh().await;
    assert!(tracker.fact().is_none());
}

#[tokio::test]
async fn partial_detail_failures_ride_along_as_facts() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.push_poll(Ok(ActivePoll {
        fact: MachineFact::from_summary(7, "box-7".to_string(), None, false),
        detail_error: Some("machine detail failed with status 500".to_string()),
    }));

    let mut tracker = ActiveMachineTracker::new(gateway);
    match tracker.refresh().await {
        TrackerEvent::Fact { fact, detail_error } => {
            assert_eq!(fact.id, Some(7));
            assert_eq!(fact.os, None, "detail fields stay empty");
            assert!(detail_error.is_some());
        }
        other => panic!("expected a partial fact, got {:?}", other),
    }
    assert_eq!(tracker.fact().id, Some(7));
}

#[tokio::test]
async fn poll_loop_answers_pokes_and_stops_when_abandoned() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.push_fact(fact(7));

    let tracker = ActiveMachineTracker::new(gateway);
    let poke = Arc::new(Notify::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(tracker.run(Duration::from_secs(3600), poke.clone(), tx));

    // The interval's first tick fires immediately.
    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("startup poll")
        .expect("channel open");
    assert!(matches!(first, TrackerEvent::Fact { .. }));

    // An out-of-cycle poke produces a poll well before the next tick.
    poke.notify_one();
    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("poked poll")
        .expect("channel open");
    assert!(matches!(second, TrackerEvent::Fact { .. }));

    // Dropping the receiver shuts the loop down.
    drop(rx);
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("loop ends when the channel closes")
        .expect("task completes cleanly");
}
