use std::sync::Arc;

use super::*;

use crate::model::{CatalogMachine, MachineFact};
use crate::state::gateway::test_support::FakeGateway;
use crate::state::{ContextEvent, ContextState};

fn browsing(id: u64) -> ContextState {
    let mut state = ContextState::new();
    state.apply(ContextEvent::SelectionPicked(CatalogMachine {
        id,
        name: format!("box-{}", id),
        ..CatalogMachine::default()
    }));
    state
}

fn locked(id: u64, seasonal: bool) -> ContextState {
    let mut state = ContextState::new();
    state.apply(ContextEvent::FactUpdated(MachineFact::from_summary(
        id,
        format!("box-{}", id),
        None,
        seasonal,
    )));
    state
}

#[test]
fn second_command_is_rejected_while_one_is_in_flight() {
    let mut dispatcher = CommandDispatcher::new();
    let context = browsing(42);

    let prepared = dispatcher
        .prepare(LifecycleAction::Spawn, &context)
        .expect("first command");
    assert_eq!(prepared.target, Target::Catalog(42));
    assert!(dispatcher.in_flight());

    let rejected = dispatcher
        .prepare(LifecycleAction::Stop, &locked(7, false))
        .expect_err("must not dispatch while in flight");
    assert!(rejected.0.contains("in flight"));

    dispatcher.complete();
    assert!(!dispatcher.in_flight());
    dispatcher
        .prepare(LifecycleAction::Stop, &locked(7, false))
        .expect("slot free again");
}

#[test]
fn spawn_targets_the_selection() {
    let mut dispatcher = CommandDispatcher::new();
    let prepared = dispatcher
        .prepare(LifecycleAction::Spawn, &browsing(42))
        .expect("spawn from selection");
    assert_eq!(prepared.target, Target::Catalog(42));
}

#[test]
fn spawn_is_rejected_without_a_selection_or_with_a_lock() {
    let mut dispatcher = CommandDispatcher::new();

    let rejected = dispatcher
        .prepare(LifecycleAction::Spawn, &ContextState::new())
        .expect_err("nothing selected");
    assert!(rejected.0.contains("no machine selected"));
    assert!(!dispatcher.in_flight(), "rejection must not claim the slot");

    let rejected = dispatcher
        .prepare(LifecycleAction::Spawn, &locked(7, false))
        .expect_err("machine already active");
    assert!(rejected.0.contains("already active"));
}

#[test]
fn stop_reset_submit_require_the_active_machine() {
    let mut dispatcher = CommandDispatcher::new();

    for action in [
        LifecycleAction::Stop,
        LifecycleAction::Reset,
        LifecycleAction::SubmitFlag("HTB{x}".to_string()),
    ] {
        let rejected = dispatcher
            .prepare(action.clone(), &browsing(42))
            .expect_err("browsing is not an active machine");
        assert!(rejected.0.contains("no active machine"));

        let prepared = dispatcher
            .prepare(action, &locked(7, false))
            .expect("locked target resolves");
        assert_eq!(prepared.target, Target::Catalog(7));
        dispatcher.complete();
    }
}

#[test]
fn seasonal_lock_routes_season_scoped() {
    let mut dispatcher = CommandDispatcher::new();
    let prepared = dispatcher
        .prepare(LifecycleAction::Reset, &locked(561, true))
        .expect("seasonal reset");
    assert_eq!(prepared.target, Target::Seasonal);
}

#[tokio::test]
async fn execute_records_the_routed_mutation() {
    let gateway = Arc::new(FakeGateway::new());
    let mut dispatcher = CommandDispatcher::new();

    let prepared = dispatcher
        .prepare(LifecycleAction::SubmitFlag("HTB{x}".to_string()), &locked(7, false))
        .expect("prepare");
    let outcome = prepared.execute(gateway.clone()).await;

    assert!(outcome.succeeded());
    assert_eq!(outcome.result, Ok("ok".to_string()));
    let mutations = gateway.mutations.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0], ("submit".to_string(), Some(Target::Catalog(7))));
}

#[tokio::test]
async fn gateway_errors_come_back_as_distinct_outcomes() {
    let mut gateway = FakeGateway::new();
    gateway.fail_mutations = true;
    let gateway = Arc::new(gateway);

    let mut dispatcher = CommandDispatcher::new();
    let prepared = dispatcher
        .prepare(LifecycleAction::Stop, &locked(7, false))
        .expect("prepare");
    let outcome = prepared.execute(gateway).await;

    assert!(!outcome.succeeded());
    let err = outcome.result.expect_err("error outcome");
    assert!(err.contains("500"), "status must be preserved: {}", err);
}

#[test]
fn rejected_commands_never_reach_the_gateway() {
    let gateway = Arc::new(FakeGateway::new());
    let mut dispatcher = CommandDispatcher::new();

    dispatcher
        .prepare(LifecycleAction::Stop, &ContextState::new())
        .expect_err("no target");

    // Nothing was prepared, so nothing could have executed.
    assert!(gateway.mutations.lock().unwrap().is_empty());
}
