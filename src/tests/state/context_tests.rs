use super::*;

use crate::model::{CatalogMachine, ControlState, MachineFact};
use crate::state::Target;

fn entry(id: u64) -> CatalogMachine {
    CatalogMachine {
        id,
        name: format!("box-{}", id),
        os: "Linux".to_string(),
        ..CatalogMachine::default()
    }
}

fn seasonal_entry(id: u64) -> CatalogMachine {
    CatalogMachine {
        seasonal: true,
        ..entry(id)
    }
}

fn fact(id: u64) -> MachineFact {
    MachineFact::from_summary(id, format!("box-{}", id), Some("10.10.10.5".to_string()), false)
}

#[test]
fn starts_empty_with_no_target() {
    let state = ContextState::new();
    assert_eq!(state.context(), &Context::Empty);
    assert_eq!(state.target_id(), None);
    assert_eq!(state.control_state(false), ControlState::default());
}

#[test]
fn pick_moves_to_browsing_and_enables_spawn() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::FactUpdated(MachineFact::none()));
    let change = state.apply(ContextEvent::SelectionPicked(entry(42)));
    assert!(change.is_some());

    assert_eq!(state.target_id(), Some(42));
    let controls = state.control_state(false);
    assert!(controls.spawn);
    assert!(!controls.stop);
    assert!(!controls.reset);
    assert!(!controls.submit);
}

#[test]
fn active_fact_locks_over_any_pick_sequence() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::FactUpdated(fact(7)));
    assert!(matches!(state.context(), Context::Locked(_)));

    for id in [1, 2, 3, 4, 5] {
        state.apply(ContextEvent::SelectionPicked(entry(id)));
        assert_eq!(state.target_id(), Some(7), "pick {} must not unseat the lock", id);
    }

    // The lock clears; the latest pick resurfaces.
    state.apply(ContextEvent::FactUpdated(MachineFact::none()));
    assert_eq!(state.context(), &Context::Browsing(entry(5)));
    assert_eq!(state.target_id(), Some(5));
}

#[test]
fn repeated_identical_facts_are_idempotent() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::SelectionPicked(entry(3)));
    let before = state.control_state(false);

    for _ in 0..3 {
        let change = state.apply(ContextEvent::FactUpdated(MachineFact::none()));
        assert_eq!(change, None);
    }
    assert_eq!(state.control_state(false), before);
    assert_eq!(state.remembered().map(|e| e.id), Some(3));

    state.apply(ContextEvent::FactUpdated(fact(9)));
    let change = state.apply(ContextEvent::FactUpdated(fact(9)));
    assert_eq!(change, None, "an unchanged locked fact is not a transition");
    assert_eq!(state.remembered().map(|e| e.id), Some(3));
}

#[test]
fn remembered_selection_survives_a_lock() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::SelectionPicked(entry(3)));
    assert_eq!(state.context(), &Context::Browsing(entry(3)));

    state.apply(ContextEvent::FactUpdated(fact(7)));
    assert!(matches!(state.context(), Context::Locked(_)));

    state.apply(ContextEvent::FactUpdated(MachineFact::none()));
    assert_eq!(
        state.context(),
        &Context::Browsing(entry(3)),
        "the selection made before the lock must come back, not Empty"
    );
}

#[test]
fn unlock_without_selection_lands_empty() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::FactUpdated(fact(7)));
    state.apply(ContextEvent::FactUpdated(MachineFact::none()));
    assert_eq!(state.context(), &Context::Empty);
    assert_eq!(state.target_id(), None);
}

#[test]
fn fresher_detail_for_same_machine_is_not_a_transition() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::FactUpdated(fact(7)));

    let mut richer = fact(7);
    richer.os = Some("Linux".to_string());
    richer.play.spawned = true;
    let change = state.apply(ContextEvent::FactUpdated(richer.clone()));
    assert_eq!(change, None);
    assert_eq!(state.context(), &Context::Locked(richer));
}

#[test]
fn locked_controls_pin_to_the_active_machine() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::FactUpdated(fact(7)));

    let controls = state.control_state(false);
    assert!(!controls.spawn);
    assert!(controls.stop);
    assert!(controls.reset);
    assert!(controls.submit);
}

#[test]
fn in_flight_disables_everything() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::SelectionPicked(entry(42)));
    assert_eq!(state.control_state(true), ControlState::default());

    state.apply(ContextEvent::FactUpdated(fact(7)));
    assert_eq!(state.control_state(true), ControlState::default());
}

#[test]
fn clearing_the_selection_forgets_it() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::SelectionPicked(entry(42)));
    state.clear_selection();
    assert_eq!(state.context(), &Context::Empty);

    // A later unlock must not resurrect the cleared pick.
    state.apply(ContextEvent::FactUpdated(fact(7)));
    state.apply(ContextEvent::FactUpdated(MachineFact::none()));
    assert_eq!(state.context(), &Context::Empty);
}

#[test]
fn seasonal_contexts_route_season_scoped() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::SelectionPicked(seasonal_entry(561)));
    assert_eq!(state.target(), Some(Target::Seasonal));

    let seasonal_fact = MachineFact::from_summary(561, "box-561".to_string(), None, true);
    state.apply(ContextEvent::FactUpdated(seasonal_fact));
    assert_eq!(state.target(), Some(Target::Seasonal));
    assert_eq!(state.target_id(), Some(561));
}

#[test]
fn catalog_context_routes_by_id() {
    let mut state = ContextState::new();
    state.apply(ContextEvent::SelectionPicked(entry(42)));
    assert_eq!(state.target(), Some(Target::Catalog(42)));

    state.apply(ContextEvent::FactUpdated(fact(7)));
    assert_eq!(state.target(), Some(Target::Catalog(7)));
}
