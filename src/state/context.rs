use crate::model::{CatalogMachine, ControlState, MachineFact};

use super::Target;

/// Events the reconciler consumes. Delivery order is arrival order; there is
/// no batching or reordering.
#[derive(Clone, Debug)]
pub enum ContextEvent {
    /// The user highlighted a catalog entry.
    SelectionPicked(CatalogMachine),
    /// The tracker published a fresh fact (possibly unchanged).
    FactUpdated(MachineFact),
}

/// The combined display/control context.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Context {
    /// No selection, no active machine.
    #[default]
    Empty,
    /// User inspecting a catalog entry; nothing provisioned.
    Browsing(CatalogMachine),
    /// A machine is provisioned; display and controls pin to it regardless
    /// of what the user clicks in the catalog.
    Locked(MachineFact),
}

/// Merges the tracker's active-machine fact with the user's catalog
/// selection into one coherent state.
///
/// An active machine always takes display precedence over browsing: a
/// provisioned machine is ground truth and must not be hidden by catalog
/// clicks. Picks made while locked are remembered (latest wins) and replayed
/// once the fact returns to null, so a teardown completing late cannot
/// resurrect a selection the user already replaced — nor drop one they just
/// made.
#[derive(Clone, Debug, Default)]
pub struct ContextState {
    context: Context,
    remembered: Option<CatalogMachine>,
}

impl ContextState {
    pub fn new() -> Self {
        ContextState::default()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn remembered(&self) -> Option<&CatalogMachine> {
        self.remembered.as_ref()
    }

    /// Apply one event. Returns a transition description when the visible
    /// state changed, for the observability log.
    pub fn apply(&mut self, event: ContextEvent) -> Option<String> {
        match event {
            ContextEvent::FactUpdated(fact) => self.apply_fact(fact),
            ContextEvent::SelectionPicked(entry) => self.apply_selection(entry),
        }
    }

    fn apply_fact(&mut self, fact: MachineFact) -> Option<String> {
        if fact.id.is_some() {
            let described = describe_fact(&fact);
            match &self.context {
                Context::Locked(prev) if *prev == fact => None,
                Context::Locked(prev) if prev.id == fact.id => {
                    // Same machine, fresher detail; not a transition.
                    self.context = Context::Locked(fact);
                    None
                }
                _ => {
                    self.context = Context::Locked(fact);
                    Some(format!("locked to active machine {}", described))
                }
            }
        } else {
            match (&self.context, &self.remembered) {
                (Context::Locked(_), Some(entry)) => {
                    let name = entry.name.clone();
                    self.context = Context::Browsing(entry.clone());
                    Some(format!("active machine gone; browsing {}", name))
                }
                (Context::Locked(_), None) => {
                    self.context = Context::Empty;
                    Some("active machine gone".to_string())
                }
                // Already unlocked; a repeated null fact changes nothing and
                // must not disturb the remembered selection.
                _ => None,
            }
        }
    }

    fn apply_selection(&mut self, entry: CatalogMachine) -> Option<String> {
        self.remembered = Some(entry.clone());
        match &self.context {
            // Bookkeeping only; visible once the fact returns to null.
            Context::Locked(_) => None,
            Context::Browsing(prev) if *prev == entry => None,
            _ => {
                let name = entry.name.clone();
                self.context = Context::Browsing(entry);
                Some(format!("browsing {}", name))
            }
        }
    }

    /// Drop the selection (the backing catalog row disappeared). A lock is
    /// unaffected; the next null fact then lands in `Empty`.
    pub fn clear_selection(&mut self) -> Option<String> {
        self.remembered = None;
        match &self.context {
            Context::Browsing(_) => {
                self.context = Context::Empty;
                Some("selection cleared".to_string())
            }
            _ => None,
        }
    }

    /// The id lifecycle commands should act on: the locked fact's, else the
    /// browsed selection's, else none.
    pub fn target_id(&self) -> Option<u64> {
        match &self.context {
            Context::Locked(fact) => fact.id,
            Context::Browsing(entry) => Some(entry.id),
            Context::Empty => None,
        }
    }

    /// The routed mutation target for the current context.
    pub fn target(&self) -> Option<Target> {
        match &self.context {
            Context::Locked(fact) => fact.id.map(|id| route(id, fact.seasonal)),
            Context::Browsing(entry) => Some(route(entry.id, entry.seasonal)),
            Context::Empty => None,
        }
    }

    /// Derive the enable/disable state of the four lifecycle controls.
    /// Spawn acts on the selection (its job is to create a new active
    /// machine from a catalog pick); stop/reset/submit act on the active
    /// machine. Everything is off while a command is in flight.
    pub fn control_state(&self, in_flight: bool) -> ControlState {
        if in_flight {
            return ControlState::default();
        }
        match &self.context {
            Context::Empty => ControlState::default(),
            Context::Browsing(_) => ControlState {
                spawn: true,
                ..ControlState::default()
            },
            Context::Locked(_) => ControlState {
                spawn: false,
                stop: true,
                reset: true,
                submit: true,
            },
        }
    }
}

fn route(id: u64, seasonal: bool) -> Target {
    if seasonal {
        Target::Seasonal
    } else {
        Target::Catalog(id)
    }
}

fn describe_fact(fact: &MachineFact) -> String {
    match (&fact.name, fact.id) {
        (Some(name), Some(id)) => format!("{} ({})", name, id),
        (None, Some(id)) => format!("#{}", id),
        _ => "<none>".to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/state/context_tests.rs"]
mod tests;
