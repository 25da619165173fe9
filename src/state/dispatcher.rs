use std::fmt;
use std::sync::Arc;

use super::{Context, ContextState, LifecycleGateway, Target};

/// The four user-issued lifecycle commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleAction {
    Spawn,
    Stop,
    Reset,
    SubmitFlag(String),
}

impl LifecycleAction {
    pub fn verb(&self) -> &'static str {
        match self {
            LifecycleAction::Spawn => "spawn",
            LifecycleAction::Stop => "stop",
            LifecycleAction::Reset => "reset",
            LifecycleAction::SubmitFlag(_) => "submit flag",
        }
    }
}

/// A command that never left the client: precondition failed locally, no
/// network call was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRejected(pub String);

impl fmt::Display for CommandRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates and sequences lifecycle commands: one in flight at a time, all
/// controls disabled while it runs.
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    in_flight: bool,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        CommandDispatcher::default()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Resolve the target against the reconciled context, read synchronously
    /// at invocation time, and claim the in-flight slot. Spawn targets the
    /// selection; stop/reset/submit target the active machine.
    pub fn prepare(
        &mut self,
        action: LifecycleAction,
        context: &ContextState,
    ) -> Result<PreparedCommand, CommandRejected> {
        if self.in_flight {
            return Err(CommandRejected(
                "another command is still in flight".to_string(),
            ));
        }

        let target = match (&action, context.context()) {
            (LifecycleAction::Spawn, Context::Locked(_)) => {
                return Err(CommandRejected(
                    "a machine is already active; stop it first".to_string(),
                ));
            }
            (LifecycleAction::Spawn, Context::Browsing(entry)) => {
                if entry.seasonal {
                    Target::Seasonal
                } else {
                    Target::Catalog(entry.id)
                }
            }
            (LifecycleAction::Spawn, Context::Empty) => {
                return Err(CommandRejected("no machine selected".to_string()));
            }
            (_, Context::Locked(_)) => match context.target() {
                Some(target) => target,
                None => return Err(CommandRejected("no active machine".to_string())),
            },
            (_, _) => return Err(CommandRejected("no active machine".to_string())),
        };

        self.in_flight = true;
        Ok(PreparedCommand { action, target })
    }

    /// Release the in-flight slot. The UI calls this on receipt of the
    /// outcome event, which `PreparedCommand::execute` produces on every
    /// path — success, domain soft-failure, or transport error.
    pub fn complete(&mut self) {
        self.in_flight = false;
    }
}

/// A validated command holding its resolved target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedCommand {
    pub action: LifecycleAction,
    pub target: Target,
}

impl PreparedCommand {
    /// Run the gateway call. Always yields an outcome; transport/HTTP errors
    /// are carried distinctly from the platform's domain messages.
    pub async fn execute<G: LifecycleGateway>(self, gateway: Arc<G>) -> CommandOutcome {
        let result = match &self.action {
            LifecycleAction::Spawn => gateway.spawn(self.target).await,
            LifecycleAction::Stop => gateway.stop(self.target).await,
            LifecycleAction::Reset => gateway.reset(self.target).await,
            LifecycleAction::SubmitFlag(flag) => gateway.submit_flag(self.target, flag).await,
        };
        CommandOutcome {
            action: self.action,
            result: result.map_err(|err| format!("{:#}", err)),
        }
    }
}

/// What came back: the platform's message verbatim, or an error string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    pub action: LifecycleAction,
    pub result: Result<String, String>,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
#[path = "../tests/state/dispatcher_tests.rs"]
mod tests;
