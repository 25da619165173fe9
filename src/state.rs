//! The active-machine lifecycle core: the gateway seam, the polling tracker
//! that owns the "what is provisioned right now" fact, the reconciler that
//! merges that fact with the user's catalog selection, and the dispatcher
//! that sequences lifecycle commands against the reconciled state.

mod gateway;
pub use self::gateway::{ActivePoll, LifecycleGateway, Target};

mod tracker;
pub use self::tracker::{ActiveMachineTracker, TrackerEvent};

mod context;
pub use self::context::{Context, ContextEvent, ContextState};

mod dispatcher;
pub use self::dispatcher::{
    CommandDispatcher, CommandOutcome, CommandRejected, LifecycleAction, PreparedCommand,
};
