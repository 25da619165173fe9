use std::future::Future;

use anyhow::Result;

use crate::model::MachineFact;

/// Where a lifecycle mutation is aimed: a catalog machine by id, or the
/// caller's seasonal track. The seasonal endpoints are session-scoped and
/// take no id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Catalog(u64),
    Seasonal,
}

/// Result of one active-machine poll.
///
/// A failed detail call is not an error: the partial fact from the summary
/// call is valid state, and the detail failure rides along for the caller to
/// log.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivePoll {
    pub fact: MachineFact,
    pub detail_error: Option<String>,
}

/// The request/response seam to the platform's lifecycle endpoints. No
/// retained state, no retries; implemented by `api::ApiClient` and by fakes
/// in tests.
pub trait LifecycleGateway {
    fn active_machine(&self) -> impl Future<Output = Result<ActivePoll>> + Send;
    fn spawn(&self, target: Target) -> impl Future<Output = Result<String>> + Send;
    fn stop(&self, target: Target) -> impl Future<Output = Result<String>> + Send;
    fn reset(&self, target: Target) -> impl Future<Output = Result<String>> + Send;
    fn submit_flag(&self, target: Target, flag: &str) -> impl Future<Output = Result<String>> + Send;
}
