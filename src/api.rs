use anyhow::{Context, Result};

use crate::credentials::ApiToken;

mod http;

mod types;
pub use self::types::MessageResponse;

mod account;
mod catalog;
mod connection;
mod machines;

pub const DEFAULT_BASE_URL: &str = "https://labs.hackthebox.com";

const USER_AGENT: &str = concat!("labdeck/", env!("CARGO_PKG_VERSION"));

/// What a catalog search is scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchScope {
    Machines,
    Users,
}

impl SearchScope {
    pub fn tag(&self) -> &'static str {
        match self {
            SearchScope::Machines => "machines",
            SearchScope::Users => "users",
        }
    }
}

/// Authenticated HTTP client for the platform API. Holds no state beyond the
/// connection pool; every call is a plain request/response pair and nothing
/// is retried here — the pollers' schedules are the retry policy.
pub struct ApiClient {
    base_url: String,
    token: ApiToken,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: ApiToken) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("build http client")?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
