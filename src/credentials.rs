use anyhow::{Context, Result};

/// Bearer token for the platform API, validated before any client is built.
///
/// The platform issues JWT-shaped tokens; anything that does not split into
/// three non-empty dot-separated segments is rejected at startup rather than
/// bounced by the first request.
#[derive(Clone, Debug)]
pub struct ApiToken {
    token: String,
}

impl ApiToken {
    pub fn from_env(var: &str) -> Result<Self> {
        let token = std::env::var(var)
            .with_context(|| format!("{} not set (export your platform API token)", var))?;
        Self::new(token).with_context(|| format!("invalid token in {}", var))
    }

    pub fn new(token: String) -> Result<Self> {
        let token = token.trim().to_string();
        if token.is_empty() {
            anyhow::bail!("token is empty");
        }
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            anyhow::bail!(
                "token is not three dot-separated segments (check the key or generate a new one)"
            );
        }
        Ok(ApiToken { token })
    }

    pub fn reveal(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;
