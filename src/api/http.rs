use super::*;

impl ApiClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(super) fn auth(&self) -> String {
        format!("Bearer {}", self.token.reveal())
    }

    pub(super) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
    }

    pub(super) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
    }

    /// Map a non-success status into an error that keeps the status code and
    /// any `{message}` body the platform attached.
    pub(super) async fn ensure_ok(
        &self,
        resp: reqwest::Response,
        label: &str,
    ) -> Result<reqwest::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!("unauthorized (token invalid or expired; generate a new API key)");
        }
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<MessageResponse>(&body) {
            Ok(m) => anyhow::bail!("{} failed: {} ({})", label, m.message, status),
            Err(_) => anyhow::bail!("{} failed with status {}", label, status),
        }
    }
}
