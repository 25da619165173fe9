//! Lifecycle endpoints: the two-call active-machine read and the four
//! mutations, routed catalog- or season-scoped by target.

use anyhow::{Context, Result};

use crate::model::{Difficulty, MachineFact, PlayState, parse_platform_ts};
use crate::state::{ActivePoll, LifecycleGateway, Target};

use super::ApiClient;
use super::types::{
    ActiveEnvelope, MachineIdBody, MachineInfoEnvelope, MessageResponse, OwnBody,
};

impl ApiClient {
    /// Fetch the active-machine fact. `{info: null}` maps to the empty fact.
    /// A provisioned machine needs a second detail call; if that one fails
    /// the summary-only fact is still returned, with the detail error noted
    /// for the caller to log.
    pub async fn active_machine(&self) -> Result<ActivePoll> {
        let resp = self
            .get("/api/v4/machine/active")
            .send()
            .await
            .context("active machine request")?;
        let resp = self.ensure_ok(resp, "active machine").await?;
        let envelope: ActiveEnvelope = resp.json().await.context("parse active machine")?;

        let Some(summary) = envelope.info else {
            return Ok(ActivePoll {
                fact: MachineFact::none(),
                detail_error: None,
            });
        };

        let seasonal = summary
            .kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case("seasonal"));
        let fact = MachineFact::from_summary(summary.id, summary.name, summary.ip, seasonal);

        match self.machine_detail(summary.id).await {
            Ok((os, difficulty, user_owned, root_owned, play)) => Ok(ActivePoll {
                fact: fact.with_detail(os, difficulty, user_owned, root_owned, play),
                detail_error: None,
            }),
            Err(err) => Ok(ActivePoll {
                fact,
                detail_error: Some(format!("{:#}", err)),
            }),
        }
    }

    async fn machine_detail(
        &self,
        id: u64,
    ) -> Result<(Option<String>, Option<Difficulty>, bool, bool, PlayState)> {
        let resp = self
            .get(&format!("/api/v4/machine/info/{}", id))
            .send()
            .await
            .context("machine detail request")?;
        let resp = self.ensure_ok(resp, "machine detail").await?;
        let envelope: MachineInfoEnvelope = resp.json().await.context("parse machine detail")?;
        let info = envelope.info;

        let play = info
            .play_info
            .map(|p| PlayState {
                spawned: p.is_spawned.unwrap_or(false),
                spawning: p.is_spawning.unwrap_or(false),
                active: p.is_active.unwrap_or(false),
                player_count: p.active_player_count.unwrap_or(0),
                expires_at: p.expires_at.as_deref().and_then(parse_platform_ts),
            })
            .unwrap_or_default();

        Ok((
            info.os,
            info.difficulty_text.as_deref().and_then(|d| d.parse().ok()),
            info.user_owned.unwrap_or(false),
            info.root_owned.unwrap_or(false),
            play,
        ))
    }

    async fn lifecycle_post(&self, label: &str, path: &str, target: Target) -> Result<String> {
        let req = self.post(path);
        let req = match target {
            Target::Catalog(id) => req.json(&MachineIdBody { machine_id: id }),
            // Season-scoped: the platform keys on the session, no body.
            Target::Seasonal => req,
        };
        let resp = req.send().await.with_context(|| format!("{} request", label))?;
        let resp = self.ensure_ok(resp, label).await?;
        let body: MessageResponse = resp
            .json()
            .await
            .with_context(|| format!("parse {} response", label))?;
        Ok(body.message)
    }
}

impl LifecycleGateway for ApiClient {
    async fn active_machine(&self) -> Result<ActivePoll> {
        ApiClient::active_machine(self).await
    }

    async fn spawn(&self, target: Target) -> Result<String> {
        let path = match target {
            Target::Catalog(_) => "/api/v4/vm/spawn",
            Target::Seasonal => "/api/v4/season/machine/spawn",
        };
        self.lifecycle_post("spawn", path, target).await
    }

    async fn stop(&self, target: Target) -> Result<String> {
        let path = match target {
            Target::Catalog(_) => "/api/v4/vm/terminate",
            Target::Seasonal => "/api/v4/season/machine/terminate",
        };
        self.lifecycle_post("stop", path, target).await
    }

    async fn reset(&self, target: Target) -> Result<String> {
        let path = match target {
            Target::Catalog(_) => "/api/v4/vm/reset",
            Target::Seasonal => "/api/v4/season/machine/reset",
        };
        self.lifecycle_post("reset", path, target).await
    }

    async fn submit_flag(&self, target: Target, flag: &str) -> Result<String> {
        let (path, machine_id) = match target {
            Target::Catalog(id) => ("/api/v4/machine/own", Some(id)),
            Target::Seasonal => ("/api/v4/season/machine/own", None),
        };
        let resp = self
            .post(path)
            .json(&OwnBody {
                machine_id,
                flag: flag.to_string(),
            })
            .send()
            .await
            .context("submit flag request")?;
        let resp = self.ensure_ok(resp, "submit flag").await?;
        let body: MessageResponse = resp.json().await.context("parse submit flag response")?;
        Ok(body.message)
    }
}
