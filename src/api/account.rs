use anyhow::{Context, Result};

use crate::model::{Profile, SeasonStanding};

use super::ApiClient;
use super::types::{ProfileEnvelope, SeasonListEnvelope, SeasonRankEnvelope, UserInfoEnvelope};

impl ApiClient {
    pub async fn user_id(&self) -> Result<u64> {
        let resp = self
            .get("/api/v4/user/info")
            .send()
            .await
            .context("user info request")?;
        let resp = self.ensure_ok(resp, "user info").await?;
        let envelope: UserInfoEnvelope = resp.json().await.context("parse user info")?;
        Ok(envelope.info.id)
    }

    /// Profile panel data; chains the id lookup the profile endpoint needs.
    pub async fn profile(&self) -> Result<Profile> {
        let id = self.user_id().await?;
        let resp = self
            .get(&format!("/api/v4/profile/{}", id))
            .send()
            .await
            .context("profile request")?;
        let resp = self.ensure_ok(resp, "profile").await?;
        let envelope: ProfileEnvelope = resp.json().await.context("parse profile")?;
        let p = envelope.profile;

        Ok(Profile {
            id: p.id,
            name: p.name,
            rank_id: p.rank_id,
            ranking: p.ranking,
            rank_progress: p.current_rank_progress,
            points: p.points,
            user_owns: p.user_owns,
            system_owns: p.system_owns,
            user_bloods: p.user_bloods,
            system_bloods: p.system_bloods,
            respects: p.respects,
        })
    }

    async fn current_season_id(&self) -> Result<Option<u64>> {
        let resp = self
            .get("/api/v4/season/list")
            .send()
            .await
            .context("season list request")?;
        let resp = self.ensure_ok(resp, "season list").await?;
        let envelope: SeasonListEnvelope = resp.json().await.context("parse season list")?;
        Ok(envelope.data.into_iter().find(|s| s.active).map(|s| s.id))
    }

    /// Standing in the rotating season, if one is running.
    pub async fn season_standing(&self) -> Result<Option<SeasonStanding>> {
        let Some(season_id) = self.current_season_id().await? else {
            return Ok(None);
        };

        let resp = self
            .get(&format!("/api/v4/season/user/rank/{}", season_id))
            .send()
            .await
            .context("season rank request")?;
        let resp = self.ensure_ok(resp, "season rank").await?;
        let envelope: SeasonRankEnvelope = resp.json().await.context("parse season rank")?;
        let body = envelope.data;

        let flags = body.flags_to_next_rank.unwrap_or_default();
        Ok(Some(SeasonStanding {
            league: body.league,
            rank: body.rank,
            total_ranks: body.total_ranks.unwrap_or(0),
            points: body.total_season_points.unwrap_or(0),
            flags_obtained: flags.obtained.unwrap_or(0),
            flags_total: flags.total.unwrap_or(0),
        }))
    }
}
