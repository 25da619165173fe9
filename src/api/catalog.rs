use anyhow::{Context, Result};

use crate::model::{CatalogMachine, FeedbackHistogram, SearchHit};

use super::types::{
    CatalogItem, FeedbackForChart, PaginatedMachines, SearchBucket, SeasonalItem, SeasonalMachines,
};
use super::{ApiClient, SearchScope};

fn histogram(chart: FeedbackForChart) -> FeedbackHistogram {
    FeedbackHistogram([
        chart.cake,
        chart.very_easy,
        chart.easy,
        chart.too_easy,
        chart.medium,
        chart.bit_hard,
        chart.hard,
        chart.too_hard,
        chart.ex_hard,
        chart.brain_fuck,
    ])
}

fn catalog_machine(item: CatalogItem, retired: bool) -> CatalogMachine {
    CatalogMachine {
        id: item.id,
        name: item.name,
        os: item.os.unwrap_or_default(),
        difficulty: item.difficulty_text.as_deref().and_then(|d| d.parse().ok()),
        user_owned: item.user_owned.unwrap_or(false),
        root_owned: item.root_owned.unwrap_or(false),
        points: item.points,
        rating: item.star,
        release: item.release,
        user_owns_count: item.user_owns_count,
        root_owns_count: item.root_owns_count,
        competitive: item.is_competitive,
        free: item.free,
        feedback: item.feedback.map(histogram),
        seasonal: false,
        retired,
    }
}

/// Released seasonal rows become selectable catalog entries; unreleased and
/// unrevealed weeks map to `None` and render as placeholders only.
fn seasonal_machine(item: SeasonalItem) -> Option<CatalogMachine> {
    if item.unknown || !item.is_released {
        return None;
    }
    Some(CatalogMachine {
        id: item.id?,
        name: item.name.unwrap_or_default(),
        os: item.os.unwrap_or_default(),
        difficulty: item.difficulty_text.as_deref().and_then(|d| d.parse().ok()),
        user_owned: item.is_owned_user,
        root_owned: item.is_owned_root,
        seasonal: true,
        ..CatalogMachine::default()
    })
}

impl ApiClient {
    pub async fn current_machines(&self) -> Result<Vec<CatalogMachine>> {
        let resp = self
            .get("/api/v4/machine/paginated?per_page=100")
            .send()
            .await
            .context("current machines request")?;
        let resp = self.ensure_ok(resp, "current machines").await?;
        let page: PaginatedMachines = resp.json().await.context("parse current machines")?;
        Ok(page
            .data
            .into_iter()
            .map(|m| catalog_machine(m, false))
            .collect())
    }

    pub async fn retired_machines(&self) -> Result<Vec<CatalogMachine>> {
        let resp = self
            .get("/api/v4/machine/list/retired/paginated?per_page=100")
            .send()
            .await
            .context("retired machines request")?;
        let resp = self.ensure_ok(resp, "retired machines").await?;
        let page: PaginatedMachines = resp.json().await.context("parse retired machines")?;
        Ok(page
            .data
            .into_iter()
            .map(|m| catalog_machine(m, true))
            .collect())
    }

    pub async fn seasonal_machines(&self) -> Result<Vec<CatalogMachine>> {
        let resp = self
            .get("/api/v4/season/machines")
            .send()
            .await
            .context("seasonal machines request")?;
        let resp = self.ensure_ok(resp, "seasonal machines").await?;
        let page: SeasonalMachines = resp.json().await.context("parse seasonal machines")?;
        Ok(page.data.into_iter().filter_map(seasonal_machine).collect())
    }

    pub async fn search(&self, scope: SearchScope, term: &str) -> Result<Vec<SearchHit>> {
        let path = format!(
            "/api/v4/search/fetch?query=\"{}\"&tags=[\"{}\"]",
            term,
            scope.tag()
        );
        let resp = self.get(&path).send().await.context("search request")?;
        let resp = self.ensure_ok(resp, "search").await?;
        let body: serde_json::Value = resp.json().await.context("parse search response")?;

        let Some(bucket) = body.get(scope.tag()) else {
            return Ok(Vec::new());
        };
        let bucket: SearchBucket =
            serde_json::from_value(bucket.clone()).context("parse search bucket")?;

        let raw = match bucket {
            SearchBucket::List(hits) => hits,
            SearchBucket::Map(map) => map.into_values().collect(),
        };
        Ok(raw
            .into_iter()
            .map(|hit| SearchHit {
                id: match hit.id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
                value: hit.value,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "../tests/api_catalog_tests.rs"]
mod tests;
