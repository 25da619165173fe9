//! DTOs for platform API requests/responses. Nothing outside `api` sees
//! these; each fetch maps into the typed records in `crate::model`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// Lifecycle ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct ActiveEnvelope {
    pub(super) info: Option<ActiveSummary>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ActiveSummary {
    pub(super) id: u64,
    pub(super) name: String,

    #[serde(default)]
    pub(super) ip: Option<String>,

    #[serde(default, rename = "type")]
    pub(super) kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MachineInfoEnvelope {
    pub(super) info: MachineInfo,
}

#[derive(Debug, Deserialize)]
pub(super) struct MachineInfo {
    #[serde(default)]
    pub(super) os: Option<String>,

    #[serde(default, rename = "difficultyText")]
    pub(super) difficulty_text: Option<String>,

    // Both arrive as true/false/null.
    #[serde(default, rename = "authUserInUserOwns")]
    pub(super) user_owned: Option<bool>,

    #[serde(default, rename = "authUserInRootOwns")]
    pub(super) root_owned: Option<bool>,

    #[serde(default, rename = "playInfo")]
    pub(super) play_info: Option<PlayInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PlayInfo {
    #[serde(default, rename = "isSpawned")]
    pub(super) is_spawned: Option<bool>,

    #[serde(default, rename = "isSpawning")]
    pub(super) is_spawning: Option<bool>,

    #[serde(default, rename = "isActive")]
    pub(super) is_active: Option<bool>,

    #[serde(default)]
    pub(super) active_player_count: Option<u32>,

    #[serde(default)]
    pub(super) expires_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MachineIdBody {
    pub(super) machine_id: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct OwnBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) machine_id: Option<u64>,
    pub(super) flag: String,
}

// Account ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct UserInfoEnvelope {
    pub(super) info: UserInfoBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserInfoBody {
    pub(super) id: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileEnvelope {
    pub(super) profile: ProfileBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileBody {
    pub(super) id: u64,
    pub(super) name: String,

    #[serde(default)]
    pub(super) rank_id: u32,

    #[serde(default)]
    pub(super) ranking: Option<u32>,

    #[serde(default)]
    pub(super) current_rank_progress: u32,

    #[serde(default)]
    pub(super) points: u32,

    #[serde(default)]
    pub(super) user_owns: u32,

    #[serde(default)]
    pub(super) system_owns: u32,

    #[serde(default)]
    pub(super) user_bloods: u32,

    #[serde(default)]
    pub(super) system_bloods: u32,

    #[serde(default)]
    pub(super) respects: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct SeasonListEnvelope {
    pub(super) data: Vec<SeasonEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SeasonEntry {
    pub(super) id: u64,

    #[serde(default)]
    pub(super) active: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct SeasonRankEnvelope {
    pub(super) data: SeasonRankBody,
}

// Everything here is null before the first seasonal flag lands.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SeasonRankBody {
    #[serde(default)]
    pub(super) league: Option<String>,

    #[serde(default)]
    pub(super) rank: Option<u32>,

    #[serde(default)]
    pub(super) total_ranks: Option<u32>,

    #[serde(default)]
    pub(super) total_season_points: Option<u32>,

    #[serde(default)]
    pub(super) flags_to_next_rank: Option<FlagsToNextRank>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FlagsToNextRank {
    #[serde(default)]
    pub(super) obtained: Option<u32>,

    #[serde(default)]
    pub(super) total: Option<u32>,
}

// VPN ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct ConnectionEntry {
    #[serde(default)]
    pub(super) location_type_friendly: Option<String>,

    pub(super) server: ConnectionServer,
    pub(super) connection: ConnectionDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConnectionServer {
    #[serde(default)]
    pub(super) hostname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConnectionDetail {
    #[serde(default)]
    pub(super) through_pwnbox: bool,

    #[serde(default)]
    pub(super) ip4: Option<String>,

    #[serde(default)]
    pub(super) down: Option<serde_json::Value>,

    #[serde(default)]
    pub(super) up: Option<serde_json::Value>,
}

// Catalog ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct PaginatedMachines {
    pub(super) data: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CatalogItem {
    pub(super) id: u64,
    pub(super) name: String,

    #[serde(default)]
    pub(super) os: Option<String>,

    #[serde(default, rename = "difficultyText")]
    pub(super) difficulty_text: Option<String>,

    #[serde(default, rename = "authUserInUserOwns")]
    pub(super) user_owned: Option<bool>,

    #[serde(default, rename = "authUserInRootOwns")]
    pub(super) root_owned: Option<bool>,

    #[serde(default)]
    pub(super) points: u32,

    #[serde(default)]
    pub(super) star: f32,

    #[serde(default)]
    pub(super) release: Option<String>,

    #[serde(default)]
    pub(super) user_owns_count: u32,

    #[serde(default)]
    pub(super) root_owns_count: u32,

    #[serde(default)]
    pub(super) is_competitive: bool,

    #[serde(default)]
    pub(super) free: bool,

    #[serde(default, rename = "feedbackForChart")]
    pub(super) feedback: Option<FeedbackForChart>,
}

/// The ten fixed difficulty-vote counters, easiest to hardest.
#[derive(Debug, Default, Deserialize)]
pub(super) struct FeedbackForChart {
    #[serde(default, rename = "counterCake")]
    pub(super) cake: u32,
    #[serde(default, rename = "counterVeryEasy")]
    pub(super) very_easy: u32,
    #[serde(default, rename = "counterEasy")]
    pub(super) easy: u32,
    #[serde(default, rename = "counterTooEasy")]
    pub(super) too_easy: u32,
    #[serde(default, rename = "counterMedium")]
    pub(super) medium: u32,
    #[serde(default, rename = "counterBitHard")]
    pub(super) bit_hard: u32,
    #[serde(default, rename = "counterHard")]
    pub(super) hard: u32,
    #[serde(default, rename = "counterTooHard")]
    pub(super) too_hard: u32,
    #[serde(default, rename = "counterExHard")]
    pub(super) ex_hard: u32,
    #[serde(default, rename = "counterBrainFuck")]
    pub(super) brain_fuck: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct SeasonalMachines {
    pub(super) data: Vec<SeasonalItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SeasonalItem {
    #[serde(default)]
    pub(super) id: Option<u64>,

    #[serde(default)]
    pub(super) name: Option<String>,

    #[serde(default)]
    pub(super) os: Option<String>,

    #[serde(default, rename = "difficulty_text")]
    pub(super) difficulty_text: Option<String>,

    #[serde(default)]
    pub(super) is_owned_user: bool,

    #[serde(default)]
    pub(super) is_owned_root: bool,

    #[serde(default)]
    pub(super) is_released: bool,

    /// Placeholder rows for weeks the platform has not revealed yet.
    #[serde(default)]
    pub(super) unknown: bool,
}

// Search -------------------------------------------------------------------

/// Search buckets arrive as a list or as an id-keyed map depending on the
/// server; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SearchBucket {
    List(Vec<RawSearchHit>),
    Map(HashMap<String, RawSearchHit>),
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSearchHit {
    pub(super) id: serde_json::Value,
    pub(super) value: String,
}
