use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

/// Machine difficulty tiers as the platform names them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            "Insane" => Ok(Difficulty::Insane),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Play-state block nested inside the active machine detail.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayState {
    pub spawned: bool,
    pub spawning: bool,
    pub active: bool,
    pub player_count: u32,
    pub expires_at: Option<OffsetDateTime>,
}

/// The one process-wide belief about the currently provisioned machine.
///
/// `id == None` means no machine is active and every other field holds its
/// empty value; the constructors keep that coupling true. A fact is replaced
/// wholesale on refresh, never field-patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MachineFact {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub os: Option<String>,
    pub ip: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub user_owned: bool,
    pub root_owned: bool,
    pub play: PlayState,
    pub seasonal: bool,
}

impl MachineFact {
    /// The "no active machine" fact.
    pub fn none() -> Self {
        MachineFact::default()
    }

    /// Fact built from the summary endpoint alone; detail fields stay empty
    /// until `with_detail` fills them.
    pub fn from_summary(id: u64, name: String, ip: Option<String>, seasonal: bool) -> Self {
        MachineFact {
            id: Some(id),
            name: Some(name),
            ip,
            seasonal,
            ..MachineFact::default()
        }
    }

    pub fn with_detail(
        mut self,
        os: Option<String>,
        difficulty: Option<Difficulty>,
        user_owned: bool,
        root_owned: bool,
        play: PlayState,
    ) -> Self {
        self.os = os;
        self.difficulty = difficulty;
        self.user_owned = user_owned;
        self.root_owned = root_owned;
        self.play = play;
        self
    }

    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }
}

/// One catalog row; also the payload of a selection pick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogMachine {
    pub id: u64,
    pub name: String,
    pub os: String,
    pub difficulty: Option<Difficulty>,
    pub user_owned: bool,
    pub root_owned: bool,
    pub points: u32,
    pub rating: f32,
    pub release: Option<String>,
    pub user_owns_count: u32,
    pub root_owns_count: u32,
    pub competitive: bool,
    pub free: bool,
    pub feedback: Option<FeedbackHistogram>,
    pub seasonal: bool,
    pub retired: bool,
}

/// The ten difficulty-vote buckets the platform reports per machine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedbackHistogram(pub [u32; 10]);

impl FeedbackHistogram {
    pub fn buckets(&self) -> &[u32; 10] {
        &self.0
    }
}

/// Derived enable/disable state of the four lifecycle controls. Recomputed
/// from (fact, selection, in-flight) on demand, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    pub spawn: bool,
    pub stop: bool,
    pub reset: bool,
    pub submit: bool,
}

/// The platform's rank ladder, indexed by `rank_id - 1`.
pub const RANK_LADDER: [&str; 7] = [
    "Noob",
    "Script Kiddie",
    "Hacker",
    "Pro Hacker",
    "Elite Hacker",
    "Guru",
    "Omniscient",
];

pub fn rank_name(rank_id: u32) -> &'static str {
    let idx = rank_id.saturating_sub(1) as usize;
    RANK_LADDER.get(idx).copied().unwrap_or("Unranked")
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub rank_id: u32,
    pub ranking: Option<u32>,
    pub rank_progress: u32,
    pub points: u32,
    pub user_owns: u32,
    pub system_owns: u32,
    pub user_bloods: u32,
    pub system_bloods: u32,
    pub respects: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeasonStanding {
    pub league: Option<String>,
    pub rank: Option<u32>,
    pub total_ranks: u32,
    pub points: u32,
    pub flags_obtained: u32,
    pub flags_total: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum VpnStatus {
    #[default]
    Offline,
    Connected {
        location: String,
        hostname: String,
        ip4: String,
        through_pwnbox: bool,
        down: String,
        up: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub value: String,
}

fn platform_ts_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
            .expect("valid time format")
    })
}

/// Parse the platform's timestamps. Lifecycle payloads use
/// `"2024-01-01 12:00:00"` (UTC, no offset); catalog payloads use Rfc3339.
pub fn parse_platform_ts(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    time::PrimitiveDateTime::parse(raw, platform_ts_format())
        .ok()
        .map(|dt| dt.assume_utc())
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
