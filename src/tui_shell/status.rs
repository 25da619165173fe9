//! Pure panel-content builders; rendering proper stays in `render`.

use time::OffsetDateTime;

use crate::model::{
    CatalogMachine, ControlState, MachineFact, Profile, SeasonStanding, VpnStatus, parse_platform_ts,
    rank_name,
};
use crate::state::Context;

fn kv(key: &str, value: impl AsRef<str>) -> String {
    format!("{:<14}{}", key, value.as_ref())
}

pub(super) fn profile_lines(
    profile: Option<&Profile>,
    season: Option<&SeasonStanding>,
) -> Vec<String> {
    let Some(p) = profile else {
        return vec!["Loading profile...".to_string()];
    };

    let mut lines = vec![
        kv("Name", &p.name),
        kv("Rank", rank_name(p.rank_id)),
        kv("Progress", format!("{}%", p.rank_progress)),
        kv(
            "Ranking",
            p.ranking.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
        ),
        kv("Points", p.points.to_string()),
        kv("User Owns", p.user_owns.to_string()),
        kv("System Owns", p.system_owns.to_string()),
        kv("User Bloods", p.user_bloods.to_string()),
        kv("Sys Bloods", p.system_bloods.to_string()),
        kv("Respects", p.respects.to_string()),
    ];

    if let Some(s) = season {
        lines.push(String::new());
        lines.push(kv("League", s.league.as_deref().unwrap_or("-")));
        lines.push(kv(
            "Season Rank",
            match s.rank {
                Some(rank) => format!("{}/{}", rank, s.total_ranks),
                None => "-".to_string(),
            },
        ));
        lines.push(kv("Season Pts", s.points.to_string()));
        lines.push(kv(
            "Season Flags",
            format!("{}/{}", s.flags_obtained, s.flags_total),
        ));
    }

    lines
}

pub(super) fn vpn_lines(vpn: &VpnStatus) -> Vec<String> {
    match vpn {
        VpnStatus::Offline => vec!["No active connection".to_string()],
        VpnStatus::Connected {
            location,
            hostname,
            ip4,
            through_pwnbox,
            down,
            up,
        } => vec![
            format!("{} -- {}", location, ip4),
            hostname.clone(),
            if *through_pwnbox {
                "Pwnbox Active".to_string()
            } else {
                "Pwnbox Inactive".to_string()
            },
            format!("\u{2193} {} : \u{2191} {}", down, up),
        ],
    }
}

fn fact_status(fact: &MachineFact) -> Option<&'static str> {
    if fact.play.spawned {
        Some("Spawned")
    } else if fact.play.spawning {
        Some("Spawning")
    } else {
        None
    }
}

fn expires_in(fact: &MachineFact, now: OffsetDateTime) -> Option<String> {
    let expires = fact.play.expires_at?;
    let left = expires - now;
    let mins = left.whole_minutes();
    if mins <= 0 {
        return Some("expired".to_string());
    }
    Some(format!("{}h {:02}m left", mins / 60, mins % 60))
}

pub(super) fn active_machine_lines(
    context: &Context,
    ping_ms: Option<u64>,
    now: OffsetDateTime,
) -> Vec<String> {
    let Context::Locked(fact) = context else {
        return vec!["No active machine".to_string()];
    };

    let unknown = || "?".to_string();
    let mut lines = vec![
        format!(
            "{}  {}  # Players {}",
            fact.name.clone().unwrap_or_else(unknown),
            fact.ip.clone().unwrap_or_else(unknown),
            fact.play.player_count,
        ),
        format!(
            "{}  {}{}",
            fact.os.clone().unwrap_or_else(unknown),
            fact.difficulty.map(|d| d.to_string()).unwrap_or_else(unknown),
            if fact.seasonal { "  [seasonal]" } else { "" },
        ),
        format!(
            "User {}  Root {}",
            if fact.user_owned { "\u{2611}" } else { "\u{2610}" },
            if fact.root_owned { "\u{2611}" } else { "\u{2610}" },
        ),
    ];

    if let Some(status) = fact_status(fact) {
        lines.push(kv("Status", status));
    }
    if let Some(left) = expires_in(fact, now) {
        lines.push(kv("Expires", left));
    }
    if let Some(ms) = ping_ms {
        lines.push(kv("Ping", format!("{}ms", ms)));
    }

    lines
}

fn release_date(raw: &str) -> Option<String> {
    let ts = parse_platform_ts(raw)?;
    let fmt = time::format_description::parse("[year]-[month]-[day]").ok()?;
    ts.format(&fmt).ok()
}

fn selection_lines(entry: &CatalogMachine) -> Vec<String> {
    let mut lines = vec![format!("{} :: {}", entry.name, entry.id), entry.os.clone()];
    if let Some(d) = entry.difficulty {
        lines.push(d.to_string());
    }
    if entry.user_owned {
        lines.push("User owned".to_string());
    }
    if entry.root_owned {
        lines.push("Root owned".to_string());
    }
    if entry.seasonal {
        lines.push("Seasonal".to_string());
    } else {
        lines.push(format!("{} points", entry.points));
        lines.push(format!("{:.1} stars", entry.rating));
        if let Some(date) = entry.release.as_deref().and_then(release_date) {
            lines.push(format!("Released {}", date));
        }
        if entry.competitive {
            lines.push("Competitive".to_string());
        }
        lines.push(kv("User Owns", entry.user_owns_count.to_string()));
        lines.push(kv("Root Owns", entry.root_owns_count.to_string()));
    }
    lines
}

/// Detail pane: pinned to the active machine while one exists, else the
/// browsed catalog entry.
pub(super) fn detail_lines(context: &Context) -> Vec<String> {
    match context {
        Context::Empty => vec!["Select a machine from the catalog".to_string()],
        Context::Browsing(entry) => selection_lines(entry),
        Context::Locked(fact) => {
            let mut lines = vec!["Pinned to the active machine".to_string()];
            if let (Some(name), Some(id)) = (&fact.name, fact.id) {
                lines.push(format!("{} :: {}", name, id));
            }
            lines
        }
    }
}

/// Control hints rendered under the active-machine panel, one flag per
/// lifecycle command.
pub(super) fn control_hints(controls: ControlState) -> Vec<(&'static str, bool)> {
    vec![
        ("start", controls.spawn),
        ("stop", controls.stop),
        ("reset", controls.reset),
        ("submit", controls.submit),
    ]
}

#[cfg(test)]
#[path = "../tests/tui_shell/status_tests.rs"]
mod tests;
