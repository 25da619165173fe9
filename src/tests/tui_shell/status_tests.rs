use super::*;

use time::Duration;

use crate::model::{Difficulty, PlayState};

fn profile() -> Profile {
    Profile {
        id: 1,
        name: "spellb00k".to_string(),
        rank_id: 3,
        ranking: Some(1337),
        rank_progress: 62,
        points: 180,
        user_owns: 25,
        system_owns: 21,
        user_bloods: 1,
        system_bloods: 0,
        respects: 9,
    }
}

fn locked_fact() -> Context {
    let fact = MachineFact::from_summary(
        42,
        "Corporate".to_string(),
        Some("10.10.11.9".to_string()),
        false,
    )
    .with_detail(
        Some("Linux".to_string()),
        Some(Difficulty::Insane),
        true,
        false,
        PlayState {
            spawned: true,
            player_count: 4,
            ..PlayState::default()
        },
    );
    Context::Locked(fact)
}

#[test]
fn profile_panel_shows_rank_and_season_block() {
    let season = SeasonStanding {
        league: Some("Holo".to_string()),
        rank: Some(211),
        total_ranks: 5000,
        points: 45,
        flags_obtained: 3,
        flags_total: 10,
    };
    let lines = profile_lines(Some(&profile()), Some(&season));
    let text = lines.join("\n");

    assert!(text.contains("spellb00k"));
    assert!(text.contains("Hacker"));
    assert!(text.contains("62%"));
    assert!(text.contains("211/5000"));
    assert!(text.contains("3/10"));
}

#[test]
fn profile_panel_without_data_shows_loading() {
    let lines = profile_lines(None, None);
    assert_eq!(lines, vec!["Loading profile...".to_string()]);
}

#[test]
fn vpn_panel_offline_and_connected() {
    assert_eq!(
        vpn_lines(&VpnStatus::Offline),
        vec!["No active connection".to_string()]
    );

    let connected = VpnStatus::Connected {
        location: "EU Free".to_string(),
        hostname: "edge-eu-free-1".to_string(),
        ip4: "10.10.14.7".to_string(),
        through_pwnbox: false,
        down: "1.2 Mbit".to_string(),
        up: "0.4 Mbit".to_string(),
    };
    let text = vpn_lines(&connected).join("\n");
    assert!(text.contains("EU Free -- 10.10.14.7"));
    assert!(text.contains("edge-eu-free-1"));
    assert!(text.contains("Pwnbox Inactive"));
}

#[test]
fn active_panel_without_a_machine() {
    let now = time::OffsetDateTime::now_utc();
    let lines = active_machine_lines(&Context::Empty, None, now);
    assert_eq!(lines, vec!["No active machine".to_string()]);
}

#[test]
fn active_panel_shows_fact_fields_and_ping() {
    let now = time::OffsetDateTime::now_utc();
    let text = active_machine_lines(&locked_fact(), Some(23), now).join("\n");

    assert!(text.contains("Corporate"));
    assert!(text.contains("10.10.11.9"));
    assert!(text.contains("# Players 4"));
    assert!(text.contains("Insane"));
    assert!(text.contains("Spawned"));
    assert!(text.contains("23ms"));
}

#[test]
fn active_panel_counts_down_expiry() {
    let now = time::OffsetDateTime::now_utc();
    let mut fact = MachineFact::from_summary(42, "Corporate".to_string(), None, false);
    fact.play.expires_at = Some(now + Duration::minutes(95));

    let text = active_machine_lines(&Context::Locked(fact), None, now).join("\n");
    assert!(text.contains("1h 35m left"), "got: {}", text);
}

#[test]
fn detail_panel_follows_the_selection() {
    let entry = CatalogMachine {
        id: 42,
        name: "Corporate".to_string(),
        os: "Linux".to_string(),
        difficulty: Some(Difficulty::Insane),
        points: 50,
        rating: 4.6,
        release: Some("2023-12-16T19:00:00.000000Z".to_string()),
        user_owns_count: 468,
        root_owns_count: 327,
        competitive: true,
        ..CatalogMachine::default()
    };
    let text = detail_lines(&Context::Browsing(entry)).join("\n");

    assert!(text.contains("Corporate :: 42"));
    assert!(text.contains("50 points"));
    assert!(text.contains("4.6 stars"));
    assert!(text.contains("Released 2023-12-16"));
    assert!(text.contains("Competitive"));
    assert!(text.contains("468"));
}

#[test]
fn detail_panel_pins_to_the_active_machine() {
    let text = detail_lines(&locked_fact()).join("\n");
    assert!(text.contains("Pinned to the active machine"));
    assert!(text.contains("Corporate :: 42"));

    let empty = detail_lines(&Context::Empty).join("\n");
    assert!(empty.contains("Select a machine"));
}

#[test]
fn control_hints_mirror_the_control_state() {
    let hints = control_hints(ControlState {
        spawn: true,
        stop: false,
        reset: false,
        submit: false,
    });
    assert_eq!(hints, vec![
        ("start", true),
        ("stop", false),
        ("reset", false),
        ("submit", false),
    ]);
}
