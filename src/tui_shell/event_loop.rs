use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

use crate::api::{ApiClient, SearchScope};
use crate::ping;
use crate::state::{ActiveMachineTracker, ContextEvent, LifecycleAction, TrackerEvent};

use super::app::App;
use super::commands::{self, ParsedCommand};
use super::events::{AppEvent, CatalogTab};
use super::{DebugLevel, RunOptions, render};

const VPN_INTERVAL: Duration = Duration::from_secs(15);
const PING_INTERVAL: Duration = Duration::from_secs(5);

struct LoopCtx {
    gateway: Arc<ApiClient>,
    tx: UnboundedSender<AppEvent>,
    poke: Arc<Notify>,
}

pub(super) async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: ApiClient,
    opts: RunOptions,
) -> Result<()> {
    let gateway = Arc::new(client);
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let poke = Arc::new(Notify::new());
    let ctx = LoopCtx {
        gateway: gateway.clone(),
        tx: tx.clone(),
        poke: poke.clone(),
    };

    let mut app = App::new(opts.debug);

    // Tracker events merge into the app queue through a forwarder so the
    // reconciler sees one strictly-ordered stream.
    let (tracker_tx, mut tracker_rx) = mpsc::unbounded_channel::<TrackerEvent>();
    let tracker = ActiveMachineTracker::new(gateway.clone());
    let tracker_task = tokio::spawn(tracker.run(opts.refresh, poke.clone(), tracker_tx));
    let forwarder_task = {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(event) = tracker_rx.recv().await {
                if tx.send(AppEvent::Tracker(event)).is_err() {
                    break;
                }
            }
        })
    };

    let vpn_task = spawn_vpn_poll(&ctx);
    spawn_account_fetch(&ctx);
    spawn_catalog_fetches(&ctx);

    let mut ping_task: Option<(String, JoinHandle<()>)> = None;
    let mut term_events = EventStream::new();
    // Keeps relative readouts (expiry, spinner-ish state) moving while idle.
    let mut redraw = tokio::time::interval(Duration::from_millis(250));

    loop {
        terminal.draw(|f| render::draw(f, &app)).context("draw")?;
        if app.quit {
            break;
        }

        tokio::select! {
            maybe_event = term_events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut app, key, &ctx);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => app.push_error(format!("terminal input: {}", err)),
                None => break,
            },
            Some(event) = rx.recv() => {
                handle_app_event(&mut app, event, &ctx);
            }
            _ = redraw.tick() => {}
        }

        sync_ping_task(&app, &ctx, &mut ping_task);
    }

    // The in-flight HTTP request (if any) is abandoned with the process; the
    // platform exposes no cancellation.
    tracker_task.abort();
    forwarder_task.abort();
    vpn_task.abort();
    if let Some((_, task)) = ping_task {
        task.abort();
    }

    Ok(())
}

// Background fetches -------------------------------------------------------

fn spawn_vpn_poll(ctx: &LoopCtx) -> JoinHandle<()> {
    let gateway = ctx.gateway.clone();
    let tx = ctx.tx.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(VPN_INTERVAL);
        loop {
            ticker.tick().await;
            let result = gateway.vpn_status().await.map_err(|e| format!("{:#}", e));
            if tx.send(AppEvent::Vpn(result)).is_err() {
                break;
            }
        }
    })
}

fn spawn_account_fetch(ctx: &LoopCtx) {
    let gateway = ctx.gateway.clone();
    let tx = ctx.tx.clone();
    tokio::spawn(async move {
        let profile = gateway.profile().await.map_err(|e| format!("{:#}", e));
        let _ = tx.send(AppEvent::Profile(profile));
        let season = gateway
            .season_standing()
            .await
            .map_err(|e| format!("{:#}", e));
        let _ = tx.send(AppEvent::Season(season));
    });
}

fn spawn_catalog_fetches(ctx: &LoopCtx) {
    for tab in [CatalogTab::Current, CatalogTab::Seasonal, CatalogTab::Retired] {
        let gateway = ctx.gateway.clone();
        let tx = ctx.tx.clone();
        tokio::spawn(async move {
            let result = match tab {
                CatalogTab::Current => gateway.current_machines().await,
                CatalogTab::Seasonal => gateway.seasonal_machines().await,
                CatalogTab::Retired => gateway.retired_machines().await,
            }
            .map_err(|e| format!("{:#}", e));
            let _ = tx.send(AppEvent::Catalog { tab, result });
        });
    }
}

/// Keep the latency probe aligned with the active machine: start it when an
/// IP appears, stop it when the machine goes away or changes address.
fn sync_ping_task(app: &App, ctx: &LoopCtx, slot: &mut Option<(String, JoinHandle<()>)>) {
    let desired = app.active_ip();

    if let Some((ip, _)) = slot {
        if desired.as_deref() == Some(ip.as_str()) {
            return;
        }
    }
    if let Some((_, task)) = slot.take() {
        task.abort();
    }

    let Some(ip) = desired else {
        return;
    };
    let tx = ctx.tx.clone();
    let host = ip.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PING_INTERVAL);
        loop {
            ticker.tick().await;
            let sample = ping::ping_once(&host).await.ok().flatten();
            if tx.send(AppEvent::Ping(sample)).is_err() {
                break;
            }
        }
    });
    *slot = Some((ip, task));
}

// App events ----------------------------------------------------------------

fn handle_app_event(app: &mut App, event: AppEvent, ctx: &LoopCtx) {
    match event {
        AppEvent::Tracker(tracker_event) => app.apply_tracker(tracker_event),

        AppEvent::Profile(Ok(profile)) => app.profile = Some(profile),
        AppEvent::Profile(Err(err)) => app.push_error(format!("profile fetch: {}", err)),

        AppEvent::Season(Ok(season)) => app.season = season,
        AppEvent::Season(Err(err)) => app.push_error(format!("season fetch: {}", err)),

        AppEvent::Vpn(Ok(vpn)) => app.vpn = vpn,
        AppEvent::Vpn(Err(err)) => {
            app.push_debug(DebugLevel::Low, format!("connection status: {}", err));
        }

        AppEvent::Catalog { tab, result } => match result {
            Ok(rows) => {
                app.push_debug(
                    DebugLevel::Medium,
                    format!("{} machines: {} rows", tab.title(), rows.len()),
                );
                app.set_catalog(tab, rows);
            }
            Err(err) => app.push_error(format!("{} machines fetch: {}", tab.title(), err)),
        },

        AppEvent::Search { scope, term, result } => match result {
            Ok(hits) => {
                let mut lines = Vec::with_capacity(hits.len() + 2);
                for (i, hit) in hits.iter().enumerate() {
                    lines.push(format!("{:>3}  {:>8}  {}", i, hit.id, hit.value));
                }
                lines.push(format!(
                    "[*] Found {} {} named {}",
                    hits.len(),
                    scope,
                    term
                ));
                if scope == "machines" {
                    lines.push("[*] Use the id to spawn one: start <id>".to_string());
                }
                app.push_output(lines);
            }
            Err(err) => app.push_error(format!("search: {}", err)),
        },

        AppEvent::Command(outcome) => {
            // Always releases the in-flight slot, whatever came back.
            app.dispatcher.complete();
            match &outcome.result {
                Ok(message) => {
                    app.push_output(vec![format!("[!] {}", message)]);
                    // Converge quickly instead of waiting out the interval.
                    ctx.poke.notify_one();
                }
                Err(err) => {
                    app.push_error(format!("{}: {}", outcome.action.verb(), err));
                }
            }
        }

        AppEvent::Ping(sample) => app.ping_ms = sample,
    }
}

// Key handling --------------------------------------------------------------

fn handle_key(app: &mut App, key: KeyEvent, ctx: &LoopCtx) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => {
            if app.input.buf.is_empty() {
                app.quit = true;
            } else {
                app.input.clear();
                app.recompute_suggestions();
            }
        }

        KeyCode::Enter => {
            if app.input.buf.is_empty() {
                app.pick_under_cursor();
                return;
            }
            let line = app.input.buf.clone();
            app.input.push_history(&line);
            app.input.clear();
            app.recompute_suggestions();
            app.push_command(&line);
            run_command(app, &line, ctx);
        }

        KeyCode::Tab => {
            if app.input.buf.is_empty() {
                app.next_tab();
            } else if let Some(def) = app.suggestions.get(app.suggestion_selected).copied() {
                app.input.set(format!("{} ", def.name));
                app.recompute_suggestions();
            }
        }

        KeyCode::Up => {
            if app.input.buf.is_empty() {
                app.move_cursor(-1);
            } else if !app.suggestions.is_empty() {
                let n = app.suggestions.len();
                app.suggestion_selected = (app.suggestion_selected + n - 1) % n;
            } else {
                app.input.history_up();
                app.recompute_suggestions();
            }
        }
        KeyCode::Down => {
            if app.input.buf.is_empty() {
                app.move_cursor(1);
            } else if !app.suggestions.is_empty() {
                app.suggestion_selected = (app.suggestion_selected + 1) % app.suggestions.len();
            } else {
                app.input.history_down();
                app.recompute_suggestions();
            }
        }

        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),

        KeyCode::Backspace => {
            app.input.backspace();
            app.recompute_suggestions();
        }

        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.clear();
            app.recompute_suggestions();
        }

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert_char(c);
            app.recompute_suggestions();
        }

        _ => {}
    }
}

// Commands ------------------------------------------------------------------

fn run_command(app: &mut App, line: &str, ctx: &LoopCtx) {
    match commands::parse_command(line) {
        ParsedCommand::Empty => {}

        ParsedCommand::Help => {
            let lines = commands::command_defs()
                .iter()
                .map(|def| format!("{:<28} {}", def.usage, def.help))
                .collect();
            app.push_output(lines);
        }

        ParsedCommand::Clear => app.log.clear(),

        ParsedCommand::Quit => app.quit = true,

        ParsedCommand::Refresh => {
            app.push_output(vec!["[+] Refreshing".to_string()]);
            spawn_account_fetch(ctx);
            spawn_catalog_fetches(ctx);
            ctx.poke.notify_one();
        }

        ParsedCommand::Debug(None) => {
            let level = app.debug_level;
            app.push_output(vec![format!("debug level: {}", level)]);
        }
        ParsedCommand::Debug(Some(level)) => {
            app.debug_level = level;
            app.push_output(vec![format!("debug level set to {}", level)]);
        }

        ParsedCommand::Start(explicit_id) => {
            if let Some(id) = explicit_id {
                let Some(entry) = app.find_machine(id) else {
                    app.push_error(format!("no machine with id {} in the catalog", id));
                    return;
                };
                if let Some(change) = app.context.apply(ContextEvent::SelectionPicked(entry)) {
                    app.push_debug(DebugLevel::Medium, change);
                }
            }
            dispatch(app, LifecycleAction::Spawn, ctx);
        }

        ParsedCommand::Stop => dispatch(app, LifecycleAction::Stop, ctx),
        ParsedCommand::Reset => dispatch(app, LifecycleAction::Reset, ctx),
        ParsedCommand::Submit(flag) => dispatch(app, LifecycleAction::SubmitFlag(flag), ctx),

        ParsedCommand::Find { scope, term } => {
            app.push_output(vec![format!(
                "[+] Finding {} named {}",
                scope.tag(),
                term
            )]);
            let gateway = ctx.gateway.clone();
            let tx = ctx.tx.clone();
            tokio::spawn(async move {
                let result = gateway
                    .search(scope, &term)
                    .await
                    .map_err(|e| format!("{:#}", e));
                let _ = tx.send(AppEvent::Search {
                    scope: scope.tag(),
                    term,
                    result,
                });
            });
        }

        ParsedCommand::Usage(usage) => app.push_output(vec![format!("Usage: {}", usage)]),

        ParsedCommand::Unknown(cmd) => app.push_error(format!("invalid command: {}", cmd)),
    }
}

fn dispatch(app: &mut App, action: LifecycleAction, ctx: &LoopCtx) {
    let announce = match &action {
        LifecycleAction::Spawn => "[+] Starting machine",
        LifecycleAction::Stop => "[-] Stopping machine",
        LifecycleAction::Reset => "[+] Resetting machine",
        LifecycleAction::SubmitFlag(_) => "[+] Submitting flag",
    };

    match app.dispatcher.prepare(action, &app.context) {
        Err(rejected) => app.push_error(rejected.to_string()),
        Ok(prepared) => {
            match app.context.target_id() {
                Some(id) => app.push_output(vec![format!("{} (id: {})", announce, id)]),
                None => app.push_output(vec![announce.to_string()]),
            }
            let gateway = ctx.gateway.clone();
            let tx = ctx.tx.clone();
            tokio::spawn(async move {
                let outcome = prepared.execute(gateway).await;
                let _ = tx.send(AppEvent::Command(outcome));
            });
        }
    }
}
