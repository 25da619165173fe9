use crate::model::{CatalogMachine, ControlState, Profile, SeasonStanding, VpnStatus};
use crate::state::{
    CommandDispatcher, Context, ContextEvent, ContextState, TrackerEvent,
};

use super::input::Input;
use super::suggest::suggestions_for;
use super::{CatalogTab, CommandDef, DebugLevel, commands};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum EntryKind {
    Output,
    Error,
    Command,
    Debug,
}

/// One console entry; the in-app log is the observability surface.
#[derive(Clone, Debug)]
pub(super) struct LogEntry {
    pub(super) kind: EntryKind,
    pub(super) lines: Vec<String>,
    pub(super) ts: String,
}

pub(super) struct App {
    pub(super) debug_level: DebugLevel,

    pub(super) profile: Option<Profile>,
    pub(super) season: Option<SeasonStanding>,
    pub(super) vpn: VpnStatus,

    pub(super) tab: CatalogTab,
    pub(super) current: Vec<CatalogMachine>,
    pub(super) seasonal: Vec<CatalogMachine>,
    pub(super) retired: Vec<CatalogMachine>,
    pub(super) cursor: usize,

    pub(super) context: ContextState,
    pub(super) dispatcher: CommandDispatcher,
    pub(super) ping_ms: Option<u64>,

    pub(super) log: Vec<LogEntry>,
    pub(super) input: Input,
    pub(super) suggestions: Vec<CommandDef>,
    pub(super) suggestion_selected: usize,

    pub(super) quit: bool,

    // One announcement block per lock, like the old "active machine found"
    // console banner.
    announced_active: bool,
}

impl App {
    pub(super) fn new(debug_level: DebugLevel) -> Self {
        let mut app = App {
            debug_level,
            profile: None,
            season: None,
            vpn: VpnStatus::Offline,
            tab: CatalogTab::Current,
            current: Vec::new(),
            seasonal: Vec::new(),
            retired: Vec::new(),
            cursor: 0,
            context: ContextState::new(),
            dispatcher: CommandDispatcher::new(),
            ping_ms: None,
            log: Vec::new(),
            input: Input::default(),
            suggestions: Vec::new(),
            suggestion_selected: 0,
            quit: false,
            announced_active: false,
        };
        app.push_output(vec![
            "Welcome to labdeck.".to_string(),
            "Type `help` for commands; Tab cycles catalog tabs.".to_string(),
        ]);
        app
    }

    // Console log ----------------------------------------------------------

    fn push_entry(&mut self, kind: EntryKind, lines: Vec<String>) {
        self.log.push(LogEntry {
            kind,
            lines,
            ts: now_ts(),
        });
    }

    pub(super) fn push_output(&mut self, lines: Vec<String>) {
        self.push_entry(EntryKind::Output, lines);
    }

    pub(super) fn push_error(&mut self, message: String) {
        self.push_entry(EntryKind::Error, vec![format!("[!] {}", message)]);
    }

    pub(super) fn push_command(&mut self, line: &str) {
        self.push_entry(EntryKind::Command, vec![format!("> {}", line)]);
    }

    /// Leveled debug entry; dropped when above the configured verbosity.
    pub(super) fn push_debug(&mut self, level: DebugLevel, payload: String) {
        if level == DebugLevel::None || level > self.debug_level {
            return;
        }
        self.push_entry(EntryKind::Debug, vec![format!("[{}] {}", level, payload)]);
    }

    // Catalog --------------------------------------------------------------

    pub(super) fn rows(&self) -> &[CatalogMachine] {
        self.rows_for(self.tab)
    }

    pub(super) fn rows_for(&self, tab: CatalogTab) -> &[CatalogMachine] {
        match tab {
            CatalogTab::Current => &self.current,
            CatalogTab::Seasonal => &self.seasonal,
            CatalogTab::Retired => &self.retired,
        }
    }

    pub(super) fn selected_row(&self) -> Option<&CatalogMachine> {
        self.rows().get(self.cursor)
    }

    pub(super) fn set_catalog(&mut self, tab: CatalogTab, rows: Vec<CatalogMachine>) {
        match tab {
            CatalogTab::Current => self.current = rows,
            CatalogTab::Seasonal => self.seasonal = rows,
            CatalogTab::Retired => self.retired = rows,
        }
        if self.tab == tab {
            self.cursor = self.cursor.min(self.rows().len().saturating_sub(1));
        }

        // A selection whose backing row disappeared is dropped.
        let stale = matches!(
            self.context.context(),
            Context::Browsing(entry) if !self.catalog_has(entry.id)
        ) || self
            .context
            .remembered()
            .is_some_and(|entry| !self.catalog_has(entry.id));
        if stale {
            if let Some(change) = self.context.clear_selection() {
                self.push_debug(DebugLevel::Low, change);
            }
        }
    }

    fn catalog_has(&self, id: u64) -> bool {
        self.current
            .iter()
            .chain(self.seasonal.iter())
            .chain(self.retired.iter())
            .any(|m| m.id == id)
    }

    pub(super) fn find_machine(&self, id: u64) -> Option<CatalogMachine> {
        self.current
            .iter()
            .chain(self.seasonal.iter())
            .chain(self.retired.iter())
            .find(|m| m.id == id)
            .cloned()
    }

    pub(super) fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.cursor = 0;
    }

    /// Move the catalog highlight; the highlighted row is the selection.
    pub(super) fn move_cursor(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let next = self.cursor.saturating_add_signed(delta).min(len - 1);
        self.cursor = next;
        self.pick_under_cursor();
    }

    pub(super) fn pick_under_cursor(&mut self) {
        let Some(entry) = self.selected_row().cloned() else {
            return;
        };
        if let Some(change) = self
            .context
            .apply(ContextEvent::SelectionPicked(entry))
        {
            self.push_debug(DebugLevel::Medium, change);
        }
    }

    // Tracker --------------------------------------------------------------

    pub(super) fn apply_tracker(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::Fact { fact, detail_error } => {
                if let Some(err) = detail_error {
                    self.push_debug(DebugLevel::Low, format!("machine detail fetch: {}", err));
                }
                self.push_debug(DebugLevel::High, format!("active machine poll: {:?}", fact));

                let arrived = fact.id.is_some();
                if let Some(change) = self.context.apply(ContextEvent::FactUpdated(fact)) {
                    self.push_debug(DebugLevel::Low, change);
                }

                if arrived && !self.announced_active {
                    self.announced_active = true;
                    self.announce_active();
                } else if !arrived {
                    self.announced_active = false;
                    self.ping_ms = None;
                }
            }
            TrackerEvent::Error(err) => {
                self.push_error(format!("active machine refresh: {}", err));
            }
        }
    }

    fn announce_active(&mut self) {
        let Context::Locked(fact) = self.context.context() else {
            return;
        };
        let unknown = || "?".to_string();
        let lines = vec![
            "[+] Active machine found".to_string(),
            format!("[*] Name: {}", fact.name.clone().unwrap_or_else(unknown)),
            format!("[*] IP: {}", fact.ip.clone().unwrap_or_else(unknown)),
            format!("[*] OS: {}", fact.os.clone().unwrap_or_else(unknown)),
            format!(
                "[*] Difficulty: {}",
                fact.difficulty.map(|d| d.to_string()).unwrap_or_else(unknown)
            ),
        ];
        self.push_output(lines);
    }

    /// IP to ping, present only while a machine is active.
    pub(super) fn active_ip(&self) -> Option<String> {
        match self.context.context() {
            Context::Locked(fact) => fact.ip.clone(),
            _ => None,
        }
    }

    // Controls ---------------------------------------------------------------

    pub(super) fn control_state(&self) -> ControlState {
        self.context.control_state(self.dispatcher.in_flight())
    }

    // Input ------------------------------------------------------------------

    pub(super) fn recompute_suggestions(&mut self) {
        self.suggestions = if self.input.buf.trim().is_empty() {
            Vec::new()
        } else {
            suggestions_for(&self.input.buf, &commands::command_defs())
        };
        self.suggestion_selected = 0;
    }
}

pub(super) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}
