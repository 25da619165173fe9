use std::fmt;
use std::io::{self, IsTerminal};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::ApiClient;

mod app;
mod commands;
mod event_loop;
mod events;
mod input;
mod render;
mod status;
mod suggest;

// Shared across the shell's submodules via `super::`.
use commands::CommandDef;
use events::CatalogTab;

/// Console debug verbosity; entries above the threshold stay out of the
/// scroll log. Adjustable at runtime with the `debug` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    None,
    #[default]
    Low,
    Medium,
    High,
}

impl DebugLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebugLevel::None => "none",
            DebugLevel::Low => "low",
            DebugLevel::Medium => "medium",
            DebugLevel::High => "high",
        }
    }
}

impl FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(DebugLevel::None),
            "low" => Ok(DebugLevel::Low),
            "medium" => Ok(DebugLevel::Medium),
            "high" => Ok(DebugLevel::High),
            other => Err(format!("unknown debug level: {}", other)),
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Active-machine poll interval.
    pub refresh: Duration,
    pub debug: DebugLevel,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            refresh: Duration::from_secs(10),
            debug: DebugLevel::Low,
        }
    }
}

pub async fn run(client: ApiClient, opts: RunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("the dashboard requires an interactive terminal (TTY)");
    }

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, client, opts).await;

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}
