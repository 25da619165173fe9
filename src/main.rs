use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use labdeck::api::{ApiClient, DEFAULT_BASE_URL};
use labdeck::credentials::ApiToken;
use labdeck::tui_shell::{self, DebugLevel, RunOptions};

#[derive(Parser)]
#[command(name = "labdeck")]
#[command(about = "Terminal dashboard for the lab platform", long_about = None)]
struct Cli {
    /// Platform API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Environment variable holding the bearer token
    #[arg(long, default_value = "LABDECK_TOKEN")]
    token_env: String,

    /// Active-machine poll interval in seconds
    #[arg(long, default_value_t = 10)]
    refresh_secs: u64,

    /// Console debug verbosity (none|low|medium|high)
    #[arg(long, default_value = "low")]
    debug: DebugLevel,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let token = ApiToken::from_env(&cli.token_env)?;
    let client = ApiClient::new(&cli.base_url, token)?;

    let opts = RunOptions {
        refresh: Duration::from_secs(cli.refresh_secs.max(1)),
        debug: cli.debug,
    };

    // One cooperative event loop; polling, commands, and rendering all
    // interleave on a single thread.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build runtime")?;
    rt.block_on(tui_shell::run(client, opts))
}
