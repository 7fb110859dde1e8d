//! Binary entry point. `serve` (the default) runs the HTTP API; `browse`
//! opens the same catalog in the terminal browser.
use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use song_catalog::api::{self, Services};
use song_catalog::{open_store, run_app, App, Config, MemoryStore, SharedStore};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: song-catalog [serve [--memory] | browse]";

enum Command {
    Serve { memory: bool },
    Browse,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut command = None;
    let mut memory = false;

    for arg in args {
        match arg.as_str() {
            "serve" if command.is_none() => command = Some("serve"),
            "browse" if command.is_none() => command = Some("browse"),
            "--memory" => memory = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unexpected argument '{other}'\n{USAGE}"),
        }
    }

    match command.unwrap_or("serve") {
        "browse" if memory => bail!("--memory only applies to serve\n{USAGE}"),
        "browse" => Ok(Command::Browse),
        _ => Ok(Command::Serve { memory }),
    }
}

fn main() -> Result<()> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_args(&args)?;
    let config = Config::from_env()?;

    match command {
        Command::Serve { memory } => serve(config, memory),
        Command::Browse => browse(config),
    }
}

fn serve(config: Config, memory: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store: SharedStore = if memory {
        tracing::info!("using in-memory store, data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(open_store(&config.database_path)?)
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(api::serve(
        config.bind_addr,
        Services::new(store, config.max_limit),
    ))
}

fn browse(config: Config) -> Result<()> {
    let store: SharedStore = Arc::new(open_store(&config.database_path)?);
    let mut app = App::new(store, config.max_limit);
    run_app(&mut app)
}
