//! Keycue CLI — keyboard cue lights for a software audio mixer.

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

mod cli;
mod hotkeys;

/// Shared shutdown flag — set by Ctrl+C handler.
pub static RUNNING: AtomicBool = AtomicBool::new(true);

#[derive(Parser)]
#[command(
    name = "keycue",
    version,
    about = "Keyboard cue lights for a software audio mixer"
)]
struct Args {
    /// Output as JSON (for status, bindings, config)
    #[arg(long, global = true)]
    json: bool,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();

    ctrlc::set_handler(move || {
        RUNNING.store(false, Ordering::SeqCst);
    })
    .ok();

    if let Err(e) = cli::run(args.command, args.json, args.config.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
