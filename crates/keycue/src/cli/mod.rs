//! CLI subcommands — sync loop, live status, binding table, config.

mod bindings;
mod config_cmd;
mod run;
mod status;

use std::path::Path;

use clap::Subcommand;
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use keycue_lib::config::Config;
pub(super) use keycue_lib::error::Result;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
pub(super) fn kv_width(keys: &[&str]) -> usize {
    keys.iter().map(|k| k.len()).max().unwrap_or(0) + PADDING
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w);
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w.saturating_sub(2));
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

#[derive(Serialize)]
pub(super) struct BindingJson {
    pub key: String,
    pub location: String,
    pub led: u32,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f32>,
}

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub mixer_addr: String,
    pub bindings: Vec<BindingStatusJson>,
}

#[derive(Serialize)]
pub(super) struct BindingStatusJson {
    pub key: String,
    pub location: String,
    pub led: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the sync loop (hotkeys toggle parameters, LEDs track the mixer)
    Run,

    /// Read every bound parameter and show its live value and color
    Status,

    /// Print the configured binding table
    Bindings,

    /// Show configuration file path and effective settings
    Config,
}

pub fn run(command: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match command {
        Command::Run => run::cmd_run(config_path),
        Command::Status => status::cmd_status(json, config_path),
        Command::Bindings => bindings::cmd_bindings(json, config_path),
        Command::Config => config_cmd::cmd_config(json, config_path),
    }
}

/// Load config from the given path or the default location, logging any
/// parse warnings.
pub(super) fn load_config(path: Option<&Path>) -> Config {
    let (config, warnings) = match path {
        Some(p) => Config::load_from(p),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    config
}

/// Fail fast on misconfiguration, listing every collected problem.
pub(super) fn validate(config: &Config) -> Result<()> {
    if let Err(errors) = config.validate() {
        let mut msg = String::from("invalid configuration:");
        for e in &errors {
            msg.push_str(&format!("\n  - {e}"));
        }
        return Err(keycue_lib::KeycueError::Config(msg));
    }
    Ok(())
}
