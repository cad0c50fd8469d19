//! `config` subcommand — show current configuration and file path.

use std::path::Path;

use super::{Config, ConfigOutput, Result, kv, kv_indent, kv_width};

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().map(|p| p.exists()).unwrap_or(false);

    if json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
        return Ok(());
    }

    // Human-readable output
    let w = kv_width(&[
        "Config file:",
        "mixer_addr:",
        "mixer_timeout_ms:",
        "lighting_addr:",
        "lighting_device:",
        "poll_interval_ms:",
        "bindings:",
    ]);

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("mixer_addr:", &config.mixer_addr, w);
    kv_indent("mixer_timeout_ms:", config.mixer_timeout_ms, w);
    kv_indent("lighting_addr:", &config.lighting_addr, w);
    kv_indent("lighting_device:", config.lighting_device, w);
    kv_indent("poll_interval_ms:", config.poll_interval_ms, w);
    kv_indent(
        "bindings:",
        format_args!("{} configured (see 'keycue bindings')", config.bindings.len()),
        w,
    );

    if let Err(errors) = config.validate() {
        println!();
        println!("Problems:");
        for e in &errors {
            println!("  - {e}");
        }
    }
    Ok(())
}
