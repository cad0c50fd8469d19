//! `status` subcommand — read every bound parameter and show its live
//! value and the color its indicator would carry.

use std::path::Path;

use keycue_lib::binding::{ParamKind, ParamValue};
use keycue_lib::mixer::{MixerParams, OscMixer};

use super::{BindingStatusJson, Result, StatusOutput};

pub(super) fn cmd_status(json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path);
    super::validate(&config)?;
    let bindings = config.binding_set()?;

    let mixer = OscMixer::connect(&config.mixer_addr, config.mixer_timeout())?;

    let mut rows = Vec::new();
    for binding in bindings.iter() {
        let read = match binding.kind {
            ParamKind::Switch => mixer.read_switch(&binding.param).map(ParamValue::Switch),
            ParamKind::Level { .. } => mixer.read_level(&binding.param).map(ParamValue::Level),
        };
        rows.push((binding, read));
    }

    if json {
        let output = StatusOutput {
            mixer_addr: config.mixer_addr.clone(),
            bindings: rows
                .iter()
                .map(|(binding, read)| match read {
                    Ok(value) => BindingStatusJson {
                        key: binding.key.clone(),
                        location: binding.param.to_string(),
                        led: binding.led,
                        value: Some(value.to_string()),
                        color: binding.color_for(*value).map(|c| c.to_string()),
                        error: None,
                    },
                    Err(e) => BindingStatusJson {
                        key: binding.key.clone(),
                        location: binding.param.to_string(),
                        led: binding.led,
                        value: None,
                        color: None,
                        error: Some(e.to_string()),
                    },
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
        return Ok(());
    }

    println!("Mixer: {}", config.mixer_addr);
    println!();
    println!("{:<10} {:<18} {:<5} {:<10} Color", "Key", "Location", "LED", "Value");
    for (binding, read) in &rows {
        match read {
            Ok(value) => {
                let color = binding
                    .color_for(*value)
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                println!(
                    "{:<10} {:<18} {:<5} {:<10} {color}",
                    binding.key,
                    binding.param.to_string(),
                    binding.led,
                    value.to_string(),
                );
            }
            Err(e) => {
                // One unreadable strip shouldn't hide the rest.
                println!(
                    "{:<10} {:<18} {:<5} unreadable ({e})",
                    binding.key,
                    binding.param.to_string(),
                    binding.led,
                );
            }
        }
    }
    Ok(())
}
