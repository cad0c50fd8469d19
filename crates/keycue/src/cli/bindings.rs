//! `bindings` subcommand — print the configured binding table.

use std::path::Path;

use keycue_lib::binding::ParamKind;

use super::{BindingJson, Result};

pub(super) fn cmd_bindings(json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path);
    super::validate(&config)?;
    let bindings = config.binding_set()?;

    if json {
        let rows: Vec<BindingJson> = bindings
            .iter()
            .map(|b| match b.kind {
                ParamKind::Switch => BindingJson {
                    key: b.key.clone(),
                    location: b.param.to_string(),
                    led: b.led,
                    kind: "switch".into(),
                    origin: None,
                    end: None,
                },
                ParamKind::Level { origin, end } => BindingJson {
                    key: b.key.clone(),
                    location: b.param.to_string(),
                    led: b.led,
                    kind: "level".into(),
                    origin: Some(origin),
                    end: Some(end),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows).unwrap());
        return Ok(());
    }

    println!(
        "{:<10} {:<18} {:<5} {:<8} Range",
        "Key", "Location", "LED", "Kind"
    );
    for b in bindings.iter() {
        match b.kind {
            ParamKind::Switch => {
                println!(
                    "{:<10} {:<18} {:<5} {:<8} -",
                    b.key,
                    b.param.to_string(),
                    b.led,
                    "switch",
                );
            }
            ParamKind::Level { origin, end } => {
                println!(
                    "{:<10} {:<18} {:<5} {:<8} {origin} -> {end}",
                    b.key,
                    b.param.to_string(),
                    b.led,
                    "level",
                );
            }
        }
    }
    Ok(())
}
