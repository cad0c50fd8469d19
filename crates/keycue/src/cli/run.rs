//! `run` subcommand — the sync loop (hotkeys toggle parameters, LEDs track
//! the mixer).

use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

use keycue_lib::engine::SyncEngine;
use keycue_lib::lighting::{IndicatorDriver, OpenRgbDevice};
use keycue_lib::mixer::OscMixer;

use super::{RUNNING, Result};
use crate::hotkeys::{self, HotkeyMap};

pub(super) fn cmd_run(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path);
    super::validate(&config)?;
    let bindings = config.binding_set()?;
    if bindings.is_empty() {
        return Err(keycue_lib::KeycueError::Config(
            "no bindings configured".into(),
        ));
    }

    // Banner
    println!("Keycue — mixer state on keyboard LEDs.");
    println!("  Mixer:    {} (OSC)", config.mixer_addr);
    println!(
        "  Lighting: {} (device {})",
        config.lighting_addr, config.lighting_device
    );
    println!("Press Ctrl+C to exit (turns bound LEDs off).");
    println!();

    // Collaborators — unreachable here means no run at all.
    let mixer = OscMixer::connect(&config.mixer_addr, config.mixer_timeout())?;
    mixer.probe(&bindings[0].param)?;
    println!("[mixer]    {} answering", config.mixer_addr);

    let lighting = OpenRgbDevice::connect(&config.lighting_addr, config.lighting_device)?;
    let leds = IndicatorDriver::new(lighting);
    println!(
        "[lighting] {} device {} ready",
        config.lighting_addr, config.lighting_device
    );

    // Snapshot + first paint
    let mut engine = SyncEngine::initialize(bindings, &mixer, &leds)?;
    for (i, binding) in engine.bindings().iter().enumerate() {
        println!(
            "[init]     {} ({}) = {}",
            binding.param,
            binding.key,
            engine.value_at(i)
        );
    }

    let hotkeys = hotkeys::register(engine.bindings())?;
    println!(
        "[hotkeys]  {} of {} keys registered",
        hotkeys.registered_count(),
        engine.bindings().len()
    );
    println!();
    println!("Watching... (Ctrl+C to stop)");

    run_loop(
        &mut engine,
        &mixer,
        &leds,
        &hotkeys,
        config.poll_interval(),
    );

    // Restore: bound LEDs go dark so stale colors don't linger.
    println!();
    println!("Turning bound LEDs off...");
    leds.blank(engine.bindings().iter().map(|b| b.led));
    println!("Done.");
    Ok(())
}

/// Main loop: drain key releases into toggles, then reconcile out-of-band
/// changes, at the configured cadence. Both paths run on this one thread,
/// so toggle and reconcile never interleave on a binding.
fn run_loop(
    engine: &mut SyncEngine,
    mixer: &OscMixer,
    leds: &IndicatorDriver<OpenRgbDevice>,
    hotkeys: &HotkeyMap,
    interval: Duration,
) {
    while RUNNING.load(Ordering::SeqCst) {
        for trigger in hotkeys.drain_released() {
            if let Some(value) = engine.toggle(&trigger, mixer, leds)
                && let Some(binding) = engine.bindings().get(&trigger)
            {
                println!("[toggle]   {} ({trigger}) => {value}", binding.param);
            }
        }

        for change in engine.reconcile(mixer, leds) {
            let binding = &engine.bindings()[change.index];
            println!(
                "[sync]     {} ({}) => {}",
                binding.param, binding.key, change.value
            );
        }

        std::thread::sleep(interval);
    }
}
