//! Integration tests: end-to-end sync sequences using the mock mixer and
//! mock lighting device.
//!
//! These tests exercise the full initialize → toggle → external change →
//! reconcile cycle through the public API, verifying that mixer writes and
//! indicator pushes track the configured binding table.

use keycue_lib::binding::{ParamValue, StripParam};
use keycue_lib::color::Rgb;
use keycue_lib::config::Config;
use keycue_lib::engine::SyncEngine;
use keycue_lib::lighting::IndicatorDriver;
use keycue_lib::lighting::mock::MockLighting;
use keycue_lib::mixer::MixerParams;
use keycue_lib::mixer::mock::MockMixer;

/// Helper: mock mixer seeded with a value for every default binding.
fn seeded_mixer() -> MockMixer {
    let mixer = MockMixer::new();
    mixer.set_switch(&StripParam::new(0, "B1"), true);
    mixer.set_switch(&StripParam::new(0, "B2"), false);
    mixer.set_switch(&StripParam::new(0, "B3"), false);
    mixer.set_switch(&StripParam::new(5, "A1"), true);
    mixer.set_switch(&StripParam::new(6, "A1"), true);
    mixer.set_switch(&StripParam::new(7, "A1"), false);
    mixer.set_level(&StripParam::new(6, "gain"), 0.20);
    mixer.set_level(&StripParam::new(5, "gain"), 0.0);
    mixer.set_switch(&StripParam::new(6, "A3"), true);
    mixer
}

fn start() -> (MockMixer, IndicatorDriver<MockLighting>, SyncEngine) {
    let mixer = seeded_mixer();
    let leds = IndicatorDriver::new(MockLighting::new());
    let engine =
        SyncEngine::initialize(Config::default().binding_set().unwrap(), &mixer, &leds).unwrap();
    (mixer, leds, engine)
}

// ── Test: startup paints every configured LED ──

#[test]
fn initialize_paints_full_binding_table() {
    let (_mixer, leds, engine) = start();

    // One write per binding, colors matching the seeded values.
    assert_eq!(leds.device().writes.borrow().len(), engine.bindings().len());
    assert_eq!(leds.device().last_color(116), Some(Rgb::GREEN)); // B1 on
    assert_eq!(leds.device().last_color(117), Some(Rgb::RED)); // B2 off
    assert_eq!(leds.device().last_color(110), Some(Rgb::GREEN)); // gain at origin
    // 0.20 sits exactly halfway between 0.0 and 0.40
    assert_eq!(
        leds.device().last_color(109),
        Some(Rgb { r: 127, g: 127, b: 0 })
    );
}

// ── Test: a full keypress session ──

#[test]
fn toggle_session_round_trips_switches_and_levels() {
    let (mixer, leds, mut engine) = start();
    let b1 = StripParam::new(0, "B1");
    let gain = StripParam::new(5, "gain");

    // Key 1: mute off
    engine.toggle("Numpad1", &mixer, &leds);
    assert!(!mixer.read_switch(&b1).unwrap());
    assert_eq!(leds.device().last_color(116), Some(Rgb::RED));

    // Key 8: gain sits at origin (0.0), first toggle snaps to end (-30.0)
    engine.toggle("Numpad8", &mixer, &leds);
    assert_eq!(mixer.read_level(&gain).unwrap(), -30.0);
    assert_eq!(leds.device().last_color(110), Some(Rgb::RED));

    // Key 8 again: back to origin
    engine.toggle("Numpad8", &mixer, &leds);
    assert_eq!(mixer.read_level(&gain).unwrap(), 0.0);
    assert_eq!(leds.device().last_color(110), Some(Rgb::GREEN));

    // Key 1 again: original mute state restored
    engine.toggle("Numpad1", &mixer, &leds);
    assert!(mixer.read_switch(&b1).unwrap());
    assert_eq!(leds.device().last_color(116), Some(Rgb::GREEN));
}

// ── Test: control-surface changes land on the LEDs ──

#[test]
fn external_changes_show_up_after_reconcile() {
    let (mixer, leds, mut engine) = start();
    let gain6 = StripParam::new(6, "gain");

    // Someone drags the fader past the end anchor on the mixer UI.
    mixer.set_level(&gain6, 0.55);
    let changes = engine.reconcile(&mixer, &leds);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].value, ParamValue::Level(0.55));
    assert_eq!(leds.device().last_color(109), Some(Rgb::RED));

    // And below the origin anchor.
    mixer.set_level(&gain6, -0.05);
    engine.reconcile(&mixer, &leds);
    assert_eq!(leds.device().last_color(109), Some(Rgb::BLUE));

    // A quiet pass changes nothing.
    let writes = leds.device().writes.borrow().len();
    assert!(engine.reconcile(&mixer, &leds).is_empty());
    assert_eq!(leds.device().writes.borrow().len(), writes);
}

// ── Test: toggle after drift uses the observed value ──

#[test]
fn drifted_gain_snaps_to_end_then_cycles() {
    let (mixer, leds, mut engine) = start();
    let gain6 = StripParam::new(6, "gain");

    // Fader parked at an arbitrary position by the control surface.
    mixer.set_level(&gain6, 0.13);
    engine.reconcile(&mixer, &leds);

    // Not equal to end → toggle snaps to end first...
    engine.toggle("Numpad7", &mixer, &leds);
    assert_eq!(mixer.read_level(&gain6).unwrap(), 0.40);

    // ...then alternates between the endpoints.
    engine.toggle("Numpad7", &mixer, &leds);
    assert_eq!(mixer.read_level(&gain6).unwrap(), 0.0);
    engine.toggle("Numpad7", &mixer, &leds);
    assert_eq!(mixer.read_level(&gain6).unwrap(), 0.40);
}

// ── Test: one broken strip never stalls the others ──

#[test]
fn broken_binding_is_isolated_for_the_whole_session() {
    let (mixer, leds, mut engine) = start();
    mixer.fail_on(&StripParam::new(0, "B1"));

    // Toggling the broken strip does nothing visible.
    let before = leds.device().writes.borrow().len();
    assert_eq!(engine.toggle("Numpad1", &mixer, &leds), None);
    assert_eq!(leds.device().writes.borrow().len(), before);

    // The rest of the table keeps reconciling.
    mixer.set_switch(&StripParam::new(7, "A1"), true);
    let changes = engine.reconcile(&mixer, &leds);
    assert_eq!(changes.len(), 1);
    assert_eq!(leds.device().last_color(115), Some(Rgb::GREEN));

    // Once the strip recovers, the next pass picks it up again.
    mixer.fail_params.borrow_mut().clear();
    mixer.set_switch(&StripParam::new(0, "B1"), false);
    let changes = engine.reconcile(&mixer, &leds);
    assert_eq!(changes.len(), 1);
    assert_eq!(leds.device().last_color(116), Some(Rgb::RED));
}

// ── Test: dead LEDs never block mixer control ──

#[test]
fn lighting_outage_does_not_block_toggles() {
    let (mixer, leds, mut engine) = start();
    let b1 = StripParam::new(0, "B1");

    leds.device().fail_on(116);
    let v = engine.toggle("Numpad1", &mixer, &leds);
    assert_eq!(v, Some(ParamValue::Switch(false)));
    assert!(!mixer.read_switch(&b1).unwrap(), "mixer write must land");

    // The indicator heals on the next successful push.
    leds.device().fail_leds.borrow_mut().clear();
    engine.toggle("Numpad1", &mixer, &leds);
    assert_eq!(leds.device().last_color(116), Some(Rgb::GREEN));
}
