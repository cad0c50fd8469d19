//! Parameter sync engine — testable reconciliation logic decoupled from I/O.
//!
//! `SyncEngine` owns the last-known value of every bound parameter. Toggle
//! requests from the input side and periodic reconciliation passes both
//! flow through it: a toggle writes the mixer first and then updates the
//! indicator, a reconciliation pass detects out-of-band changes (made on
//! the mixer's own surface) and re-syncs the indicator colors. Callers wire
//! I/O sources to this state machine and keep all access on one thread.

use crate::binding::{Binding, BindingSet, ParamKind, ParamValue};
use crate::lighting::{IndicatorDriver, LightingDevice};
use crate::mixer::MixerParams;

/// One out-of-band change picked up by a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalChange {
    /// Index of the binding in the set.
    pub index: usize,
    pub value: ParamValue,
}

/// Live snapshot of every bound parameter, plus the reconciliation and
/// toggle operations that keep indicators in step with it.
pub struct SyncEngine {
    bindings: BindingSet,
    /// Last observed value per binding, same order as the set.
    tracked: Vec<ParamValue>,
}

impl SyncEngine {
    /// Read every binding's current value, remember it, and push its color.
    ///
    /// Must complete before any toggle or reconcile call; a read failure
    /// here is a startup failure, not a skippable per-binding one — a
    /// partial snapshot could not honor the indicator invariant.
    pub fn initialize(
        bindings: BindingSet,
        mixer: &impl MixerParams,
        leds: &IndicatorDriver<impl LightingDevice>,
    ) -> crate::error::Result<Self> {
        let mut tracked = Vec::with_capacity(bindings.len());
        for binding in bindings.iter() {
            let value = read_current(mixer, binding)?;
            if let Some(color) = binding.color_for(value) {
                leds.set(binding.led, color);
            }
            tracked.push(value);
        }
        Ok(SyncEngine { bindings, tracked })
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// Last observed value for a binding, by trigger key.
    pub fn last_value(&self, trigger: &str) -> Option<ParamValue> {
        self.bindings.position(trigger).map(|i| self.tracked[i])
    }

    /// Snapshot value by binding index.
    pub fn value_at(&self, index: usize) -> ParamValue {
        self.tracked[index]
    }

    /// Handle a toggle request for a trigger key.
    ///
    /// Unknown triggers are ignored (spurious key events are expected).
    /// A switch negates its last value; a level flips between its two
    /// reference endpoints, comparing against `end` only — a value that
    /// drifted elsewhere snaps to `end` on the next toggle. The mixer
    /// write always precedes the indicator update, so the indicator never
    /// shows a value that was not committed externally. On a failed write
    /// the snapshot is left untouched.
    ///
    /// Returns the new value, or `None` if nothing was toggled.
    pub fn toggle(
        &mut self,
        trigger: &str,
        mixer: &impl MixerParams,
        leds: &IndicatorDriver<impl LightingDevice>,
    ) -> Option<ParamValue> {
        let i = self.bindings.position(trigger)?;
        let binding = &self.bindings[i];
        let new = match (binding.kind, self.tracked[i]) {
            (ParamKind::Switch, ParamValue::Switch(last)) => {
                let new = !last;
                if let Err(e) = mixer.write_switch(&binding.param, new) {
                    log::warn!("toggle {} ({trigger}): {e}", binding.param);
                    return None;
                }
                ParamValue::Switch(new)
            }
            (ParamKind::Level { origin, end }, ParamValue::Level(last)) => {
                let new = if last == end { origin } else { end };
                if let Err(e) = mixer.write_level(&binding.param, new) {
                    log::warn!("toggle {} ({trigger}): {e}", binding.param);
                    return None;
                }
                ParamValue::Level(new)
            }
            // Kind and value are paired at initialization and never diverge.
            _ => return None,
        };
        if let Some(color) = binding.color_for(new) {
            leds.set(binding.led, color);
        }
        self.tracked[i] = new;
        Some(new)
    }

    /// One full pass over all bindings: read the live value and, where it
    /// differs from the snapshot (exact comparison, no epsilon), push the
    /// new color and update the snapshot.
    ///
    /// A read failure on one binding is logged and skipped; the pass
    /// continues with the others, and the next pass naturally retries.
    pub fn reconcile(
        &mut self,
        mixer: &impl MixerParams,
        leds: &IndicatorDriver<impl LightingDevice>,
    ) -> Vec<ExternalChange> {
        let mut changes = Vec::new();
        for i in 0..self.bindings.len() {
            let binding = &self.bindings[i];
            let current = match read_current(mixer, binding) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("sync {} ({}): {e}", binding.param, binding.key);
                    continue;
                }
            };
            if current != self.tracked[i] {
                if let Some(color) = binding.color_for(current) {
                    leds.set(binding.led, color);
                }
                self.tracked[i] = current;
                changes.push(ExternalChange { index: i, value: current });
            }
        }
        changes
    }
}

/// Read a binding's live value, typed by its kind.
fn read_current(mixer: &impl MixerParams, binding: &Binding) -> crate::mixer::Result<ParamValue> {
    match binding.kind {
        ParamKind::Switch => mixer.read_switch(&binding.param).map(ParamValue::Switch),
        ParamKind::Level { .. } => mixer.read_level(&binding.param).map(ParamValue::Level),
    }
}
