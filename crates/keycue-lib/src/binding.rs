//! Key-to-parameter bindings — the static table linking one hotkey to one
//! mixer parameter and one LED.

use std::fmt;

/// Addressable location of one mixer parameter: strip index + parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StripParam {
    pub strip: usize,
    pub name: String,
}

impl StripParam {
    pub fn new(strip: usize, name: impl Into<String>) -> Self {
        StripParam {
            strip,
            name: name.into(),
        }
    }
}

impl fmt::Display for StripParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strip[{}].{}", self.strip, self.name)
    }
}

/// What kind of value a binding carries. A level binding carries its
/// gradient reference pair inside the variant, so there is no optional
/// range to check before use.
///
/// Levels are `f32` throughout: that is what travels in an OSC float, and
/// keeping one width end to end means a value written to the mixer reads
/// back bit-identical — the toggle's exact `last == end` comparison
/// survives the wire round-trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Boolean parameter (mute, bus send).
    Switch,
    /// Continuous gain. `origin` is the gradient's green anchor, `end` the
    /// red anchor; either may be the numerically larger value.
    Level { origin: f32, end: f32 },
}

/// A live parameter value, matching its binding's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Switch(bool),
    Level(f32),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Switch(on) => write!(f, "{}", if *on { "on" } else { "off" }),
            ParamValue::Level(v) => write!(f, "{v}"),
        }
    }
}

/// One configured binding: trigger key → mixer parameter + LED.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Hotkey string, e.g. `"Numpad1"`. Unique across the set.
    pub key: String,
    pub param: StripParam,
    /// LED index on the lighting device.
    pub led: u32,
    pub kind: ParamKind,
}

impl Binding {
    /// Color for a value of this binding's kind.
    ///
    /// `None` on a kind mismatch, which well-formed callers never produce.
    pub fn color_for(&self, value: ParamValue) -> Option<crate::color::Rgb> {
        match (self.kind, value) {
            (ParamKind::Switch, ParamValue::Switch(on)) => Some(crate::color::for_switch(on)),
            (ParamKind::Level { origin, end }, ParamValue::Level(v)) => Some(
                crate::color::for_level(f64::from(v), f64::from(origin), f64::from(end)),
            ),
            _ => None,
        }
    }
}

/// Validated, immutable set of bindings. Construction fails on empty or
/// duplicate trigger keys; iteration preserves configured order.
#[derive(Debug, Clone)]
pub struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new(bindings: Vec<Binding>) -> crate::error::Result<Self> {
        for (i, b) in bindings.iter().enumerate() {
            if b.key.trim().is_empty() {
                return Err(crate::KeycueError::Config(format!(
                    "binding {} ({}) has an empty trigger key",
                    i + 1,
                    b.param
                )));
            }
            if bindings[..i].iter().any(|other| other.key == b.key) {
                return Err(crate::KeycueError::Config(format!(
                    "duplicate trigger key '{}'",
                    b.key
                )));
            }
        }
        Ok(BindingSet { bindings })
    }

    /// Look up a binding by trigger key.
    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.key == key)
    }

    /// Index of a binding by trigger key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::ops::Index<usize> for BindingSet {
    type Output = Binding;

    fn index(&self, i: usize) -> &Binding {
        &self.bindings[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch(key: &str, strip: usize, name: &str, led: u32) -> Binding {
        Binding {
            key: key.into(),
            param: StripParam::new(strip, name),
            led,
            kind: ParamKind::Switch,
        }
    }

    #[test]
    fn strip_param_display() {
        assert_eq!(StripParam::new(5, "gain").to_string(), "strip[5].gain");
    }

    #[test]
    fn accepts_unique_keys() {
        let set = BindingSet::new(vec![
            switch("Numpad1", 0, "B1", 116),
            switch("Numpad2", 0, "B2", 117),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = BindingSet::new(vec![
            switch("Numpad1", 0, "B1", 116),
            switch("Numpad1", 0, "B2", 117),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate trigger key 'Numpad1'"));
    }

    #[test]
    fn rejects_empty_key() {
        let err = BindingSet::new(vec![switch("  ", 0, "B1", 116)]).unwrap_err();
        assert!(err.to_string().contains("empty trigger key"));
    }

    #[test]
    fn empty_set_is_valid() {
        let set = BindingSet::new(vec![]).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn lookup_by_key() {
        let set = BindingSet::new(vec![
            switch("Numpad1", 0, "B1", 116),
            switch("Numpad2", 0, "B2", 117),
        ])
        .unwrap();
        assert_eq!(set.get("Numpad2").unwrap().led, 117);
        assert!(set.get("Numpad3").is_none());
        assert_eq!(set.position("Numpad2"), Some(1));
    }

    #[test]
    fn iteration_preserves_order() {
        let set = BindingSet::new(vec![
            switch("Numpad2", 0, "B2", 117),
            switch("Numpad1", 0, "B1", 116),
        ])
        .unwrap();
        let keys: Vec<&str> = set.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["Numpad2", "Numpad1"]);
    }

    #[test]
    fn param_value_display() {
        assert_eq!(ParamValue::Switch(true).to_string(), "on");
        assert_eq!(ParamValue::Switch(false).to_string(), "off");
        assert_eq!(ParamValue::Level(-15.0).to_string(), "-15");
    }

    #[test]
    fn color_for_matches_kind() {
        use crate::color::Rgb;

        let b = switch("Numpad1", 0, "B1", 116);
        assert_eq!(b.color_for(ParamValue::Switch(true)), Some(Rgb::GREEN));
        assert_eq!(b.color_for(ParamValue::Level(0.0)), None);

        let level = Binding {
            key: "Numpad8".into(),
            param: StripParam::new(5, "gain"),
            led: 110,
            kind: ParamKind::Level {
                origin: 0.0,
                end: -30.0,
            },
        };
        assert_eq!(level.color_for(ParamValue::Level(-30.0)), Some(Rgb::RED));
        assert_eq!(level.color_for(ParamValue::Switch(true)), None);
    }
}
