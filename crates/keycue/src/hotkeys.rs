//! Global hotkey registration and event draining.

use std::collections::HashMap;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use keycue_lib::binding::BindingSet;
use keycue_lib::error::Result;

/// Registered hotkeys, mapped back to their binding trigger keys.
pub struct HotkeyMap {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
    by_id: HashMap<u32, String>,
}

/// Register one global hotkey per binding.
///
/// A key that fails to parse or register is warned about and skipped — its
/// LED still tracks the mixer through the poll loop, it just can't be
/// toggled from the keyboard.
pub fn register(bindings: &BindingSet) -> Result<HotkeyMap> {
    let manager = GlobalHotKeyManager::new().map_err(|e| {
        keycue_lib::KeycueError::Config(format!("Failed to init hotkey manager: {e}"))
    })?;
    let mut registered = Vec::new();
    let mut by_id = HashMap::new();
    for binding in bindings.iter() {
        let hotkey: HotKey = match binding.key.parse() {
            Ok(hk) => hk,
            Err(e) => {
                log::warn!("invalid hotkey '{}': {e}", binding.key);
                continue;
            }
        };
        let id = hotkey.id();
        if let Err(e) = manager.register(hotkey) {
            log::warn!("could not register hotkey '{}': {e}", binding.key);
            continue;
        }
        registered.push(hotkey);
        by_id.insert(id, binding.key.clone());
    }
    Ok(HotkeyMap {
        manager,
        registered,
        by_id,
    })
}

impl HotkeyMap {
    /// Drain pending hotkey events, returning the triggers whose keys were
    /// released (toggles fire on release, matching the key-up listener).
    pub fn drain_released(&self) -> Vec<String> {
        let rx = GlobalHotKeyEvent::receiver();
        let mut released = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if event.state == HotKeyState::Released
                && let Some(trigger) = self.by_id.get(&event.id)
            {
                released.push(trigger.clone());
            }
        }
        released
    }

    /// Number of successfully registered hotkeys.
    pub fn registered_count(&self) -> usize {
        self.by_id.len()
    }
}

impl Drop for HotkeyMap {
    fn drop(&mut self) {
        for hk in &self.registered {
            let _ = self.manager.unregister(*hk);
        }
    }
}
