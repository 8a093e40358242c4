use anyhow::{Context, Result};
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};

pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl HotkeyManager {
    /// Register the capture trigger, Alt+A.
    pub fn new() -> Result<Self> {
        Self::with_hotkey(Modifiers::ALT, Code::KeyA)
    }

    pub fn with_hotkey(modifiers: Modifiers, code: Code) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        let hotkey = HotKey::new(Some(modifiers), code);

        manager
            .register(hotkey)
            .context("Failed to register hotkey")?;

        Ok(Self { manager, hotkey })
    }

    /// Check if the hotkey was pressed (non-blocking).
    pub fn poll(&self) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        if let Ok(event) = receiver.try_recv() {
            event.id == self.hotkey.id() && event.state == HotKeyState::Pressed
        } else {
            false
        }
    }

    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        let _ = self.manager.unregister(self.hotkey);
    }
}
