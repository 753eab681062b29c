//! Global keyboard shortcuts.
//!
//! A [`HotkeyRegistry`] is the process-wide listener list a host window
//! feeds key events into. Registering a binding returns a [`HotkeyGuard`];
//! dropping the guard removes the binding again.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const ALT: Self = Self {
        alt: true,
        ctrl: false,
        shift: false,
    };
}

/// A key press as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: char,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: char, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// A key together with the modifiers that must be held.
///
/// Matching requires the listed modifiers to be down and ignores any
/// others, so Alt+Shift+Q still triggers Alt+Q.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub key: char,
    pub modifiers: Modifiers,
}

impl Chord {
    /// Alt+Q, which toggles the 3D preview.
    pub const TOGGLE_PREVIEW: Self = Self {
        key: 'q',
        modifiers: Modifiers::ALT,
    };

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let m = event.modifiers;
        event.key == self.key
            && (!self.modifiers.alt || m.alt)
            && (!self.modifiers.ctrl || m.ctrl)
            && (!self.modifiers.shift || m.shift)
    }
}

/// What a binding asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    TogglePreview,
}

#[derive(Debug)]
struct Binding {
    id: u64,
    chord: Chord,
    action: HotkeyAction,
}

#[derive(Debug, Default)]
struct Bindings {
    next_id: u64,
    entries: Vec<Binding>,
}

/// Shared list of active key bindings.
#[derive(Debug, Clone, Default)]
pub struct HotkeyRegistry {
    inner: Arc<Mutex<Bindings>>,
}

impl HotkeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Bindings> {
        // A panic while holding the lock cannot leave the list half-edited.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds a binding that lives as long as the returned guard.
    #[must_use = "the binding is removed as soon as the guard is dropped"]
    pub fn register(&self, chord: Chord, action: HotkeyAction) -> HotkeyGuard {
        let mut bindings = self.lock();
        let id = bindings.next_id;
        bindings.next_id += 1;
        bindings.entries.push(Binding { id, chord, action });
        tracing::debug!("Registered hotkey {:?} -> {:?}", chord, action);
        HotkeyGuard {
            registry: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Returns the actions bound to this key event.
    pub fn dispatch(&self, event: &KeyEvent) -> Vec<HotkeyAction> {
        self.lock()
            .entries
            .iter()
            .filter(|b| b.chord.matches(event))
            .map(|b| b.action)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a binding registered until dropped.
#[derive(Debug)]
pub struct HotkeyGuard {
    registry: Weak<Mutex<Bindings>>,
    id: u64,
}

impl Drop for HotkeyGuard {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut bindings = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        bindings.entries.retain(|b| b.id != self.id);
        tracing::debug!("Deregistered hotkey binding {}", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt(key: char) -> KeyEvent {
        KeyEvent::new(key, Modifiers::ALT)
    }

    #[test]
    fn alt_q_matches_toggle() {
        let chord = Chord::TOGGLE_PREVIEW;
        assert!(chord.matches(&alt('q')));
        assert!(chord.matches(&KeyEvent::new(
            'q',
            Modifiers {
                alt: true,
                shift: true,
                ctrl: false
            }
        )));
        assert!(!chord.matches(&KeyEvent::new('q', Modifiers::default())));
        assert!(!chord.matches(&alt('w')));
    }

    #[test]
    fn dispatch_returns_bound_actions() {
        let registry = HotkeyRegistry::new();
        let _guard = registry.register(Chord::TOGGLE_PREVIEW, HotkeyAction::TogglePreview);
        assert_eq!(registry.dispatch(&alt('q')), [HotkeyAction::TogglePreview]);
        assert!(registry.dispatch(&alt('x')).is_empty());
    }

    #[test]
    fn dropping_guard_deregisters() {
        let registry = HotkeyRegistry::new();
        let guard = registry.register(Chord::TOGGLE_PREVIEW, HotkeyAction::TogglePreview);
        assert_eq!(registry.len(), 1);
        drop(guard);
        assert!(registry.is_empty());
        assert!(registry.dispatch(&alt('q')).is_empty());
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let registry = HotkeyRegistry::new();
        let guard = registry.register(Chord::TOGGLE_PREVIEW, HotkeyAction::TogglePreview);
        drop(registry);
        drop(guard);
    }

    #[test]
    fn guards_remove_only_their_own_binding() {
        let registry = HotkeyRegistry::new();
        let first = registry.register(Chord::TOGGLE_PREVIEW, HotkeyAction::TogglePreview);
        let _second = registry.register(Chord::TOGGLE_PREVIEW, HotkeyAction::TogglePreview);
        drop(first);
        assert_eq!(registry.dispatch(&alt('q')).len(), 1);
    }
}
