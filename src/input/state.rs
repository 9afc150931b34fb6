// SPDX-License-Identifier: GPL-3.0-only

//! Shared keyboard state with change notification.
//!
//! [`KeyboardState`] is the authoritative record of which modifier states
//! are currently active and which of them are sticky (latched). Many
//! independent modifier key controllers observe one shared instance; none of
//! them ever computes a resulting state locally. They request transitions
//! and re-render from the change notifications, so every observer converges
//! on the same authoritative value even when requests race.
//!
//! The store is single-threaded and synchronous: transitions apply
//! last-writer-wins and listeners run to completion within the same thread
//! turn, so an observer always sees a self-consistent `(active, sticky)`
//! pair.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Identifier of one modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateId {
    /// Shift modifier
    Shift,
    /// Caps-lock latch
    CapsLock,
    /// AltGr (right-alt) modifier
    AltGr,
    /// Control modifier
    Ctrl,
    /// Alt modifier
    Alt,
}

impl StateId {
    /// Returns the snake_case identifier string used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StateId::Shift => "shift",
            StateId::CapsLock => "caps_lock",
            StateId::AltGr => "alt_gr",
            StateId::Ctrl => "ctrl",
            StateId::Alt => "alt",
        }
    }

    /// Parses an identifier string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "shift" => Some(StateId::Shift),
            "caps_lock" => Some(StateId::CapsLock),
            "alt_gr" => Some(StateId::AltGr),
            "ctrl" => Some(StateId::Ctrl),
            "alt" => Some(StateId::Alt),
            _ => None,
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(active, sticky)` pair of one modifier state.
///
/// `sticky` is meaningful only while `active` is true; the store normalizes
/// requests so a stored pair never has `sticky` without `active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierFlags {
    /// Whether the state is currently active
    pub active: bool,
    /// Whether the active state is latched until explicitly toggled off
    pub sticky: bool,
}

impl ModifierFlags {
    /// Creates a flag pair.
    #[must_use]
    pub fn new(active: bool, sticky: bool) -> Self {
        Self { active, sticky }
    }

    /// The inactive pair.
    #[must_use]
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Handle returned by [`KeyboardState::on_change`].
///
/// Pass it back to [`KeyboardState::unsubscribe`] to stop the listener.
/// Dropping the handle without unsubscribing leaves the listener installed.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
}

type Listener = Rc<dyn Fn(StateId, ModifierFlags)>;

/// Observable store of the currently active modifier states.
///
/// Listeners registered through [`on_change`](Self::on_change) fire
/// synchronously for every applied transition, after the new value is
/// stored, so a listener reading back through
/// [`get_state`](Self::get_state) observes the post-transition value.
/// Listeners may re-enter the store (including requesting further
/// transitions); the listener list is snapshotted per dispatch.
#[derive(Default)]
pub struct KeyboardState {
    states: RefCell<HashMap<StateId, ModifierFlags>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

impl KeyboardState {
    /// Creates an empty store: every state inactive, no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current flags of one state.
    #[must_use]
    pub fn get_state(&self, id: StateId) -> ModifierFlags {
        self.states.borrow().get(&id).copied().unwrap_or_default()
    }

    /// Whether a state is currently active.
    #[must_use]
    pub fn is_active(&self, id: StateId) -> bool {
        self.get_state(id).active
    }

    /// Whether a state is currently active and sticky.
    #[must_use]
    pub fn is_sticky(&self, id: StateId) -> bool {
        self.get_state(id).sticky
    }

    /// Returns all currently active states in a consistent (sorted) order.
    #[must_use]
    pub fn active_states(&self) -> Vec<StateId> {
        let mut active: Vec<StateId> = self
            .states
            .borrow()
            .iter()
            .filter(|(_, flags)| flags.active)
            .map(|(id, _)| *id)
            .collect();
        active.sort();
        active
    }

    /// Requests a state transition.
    ///
    /// The request is normalized (`sticky` is dropped when `active` is
    /// false) and applied last-writer-wins. When the stored value actually
    /// changed, every listener is notified synchronously before this call
    /// returns. A request that leaves the state unchanged notifies nobody.
    pub fn request_transition(&self, id: StateId, requested: ModifierFlags) {
        let applied = ModifierFlags::new(requested.active, requested.active && requested.sticky);

        let changed = {
            let mut states = self.states.borrow_mut();
            let current = states.get(&id).copied().unwrap_or_default();
            if current == applied {
                false
            } else {
                if applied == ModifierFlags::inactive() {
                    states.remove(&id);
                } else {
                    states.insert(id, applied);
                }
                true
            }
        };

        if changed {
            tracing::debug!(
                state = %id,
                active = applied.active,
                sticky = applied.sticky,
                "modifier state transition"
            );
            self.notify(id, applied);
        }
    }

    /// Deactivates every state that is active but not sticky.
    ///
    /// This is the one-shot modifier behavior: after a content key press a
    /// tapped shift releases while a latched caps-lock stays on. Fires one
    /// notification per state released.
    pub fn release_momentary(&self) {
        let momentary: Vec<StateId> = self
            .states
            .borrow()
            .iter()
            .filter(|(_, flags)| flags.active && !flags.sticky)
            .map(|(id, _)| *id)
            .collect();

        for id in momentary {
            self.request_transition(id, ModifierFlags::inactive());
        }
    }

    /// Deactivates every state, sticky or not.
    pub fn clear_all(&self) {
        let active = self.active_states();
        for id in active {
            self.request_transition(id, ModifierFlags::inactive());
        }
    }

    /// Registers a change listener.
    ///
    /// The listener fires once per applied transition with the affected
    /// state and its new flags. Returns the handle needed to unsubscribe.
    pub fn on_change(&self, listener: impl Fn(StateId, ModifierFlags) + 'static) -> Subscription {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription { id }
    }

    /// Removes a previously registered listener.
    ///
    /// Synchronous: once this returns, the listener will not fire again.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.listeners
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.id);
    }

    /// Number of currently installed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self, id: StateId, flags: ModifierFlags) {
        // Snapshot so listeners can subscribe/unsubscribe re-entrantly.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(id, flags);
        }
    }
}

impl fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardState")
            .field("states", &self.states.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
