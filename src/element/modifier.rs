// SPDX-License-Identifier: GPL-3.0-only

//! The modifier key controller.
//!
//! A controller binds one realized key to one target state in the shared
//! [`KeyboardState`] and keeps the key's visual facets synchronized with it.
//! Per key the controller renders a three-state display machine:
//!
//! - **Inactive**: no highlight, no indicator (initial/default)
//! - **Active-momentary**: highlighted, no indicator
//! - **Active-sticky**: highlighted, indicator shown
//!
//! Rendering is a pure function of the store. Gestures never touch the
//! facets directly: the controller forwards a transition request and waits
//! for the store's change notification to re-render, so every controller
//! observing the same state converges on the store's authoritative value.

use crate::element::interactive::InteractiveKey;
use crate::input::{GestureConfig, GestureEvent, KeyboardState, ModifierFlags, StateId};

/// Computes the transition request for a classified gesture.
///
/// Every gesture toggles `active`. Sticky is requested only by the
/// sticky-intent gestures (double tap, long-press release), only on a key
/// that supports sticky mode, and only when the toggle lands on active;
/// deactivating always requests the plain inactive pair.
#[must_use]
pub fn transition_for(
    event: GestureEvent,
    current: ModifierFlags,
    supports_sticky: bool,
) -> ModifierFlags {
    let active = !current.active;
    let sticky = active && supports_sticky && event.requests_sticky();
    ModifierFlags::new(active, sticky)
}

/// Synchronizes one modifier key's visuals with the shared keyboard state.
///
/// The target state is fixed at bind time and never changes; the controller
/// lives exactly as long as the keyset that realized its key.
#[derive(Debug)]
pub struct ModifierKeyController<K: InteractiveKey> {
    target: StateId,
    supports_sticky: bool,
    key: K,
}

impl<K: InteractiveKey> ModifierKeyController<K> {
    /// Binds `key` to `target`.
    ///
    /// Configures the key's gesture recognizer parameters (the alternate
    /// activation gestures are enabled only when `supports_sticky`) and
    /// performs the initial render so the key reflects the current state
    /// immediately.
    pub fn bind(mut key: K, target: StateId, supports_sticky: bool, state: &KeyboardState) -> Self {
        let config = if supports_sticky {
            GestureConfig::sticky_toggle()
        } else {
            GestureConfig::default()
        };
        key.configure_gestures(config);

        let mut controller = Self {
            target,
            supports_sticky,
            key,
        };
        controller.sync(state);
        controller
    }

    /// Renders the key's facets from the store.
    ///
    /// Pure and idempotent: highlight iff the target state is active,
    /// indicator iff it is active, sticky and this key supports sticky mode.
    /// A facet is written only when its value actually changes, so invoking
    /// this twice without an intervening transition touches nothing.
    pub fn sync(&mut self, state: &KeyboardState) {
        let flags = state.get_state(self.target);
        let highlight = flags.active;
        let indicator = flags.active && flags.sticky && self.supports_sticky;

        if self.key.is_highlighted() != highlight {
            self.key.set_highlighted(highlight);
        }
        if self.key.is_indicator_visible() != indicator {
            self.key.set_indicator_visible(indicator);
        }
    }

    /// Forwards a classified gesture as a transition request.
    ///
    /// The controller does not update any facet here; the store's change
    /// notification drives the re-render. A request the store drops or
    /// amends therefore reconciles silently.
    pub fn on_gesture(&self, event: GestureEvent, state: &KeyboardState) {
        let current = state.get_state(self.target);
        let request = transition_for(event, current, self.supports_sticky);
        tracing::debug!(
            state = %self.target,
            ?event,
            active = request.active,
            sticky = request.sticky,
            "modifier gesture -> transition request"
        );
        state.request_transition(self.target, request);
    }

    /// The bound target state.
    #[must_use]
    pub fn target(&self) -> StateId {
        self.target
    }

    /// Whether this key supports sticky activation.
    #[must_use]
    pub fn supports_sticky(&self) -> bool {
        self.supports_sticky
    }

    /// The realized key.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Message key describing the bound state for assistive technology.
    ///
    /// String lookup and localization happen outside this crate; unmapped
    /// states yield an empty label.
    #[must_use]
    pub fn descriptive_label(&self) -> &'static str {
        match self.target {
            StateId::Shift => "SHIFT",
            StateId::CapsLock => "CAPSLOCK",
            StateId::AltGr => "ALTGR",
            _ => "",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
