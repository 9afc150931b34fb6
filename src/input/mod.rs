// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard state and gesture input for keyview.
//!
//! This module owns the shared, observable keyboard state that every
//! modifier key controller reads from, and the classified gesture vocabulary
//! those controllers consume.
//!
//! # Features
//!
//! - **Observable state**: [`KeyboardState`] maps each [`StateId`] to its
//!   `(active, sticky)` flags, applies requested transitions
//!   last-writer-wins, and notifies subscribers synchronously.
//! - **One-shot semantics**: [`KeyboardState::release_momentary`] drops
//!   tapped (non-sticky) modifiers after a content key press while latched
//!   ones stay on.
//! - **Classified gestures**: [`GestureEvent`] is the vocabulary the
//!   external pointer recognizer delivers (one event per completed
//!   interaction), and [`GestureConfig`] is what a key hands the recognizer
//!   to opt into double-tap and long-press activation.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use keyview::input::{KeyboardState, ModifierFlags, StateId};
//!
//! let state = KeyboardState::new();
//! let sub = state.on_change(|id, flags| {
//!     println!("{} -> active={} sticky={}", id, flags.active, flags.sticky);
//! });
//!
//! // A tap on shift requests a momentary activation.
//! state.request_transition(StateId::Shift, ModifierFlags::new(true, false));
//!
//! // ... user types a letter ...
//! state.release_momentary();
//!
//! state.unsubscribe(sub);
//! ```

// Sub-modules
pub mod gesture;
pub mod state;

// Re-export public API
pub use gesture::{GestureConfig, GestureEvent, DEFAULT_LONG_PRESS_THRESHOLD_MS};
pub use state::{KeyboardState, ModifierFlags, StateId, Subscription};

// ============================================================================
// Module Tests
// ============================================================================
