// SPDX-License-Identifier: GPL-3.0-only

//! Realized key elements and modifier synchronization.
//!
//! A built keyset tree is inert data; this module is where its interactive
//! keys come to life. The [`InteractiveKey`] trait is the capability a
//! realized key exposes (identity, highlight facet, indicator facet, gesture
//! configuration), [`ModifierKeyController`] composes modifier behavior
//! around any such key, and [`ModifierBindings`] manages the controllers of
//! one keyset as a unit: attach on keyset load, teardown before the next
//! keyset builds.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use keyview::element::{ModifierBindings, RealizedKey};
//! use keyview::input::{GestureEvent, KeyboardState};
//! use keyview::layout::build_keyset;
//!
//! let tree = build_keyset(&config)?;
//! let state = Rc::new(KeyboardState::new());
//!
//! let bindings = ModifierBindings::attach(&tree, Rc::clone(&state), RealizedKey::from_node);
//!
//! // The recognizer classified a long press on the caps-lock key:
//! bindings.dispatch("caps", GestureEvent::LongPressRelease);
//!
//! // Before switching keysets:
//! bindings.teardown();
//! ```

// Sub-modules
pub mod bindings;
pub mod interactive;
pub mod modifier;

// Re-export public API
pub use bindings::ModifierBindings;
pub use interactive::{InteractiveKey, RealizedKey};
pub use modifier::{transition_for, ModifierKeyController};
