// SPDX-License-Identifier: GPL-3.0-only

//! Keyview - layout tree and modifier state core for on-screen keyboards
//!
//! This crate provides the non-visual core of an on-screen keyboard: it
//! expands declarative keyset definitions into trees of typed, uniquely
//! identified layout nodes, and keeps modifier keys (shift, caps-lock,
//! alt-graph and similar sticky toggles) visually synchronized with a shared
//! keyboard state as classified gesture events arrive.
//!
//! # Architecture
//!
//! A keyset flows through three stages:
//!
//! 1. **Parse** (`layout::parser`): a JSON keyset definition deserializes
//!    into a [`layout::KeysetConfig`], validated permissively: fatal issues
//!    fail the load, shape oddities come back as warnings.
//!
//! 2. **Build** (`layout::builder`): the configuration expands into one
//!    rooted tree of [`layout::LayoutNode`] values with collision-free
//!    identifiers issued by an explicit per-build allocator. Builds are
//!    all-or-nothing; a keyboard never renders a half-built layout.
//!
//! 3. **Bind** (`element::bindings`): modifier-annotated keys in the built
//!    tree are realized and bound to the shared [`input::KeyboardState`].
//!    Each controller renders its key's highlight and secondary indicator
//!    from the store and forwards classified gestures as transition
//!    requests; the store's synchronous change notifications drive every
//!    re-render. Tearing the bindings down before a keyset switch is
//!    synchronous and complete.
//!
//! Painting, hit-testing, raw pointer recognition, label localization and
//! the host bridge that synthesizes real key events all live outside this
//! crate.
//!
//! # Modules
//!
//! - `layout`: keyset parsing, validation, identifier allocation, node
//!   factory and tree building
//! - `input`: the observable keyboard state store and the classified
//!   gesture vocabulary
//! - `element`: the interactive key capability, the modifier key controller
//!   and the per-keyset binding collection

pub mod element;
pub mod input;
pub mod layout;

// Re-export the types most hosts touch
pub use element::{InteractiveKey, ModifierBindings, ModifierKeyController, RealizedKey};
pub use input::{GestureConfig, GestureEvent, KeyboardState, ModifierFlags, StateId};
pub use layout::{build_keyset, KeysetConfig, LayoutError, LayoutNode, NodeType};

// ============================================================================
// Integration Tests
// ============================================================================
