// SPDX-License-Identifier: GPL-3.0-only

//! Binding modifier controllers to a built keyset tree.
//!
//! [`ModifierBindings`] is the per-keyset collection of modifier key
//! controllers. Attaching walks the tree, realizes one controller for every
//! soft key carrying a `modifier` attribute and subscribes each to the
//! shared [`KeyboardState`]. Tearing down unsubscribes everything
//! synchronously: a keyset switch tears the old bindings down before the
//! new tree is built, so no callback of the old keyset can fire after
//! teardown returns.

use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::element::interactive::InteractiveKey;
use crate::element::modifier::{transition_for, ModifierKeyController};
use crate::input::{GestureEvent, KeyboardState, StateId, Subscription};
use crate::layout::{LayoutNode, NodeType, ATTR_MODIFIER, ATTR_STICKY};

/// The modifier controllers of one keyset, with their subscriptions.
pub struct ModifierBindings<K: InteractiveKey> {
    controllers: Vec<Rc<RefCell<ModifierKeyController<K>>>>,
    subscriptions: Vec<Subscription>,
    state: Rc<KeyboardState>,
}

impl<K: InteractiveKey + 'static> ModifierBindings<K> {
    /// Walks `tree` and binds a controller to every modifier key.
    ///
    /// A soft key is a modifier key when its attributes carry a `modifier`
    /// entry naming a [`StateId`]; a true `sticky` entry opts the key into
    /// sticky support. `realize` turns each such node into the host's key
    /// realization. Every controller is synced once at bind time and then
    /// re-synced from the store's change notifications.
    pub fn attach<F>(tree: &LayoutNode, state: Rc<KeyboardState>, mut realize: F) -> Self
    where
        F: FnMut(&LayoutNode) -> K,
    {
        let mut controllers = Vec::new();
        let mut subscriptions = Vec::new();

        tree.visit(&mut |node| {
            if node.node_type() != NodeType::SoftKey {
                return;
            }
            let Some(raw) = node.attribute(ATTR_MODIFIER).and_then(Value::as_str) else {
                return;
            };
            let Some(target) = StateId::parse(raw) else {
                tracing::warn!(node = node.id(), modifier = raw, "unknown modifier state; key left unbound");
                return;
            };
            let supports_sticky = node
                .attribute(ATTR_STICKY)
                .and_then(Value::as_bool)
                .unwrap_or(false);

            let controller = Rc::new(RefCell::new(ModifierKeyController::bind(
                realize(node),
                target,
                supports_sticky,
                &state,
            )));

            // The subscription holds only weak references; a torn-down
            // controller can never be revived by a late notification.
            let weak_controller = Rc::downgrade(&controller);
            let weak_state = Rc::downgrade(&state);
            let subscription = state.on_change(move |changed, _| {
                if changed != target {
                    return;
                }
                let (Some(controller), Some(state)) =
                    (weak_controller.upgrade(), weak_state.upgrade())
                else {
                    return;
                };
                controller.borrow_mut().sync(&state);
            });

            controllers.push(controller);
            subscriptions.push(subscription);
        });

        tracing::debug!(bindings = controllers.len(), "modifier bindings attached");
        Self {
            controllers,
            subscriptions,
            state,
        }
    }
}

impl<K: InteractiveKey> ModifierBindings<K> {
    /// Routes a classified gesture to the controller realizing `node_id`.
    ///
    /// Returns whether a controller was bound to that node. The resulting
    /// transition request is forwarded to the store; facet updates arrive
    /// through the change notification like any other transition.
    pub fn dispatch(&self, node_id: &str, event: GestureEvent) -> bool {
        let mut found = None;
        for controller in &self.controllers {
            let controller = controller.borrow();
            if controller.key().node_id() == node_id {
                found = Some((controller.target(), controller.supports_sticky()));
                break;
            }
        }
        // The borrow is released before the store dispatches notifications
        // back into the controller.
        let Some((target, supports_sticky)) = found else {
            return false;
        };
        let current = self.state.get_state(target);
        self.state
            .request_transition(target, transition_for(event, current, supports_sticky));
        true
    }

    /// The bound controllers, in tree order.
    #[must_use]
    pub fn controllers(&self) -> &[Rc<RefCell<ModifierKeyController<K>>>] {
        &self.controllers
    }

    /// The controller realizing `node_id`, if any.
    #[must_use]
    pub fn controller(&self, node_id: &str) -> Option<&Rc<RefCell<ModifierKeyController<K>>>> {
        self.controllers
            .iter()
            .find(|controller| controller.borrow().key().node_id() == node_id)
    }

    /// Number of bound modifier keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether the keyset has no modifier keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Unsubscribes every listener and drops the controllers.
    ///
    /// Synchronous and complete: when this returns, no render cycle of this
    /// keyset can run anymore. Invoked automatically on drop; call it
    /// explicitly before rebuilding a keyset.
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.subscriptions.is_empty() {
            tracing::debug!(bindings = self.controllers.len(), "modifier bindings torn down");
        }
        for subscription in self.subscriptions.drain(..) {
            self.state.unsubscribe(subscription);
        }
        self.controllers.clear();
    }
}

impl<K: InteractiveKey> Drop for ModifierBindings<K> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<K: InteractiveKey> fmt::Debug for ModifierBindings<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierBindings")
            .field("controllers", &self.controllers.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
