// SPDX-License-Identifier: GPL-3.0-only

//! The interactive key capability.
//!
//! A realized key exposes two independent visual facets, highlight and
//! secondary indicator, plus the gesture parameters it hands to the
//! external recognizer. The capability is a trait rather than a base class:
//! behaviors such as the modifier controller compose around any
//! implementation instead of subclassing one.

use crate::input::GestureConfig;
use crate::layout::LayoutNode;

/// Capability set of a realized, interactive key.
///
/// Implementations are expected to treat the two facet setters as
/// level-based: setting a facet to its current value is a no-op on the
/// visible surface.
pub trait InteractiveKey {
    /// Identifier of the layout node this key realizes.
    fn node_id(&self) -> &str;

    /// Current highlight facet.
    fn is_highlighted(&self) -> bool;

    /// Sets the highlight facet.
    fn set_highlighted(&mut self, highlighted: bool);

    /// Current secondary indicator facet (the caps-lock dot).
    fn is_indicator_visible(&self) -> bool;

    /// Sets the secondary indicator facet.
    fn set_indicator_visible(&mut self, visible: bool);

    /// Hands gesture parameters to the external recognizer.
    fn configure_gestures(&mut self, config: GestureConfig);
}

/// Plain record-keeping implementation of [`InteractiveKey`].
///
/// Tracks the facet and gesture-configuration state without any surface
/// behind it. Hosts that paint keys implement the trait on their own widget
/// types; this one serves headless embedders and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealizedKey {
    id: String,
    highlighted: bool,
    indicator_visible: bool,
    gestures: GestureConfig,
}

impl RealizedKey {
    /// Creates a key with both facets off and default gesture parameters.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            highlighted: false,
            indicator_visible: false,
            gestures: GestureConfig::default(),
        }
    }

    /// Creates a key realizing `node`.
    #[must_use]
    pub fn from_node(node: &LayoutNode) -> Self {
        Self::new(node.id())
    }

    /// The gesture parameters most recently handed to the recognizer.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        self.gestures
    }
}

impl InteractiveKey for RealizedKey {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    fn is_indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    fn set_indicator_visible(&mut self, visible: bool) {
        self.indicator_visible = visible;
    }

    fn configure_gestures(&mut self, config: GestureConfig) {
        self.gestures = config;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: A fresh key has both facets off
    #[test]
    fn test_initial_facets() {
        let key = RealizedKey::new("k0");
        assert!(!key.is_highlighted());
        assert!(!key.is_indicator_visible());
        assert_eq!(key.node_id(), "k0");
    }

    /// Test 2: Facets are independent
    #[test]
    fn test_facets_independent() {
        let mut key = RealizedKey::new("k0");

        key.set_highlighted(true);
        assert!(key.is_highlighted());
        assert!(!key.is_indicator_visible());

        key.set_indicator_visible(true);
        key.set_highlighted(false);
        assert!(!key.is_highlighted());
        assert!(key.is_indicator_visible());
    }

    /// Test 3: Gesture configuration is recorded
    #[test]
    fn test_gesture_configuration() {
        let mut key = RealizedKey::new("k0");
        assert_eq!(key.gesture_config(), GestureConfig::default());

        key.configure_gestures(GestureConfig::sticky_toggle());
        assert!(key.gesture_config().double_activation);
        assert!(key.gesture_config().long_press_on_release);
    }
}
