// SPDX-License-Identifier: GPL-3.0-only

//! Classified gesture events and recognizer configuration.
//!
//! Pointer-event timing lives outside this crate: an external recognizer
//! watches the raw pointer stream and delivers exactly one classified event
//! per completed interaction. This module defines that event vocabulary and
//! the parameters a key hands to the recognizer to opt into the alternate
//! activation gestures.

/// Default long-press threshold handed to the gesture recognizer, in
/// milliseconds.
pub const DEFAULT_LONG_PRESS_THRESHOLD_MS: u32 = 1200;

/// Recognizer parameters for one key.
///
/// The alternate gestures are opt-in; a plain key leaves both disabled and
/// only ever receives [`GestureEvent::Activate`]. The threshold is a
/// parameter for the recognizer, not a timer owned by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Recognize double taps as [`GestureEvent::DoubleActivate`]
    pub double_activation: bool,
    /// Recognize a held press released after the threshold as
    /// [`GestureEvent::LongPressRelease`]
    pub long_press_on_release: bool,
    /// Hold duration, in milliseconds, before a release classifies as a
    /// long press
    pub long_press_threshold_ms: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_activation: false,
            long_press_on_release: false,
            long_press_threshold_ms: DEFAULT_LONG_PRESS_THRESHOLD_MS,
        }
    }
}

impl GestureConfig {
    /// Configuration for a key whose modifier supports sticky activation:
    /// both alternate gestures enabled at the default threshold.
    #[must_use]
    pub fn sticky_toggle() -> Self {
        Self {
            double_activation: true,
            long_press_on_release: true,
            long_press_threshold_ms: DEFAULT_LONG_PRESS_THRESHOLD_MS,
        }
    }
}

/// One classified gesture, delivered at most once per physical interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Single tap or click
    Activate,
    /// Double tap; requests sticky activation
    DoubleActivate,
    /// Press held past the threshold and then released; same intent as
    /// [`DoubleActivate`](Self::DoubleActivate) for keys where a double tap
    /// is impractical (e.g. caps-lock)
    LongPressRelease,
}

impl GestureEvent {
    /// Whether this gesture carries sticky intent.
    #[must_use]
    pub fn requests_sticky(self) -> bool {
        matches!(
            self,
            GestureEvent::DoubleActivate | GestureEvent::LongPressRelease
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: Default configuration disables the alternate gestures
    #[test]
    fn test_default_config() {
        let config = GestureConfig::default();
        assert!(!config.double_activation);
        assert!(!config.long_press_on_release);
        assert_eq!(config.long_press_threshold_ms, 1200);
    }

    /// Test 2: Sticky-toggle configuration enables both alternate gestures
    #[test]
    fn test_sticky_toggle_config() {
        let config = GestureConfig::sticky_toggle();
        assert!(config.double_activation);
        assert!(config.long_press_on_release);
        assert_eq!(
            config.long_press_threshold_ms,
            DEFAULT_LONG_PRESS_THRESHOLD_MS
        );
    }

    /// Test 3: Sticky intent classification
    #[test]
    fn test_sticky_intent() {
        assert!(!GestureEvent::Activate.requests_sticky());
        assert!(GestureEvent::DoubleActivate.requests_sticky());
        assert!(GestureEvent::LongPressRelease.requests_sticky());
    }
}
