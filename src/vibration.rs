use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEFAULT_VIBRATION_MS: u64 = 200;

/// Either a single buzz or an on/off millisecond pattern, matching the
/// shape the webview sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VibrationPattern {
    Duration(u64),
    Pattern(Vec<u64>),
}

impl Default for VibrationPattern {
    fn default() -> Self {
        VibrationPattern::Duration(DEFAULT_VIBRATION_MS)
    }
}

/// Whether this build can drive a vibration motor. No haptics backend is
/// wired for the desktop targets this backend currently ships for, so the
/// probe reports unsupported and dependent UI controls stay hidden.
pub fn supported() -> bool {
    false
}

static UNSUPPORTED_WARNED: AtomicBool = AtomicBool::new(false);

/// Safe no-op on unsupported targets; the warning is logged once rather
/// than on every session completion.
pub fn vibrate(pattern: &VibrationPattern) {
    if !supported() {
        if !UNSUPPORTED_WARNED.swap(true, Ordering::SeqCst) {
            warn!("Vibration requested but not supported on this platform: {pattern:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{supported, vibrate, VibrationPattern, DEFAULT_VIBRATION_MS};

    #[test]
    fn default_pattern_is_a_short_buzz() {
        assert!(matches!(
            VibrationPattern::default(),
            VibrationPattern::Duration(DEFAULT_VIBRATION_MS)
        ));
    }

    #[test]
    fn unsupported_vibration_never_panics() {
        assert!(!supported());
        vibrate(&VibrationPattern::Duration(5000));
        vibrate(&VibrationPattern::Pattern(vec![100, 50, 100]));
    }

    #[test]
    fn pattern_deserializes_from_both_shapes() {
        let single: VibrationPattern = serde_json::from_str("5000").expect("duration");
        assert!(matches!(single, VibrationPattern::Duration(5000)));
        let pattern: VibrationPattern = serde_json::from_str("[100,50,100]").expect("pattern");
        assert!(matches!(pattern, VibrationPattern::Pattern(ref p) if p == &[100, 50, 100]));
    }
}
