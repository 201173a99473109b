use serde::Serialize;

use super::state::Mode;

/// One choice in a mode's duration picker.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationPreset {
    pub minutes: f64,
    pub label: &'static str,
    pub description: &'static str,
}

const fn preset(minutes: f64, label: &'static str, description: &'static str) -> DurationPreset {
    DurationPreset {
        minutes,
        label,
        description,
    }
}

const FOCUS_PRESETS: &[DurationPreset] = &[
    preset(0.1, "6 seconds", "Quick test"),
    preset(15.0, "15 mins", "Quick focus"),
    preset(25.0, "25 mins", "Classic pomodoro"),
    preset(35.0, "35 mins", "Extended focus"),
    preset(45.0, "45 mins", "Deep work"),
    preset(60.0, "60 mins", "Long session"),
];

const SHORT_BREAK_PRESETS: &[DurationPreset] = &[
    preset(3.0, "3 mins", "Quick stretch"),
    preset(5.0, "5 mins", "Standard short"),
    preset(8.0, "8 mins", "Extended short"),
    preset(10.0, "10 mins", "Long short break"),
];

const LONG_BREAK_PRESETS: &[DurationPreset] = &[
    preset(15.0, "15 mins", "Quick recharge"),
    preset(20.0, "20 mins", "Standard long"),
    preset(30.0, "30 mins", "Extended rest"),
    preset(45.0, "45 mins", "Deep recharge"),
    preset(60.0, "60 mins", "Full reset"),
];

pub fn presets_for(mode: Mode) -> &'static [DurationPreset] {
    match mode {
        Mode::Focus => FOCUS_PRESETS,
        Mode::ShortBreak => SHORT_BREAK_PRESETS,
        Mode::LongBreak => LONG_BREAK_PRESETS,
    }
}

/// Input-boundary validation for custom durations. The session engine never
/// sees a value this function rejects.
pub fn normalize_custom_minutes(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    // Anything that rounds below one whole second cannot be counted down.
    if (raw * 60.0).round() < 1.0 {
        return None;
    }
    Some(raw)
}

#[cfg(test)]
mod tests {
    use super::{normalize_custom_minutes, presets_for};
    use crate::session::state::Mode;

    #[test]
    fn every_mode_has_presets() {
        assert_eq!(presets_for(Mode::Focus).len(), 6);
        assert_eq!(presets_for(Mode::ShortBreak).len(), 4);
        assert_eq!(presets_for(Mode::LongBreak).len(), 5);
    }

    #[test]
    fn focus_presets_include_the_debug_session() {
        let debug = &presets_for(Mode::Focus)[0];
        assert_eq!(debug.minutes, 0.1);
        assert_eq!(debug.label, "6 seconds");
    }

    #[test]
    fn every_preset_passes_boundary_validation() {
        for mode in [Mode::Focus, Mode::ShortBreak, Mode::LongBreak] {
            for preset in presets_for(mode) {
                assert_eq!(normalize_custom_minutes(preset.minutes), Some(preset.minutes));
            }
        }
    }

    #[test]
    fn invalid_custom_input_is_rejected() {
        assert_eq!(normalize_custom_minutes(0.0), None);
        assert_eq!(normalize_custom_minutes(-3.0), None);
        assert_eq!(normalize_custom_minutes(f64::NAN), None);
        assert_eq!(normalize_custom_minutes(f64::INFINITY), None);
        assert_eq!(normalize_custom_minutes(0.001), None);
        assert_eq!(normalize_custom_minutes(0.05), Some(0.05));
    }
}
