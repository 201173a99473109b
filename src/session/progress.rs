//! Progress ring geometry and clock formatting shared with the webview.
//!
//! The ring is drawn in a 100x100 viewBox with a radius-45 circle; the
//! stroke offset hides the spent fraction of the circumference. Both the
//! geometry and the low-time threshold are fixed design constants.

use serde::Serialize;
use std::f64::consts::PI;

pub const RING_RADIUS: f64 = 45.0;

/// Below this percentage the ring switches to the low-time color.
pub const LOW_TIME_PERCENT: u8 = 30;

pub fn ring_circumference() -> f64 {
    2.0 * PI * RING_RADIUS
}

/// Stroke offset for a given progress percentage: the full circumference
/// at 0 percent, zero at 100 percent.
pub fn ring_stroke_offset(progress_percent: u8) -> f64 {
    let percent = progress_percent.min(100) as f64;
    ring_circumference() * (1.0 - percent / 100.0)
}

pub fn is_low_time(progress_percent: u8) -> bool {
    progress_percent < LOW_TIME_PERCENT
}

/// Fixed ring constants handed to the webview once at startup so it can
/// set up the stroke-dasharray before the first snapshot arrives.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingGeometry {
    pub radius: f64,
    pub circumference: f64,
    pub low_time_percent: u8,
}

pub fn ring_geometry() -> RingGeometry {
    RingGeometry {
        radius: RING_RADIUS,
        circumference: ring_circumference(),
        low_time_percent: LOW_TIME_PERCENT,
    }
}

/// `MM:SS` rendering of a second count, zero-padded on both sides.
pub fn format_clock(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}
