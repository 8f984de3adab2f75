//! Clock-style time formatting for elapsed/total displays.

/// Format seconds as `mm:ss` for a playback clock.
///
/// NaN, infinite, and negative inputs all render as `00:00`. The minutes
/// component wraps at the hour, matching clock-face display semantics.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }

    let total = seconds.floor() as u64;
    let minutes = (total / 60) % 60;
    let secs = total % 60;
    format!("{minutes:02}:{secs:02}")
}
