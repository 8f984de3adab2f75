//! Timing metadata extracted from a vector animation asset's declarative JSON.
//!
//! Lottie-style documents carry three scalar timing fields at the top level:
//! `fr` (frames per second), `ip` (in-point) and `op` (out-point), the latter
//! two in native frame units. The resolver reads exactly those three and
//! derives the trimmed play duration from them. Everything else about the
//! document is opaque to this crate.

use serde_json::Value;

/// Timing scalars resolved from one parse pass over the asset bytes.
///
/// All fields are set together: a failed or partial parse yields the
/// all-absent value, never a mix of stale and fresh fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingMetadata {
    /// Declared frames per second (`fr`), when present and numeric.
    pub frame_rate: Option<f64>,
    /// Start of the active range in native frame units (`ip`).
    pub in_point: Option<f64>,
    /// End of the active range in native frame units (`op`).
    pub out_point: Option<f64>,
    /// `(op - ip) / fr`, derivable only when all three fields are present
    /// and `fr > 0`.
    pub duration_seconds: Option<f64>,
    /// `op - ip`, derivable under the same conditions as `duration_seconds`.
    pub total_frames: Option<f64>,
}

impl TimingMetadata {
    /// Resolve timing metadata from raw asset bytes.
    ///
    /// Pure function of its input. Parse failures and missing or
    /// non-numeric fields are not errors, only degraded information:
    /// the affected fields come back absent.
    pub fn resolve(bytes: &[u8]) -> Self {
        let Ok(root) = serde_json::from_slice::<Value>(bytes) else {
            return Self::default();
        };

        let frame_rate = numeric_field(&root, "fr");
        let in_point = numeric_field(&root, "ip");
        let out_point = numeric_field(&root, "op");

        let (duration_seconds, total_frames) = match (frame_rate, in_point, out_point) {
            (Some(fr), Some(ip), Some(op)) if fr > 0.0 => (Some((op - ip) / fr), Some(op - ip)),
            _ => (None, None),
        };

        Self {
            frame_rate,
            in_point,
            out_point,
            duration_seconds,
            total_frames,
        }
    }

    /// Return `true` when a trimmed in/out range was declared.
    pub fn has_trim_range(&self) -> bool {
        self.in_point.is_some() && self.out_point.is_some()
    }
}

fn numeric_field(root: &Value, name: &str) -> Option<f64> {
    match root.get(name) {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
}
