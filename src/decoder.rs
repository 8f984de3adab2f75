//! Decoder collaborator contract.
//!
//! The engine never inspects an asset's visual content. It talks to an
//! external decoder through two small traits: [`AnimationDecoder`] turns raw
//! bytes into a live [`AnimationHandle`], and the handle answers the few
//! timing questions the engine needs and accepts seeks. Rendering happens
//! entirely on the host's side of this boundary.
//!
//! Optional decoder abilities (a native frame rate, frame-indexed seeking)
//! are modeled as defaulted trait methods queried explicitly, so a handle
//! only implements what its backend actually supports.

use crate::{
    error::{LottineError, LottineResult},
    metadata::TimingMetadata,
};

/// Decodes raw asset bytes into a playable handle.
///
/// Malformed input is the one reportable error in this crate; it surfaces
/// as [`LottineError::Decode`] from [`AnimationDecoder::decode`].
pub trait AnimationDecoder {
    fn decode(&self, bytes: &[u8]) -> LottineResult<Box<dyn AnimationHandle>>;
}

/// A decoded animation owned by one playback session.
///
/// The handle is released by dropping it; a session keeps exactly one
/// handle alive at a time.
pub trait AnimationHandle {
    /// Native duration of the full, untrimmed asset in seconds.
    fn duration_seconds(&self) -> f64;

    /// Native pixel width of the asset.
    fn width(&self) -> u32;

    /// Native pixel height of the asset.
    fn height(&self) -> u32;

    /// Frame rate reported by the decoder itself, when it knows one.
    fn native_frame_rate(&self) -> Option<f64> {
        None
    }

    /// Whether [`AnimationHandle::seek_frame`] is meaningful for this
    /// backend. Callers must check before seeking by frame.
    fn supports_frame_seek(&self) -> bool {
        false
    }

    /// Seek to a native frame coordinate. No-op unless
    /// [`AnimationHandle::supports_frame_seek`] returns `true`.
    fn seek_frame(&mut self, _frame: f64) {}

    /// Seek to a point on the decoder's own timeline, in seconds.
    fn seek_time(&mut self, seconds: f64);
}

/// A decoder that understands nothing but the declarative timing metadata.
///
/// It produces handles whose duration and dimensions come straight from the
/// document's `fr`/`ip`/`op` and `w`/`h` fields and whose seeks only move an
/// internal position marker. That is enough to drive a [`crate::session::PlaybackSession`]
/// headlessly, which is what the CLI and the integration tests do; anything
/// that draws pixels brings its own [`AnimationDecoder`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MetadataDecoder;

impl AnimationDecoder for MetadataDecoder {
    fn decode(&self, bytes: &[u8]) -> LottineResult<Box<dyn AnimationHandle>> {
        let root: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| LottineError::decode(format!("asset is not valid JSON: {e}")))?;
        if !root.is_object() {
            return Err(LottineError::decode("asset root is not a JSON object"));
        }

        let meta = TimingMetadata::resolve(bytes);
        let width = dimension(&root, "w");
        let height = dimension(&root, "h");

        Ok(Box::new(MetadataHandle {
            duration_seconds: meta.duration_seconds.unwrap_or(0.0),
            frame_rate: meta.frame_rate.filter(|fr| *fr > 0.0),
            width,
            height,
            position_seconds: 0.0,
        }))
    }
}

fn dimension(root: &serde_json::Value, name: &str) -> u32 {
    root.get(name)
        .and_then(serde_json::Value::as_f64)
        .filter(|v| *v > 0.0)
        .map(|v| v.round() as u32)
        .unwrap_or(0)
}

/// Handle produced by [`MetadataDecoder`]. Tracks the last seek target so
/// callers can observe where playback would be rendering.
#[derive(Clone, Copy, Debug)]
pub struct MetadataHandle {
    duration_seconds: f64,
    frame_rate: Option<f64>,
    width: u32,
    height: u32,
    position_seconds: f64,
}

impl MetadataHandle {
    /// Last seek target on the decoder's own timeline, in seconds.
    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }
}

impl AnimationHandle for MetadataHandle {
    fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn native_frame_rate(&self) -> Option<f64> {
        self.frame_rate
    }

    fn supports_frame_seek(&self) -> bool {
        self.frame_rate.is_some()
    }

    fn seek_frame(&mut self, frame: f64) {
        if let Some(fr) = self.frame_rate {
            self.position_seconds = frame / fr;
        }
    }

    fn seek_time(&mut self, seconds: f64) {
        self.position_seconds = seconds;
    }
}
