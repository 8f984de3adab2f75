//! Playback session: the timeline engine.
//!
//! A [`PlaybackSession`] owns one decoded animation at a time and a single
//! source of truth for playback position: normalized progress in `[0, 1]`.
//! Every other coordinate the host cares about (wall-clock seconds, frame
//! index, native frame coordinates) is derived from progress on demand, so
//! the views can never drift apart.
//!
//! The session is single-owner and synchronous. It holds no timer of its
//! own: the host arms a periodic callback with the interval returned by
//! [`PlaybackSession::play`] and feeds timestamps into
//! [`PlaybackSession::tick`] until it answers [`TickOutcome::Stop`].

use std::time::{Duration, Instant};

use crate::{
    decoder::{AnimationDecoder, AnimationHandle},
    error::LottineResult,
    metadata::TimingMetadata,
};

/// Frame rate assumed when neither the metadata nor the decoder declare one.
pub const FALLBACK_FRAME_RATE: f64 = 60.0;

/// Clamp range for the playback speed multiplier.
pub const SPEED_RANGE: (f64, f64) = (0.1, 4.0);

/// Ticks are requested at least this fast even for slower content, so the
/// progress indicator stays smooth.
const MIN_TICK_RATE: f64 = 60.0;

/// Synchronous notifications fired by the session.
///
/// All methods default to no-ops; hosts implement the ones they display.
/// `progress_changed`, `time_changed` and `frame_changed` fire together, in
/// that order, on every progress mutation. `redraw_requested` fires after
/// every decoder seek and once on load.
pub trait TimelineObserver {
    fn progress_changed(&mut self, _progress: f64) {}
    fn time_changed(&mut self, _seconds: f64) {}
    fn frame_changed(&mut self, _frame: u64) {}
    fn redraw_requested(&mut self) {}
}

/// Whether the host's tick source should keep firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep delivering ticks.
    Continue,
    /// Deregister the tick source; playback is no longer advancing.
    Stop,
}

/// Timeline engine for one loaded animation asset.
pub struct PlaybackSession {
    handle: Option<Box<dyn AnimationHandle>>,
    metadata: TimingMetadata,
    frame_rate: f64,
    native_duration_seconds: f64,
    timeline_duration_seconds: f64,
    progress: f64,
    playing: bool,
    looping: bool,
    speed: f64,
    last_tick: Option<Instant>,
    observers: Vec<Box<dyn TimelineObserver>>,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSession {
    /// Create an empty session with no asset loaded.
    pub fn new() -> Self {
        Self {
            handle: None,
            metadata: TimingMetadata::default(),
            frame_rate: FALLBACK_FRAME_RATE,
            native_duration_seconds: 0.0,
            timeline_duration_seconds: 0.0,
            progress: 0.0,
            playing: false,
            looping: false,
            speed: 1.0,
            last_tick: None,
            observers: Vec::new(),
        }
    }

    /// Register an observer for progress/time/frame/redraw notifications.
    pub fn subscribe(&mut self, observer: Box<dyn TimelineObserver>) {
        self.observers.push(observer);
    }

    /// Load an asset, replacing any previously loaded one.
    ///
    /// The previous decoder handle is released before the new decode is
    /// attempted, so a decode failure leaves the session in the no-asset
    /// state rather than a stale one. Initialization is silent: only a
    /// redraw is requested, no progress/time/frame notifications fire.
    #[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn load(&mut self, bytes: &[u8], decoder: &dyn AnimationDecoder) -> LottineResult<()> {
        self.unload();

        let handle = decoder.decode(bytes)?;
        self.metadata = TimingMetadata::resolve(bytes);

        self.frame_rate = match self.metadata.frame_rate {
            Some(fr) => fr,
            None => handle
                .native_frame_rate()
                .filter(|fr| *fr > 0.0)
                .unwrap_or(FALLBACK_FRAME_RATE),
        };
        self.native_duration_seconds = handle.duration_seconds();
        self.timeline_duration_seconds = self
            .metadata
            .duration_seconds
            .unwrap_or(self.native_duration_seconds);
        self.handle = Some(handle);

        if self.metadata.frame_rate.is_none() {
            tracing::debug!(
                frame_rate = self.frame_rate,
                "asset declares no frame rate; using decoder fallback"
            );
        }
        if self.metadata.duration_seconds.is_none() {
            tracing::warn!(
                native_duration = self.native_duration_seconds,
                "timing metadata incomplete; timeline falls back to native duration"
            );
        }

        tracing::debug!(
            frame_rate = self.frame_rate,
            native_duration = self.native_duration_seconds,
            timeline_duration = self.timeline_duration_seconds,
            trimmed = self.metadata.has_trim_range(),
            "asset loaded"
        );

        self.request_redraw();
        Ok(())
    }

    /// Release the current asset and reset to the empty state.
    pub fn unload(&mut self) {
        self.handle = None;
        self.metadata = TimingMetadata::default();
        self.frame_rate = FALLBACK_FRAME_RATE;
        self.native_duration_seconds = 0.0;
        self.timeline_duration_seconds = 0.0;
        self.progress = 0.0;
        self.playing = false;
        self.last_tick = None;
    }

    /// Set normalized progress, the single mutation point of the timeline.
    ///
    /// The value is clamped to `[0, 1]`, the decoder is seeked to the
    /// corresponding native position, and the three observer notifications
    /// fire with the final value and its time/frame projections.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
        self.seek_to_progress();

        let progress = self.progress;
        let seconds = self.current_time_seconds();
        let frame = self.current_frame();
        for obs in &mut self.observers {
            obs.progress_changed(progress);
        }
        for obs in &mut self.observers {
            obs.time_changed(seconds);
        }
        for obs in &mut self.observers {
            obs.frame_changed(frame);
        }
    }

    /// Translate progress into a decoder seek.
    ///
    /// With a declared trim range, progress 0..1 spans exactly the in/out
    /// window in native frame coordinates, even when the native asset
    /// extends beyond it. Without one, progress maps onto the decoder's own
    /// timeline directly.
    fn seek_to_progress(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        let mut seeked = false;
        if let (Some(ip), Some(op)) = (self.metadata.in_point, self.metadata.out_point) {
            let target_frame = ip + self.progress * (op - ip);
            if handle.supports_frame_seek() {
                handle.seek_frame(target_frame);
                seeked = true;
            } else if let Some(fr) = self.metadata.frame_rate.filter(|fr| *fr > 0.0) {
                tracing::debug!(
                    target_frame,
                    "frame-indexed seek unsupported; seeking native seconds instead"
                );
                handle.seek_time(target_frame / fr);
                seeked = true;
            } else {
                tracing::debug!(
                    "trim range declared but no frame seek path; seeking by timeline seconds"
                );
            }
        }

        if !seeked {
            let seconds = self.progress * self.timeline_duration_seconds;
            handle.seek_time(seconds);
        }

        self.request_redraw();
    }

    /// Begin playback from the current position.
    ///
    /// Returns the tick interval the host should arm a periodic callback
    /// with, or `None` when there is nothing to arm (no asset, already
    /// playing, or a non-positive timeline duration). The interval follows
    /// the faster of the content's frame rate and 60 Hz so fast content is
    /// not visibly stepped by a slow polling rate.
    pub fn play(&mut self, now: Instant) -> Option<Duration> {
        if self.handle.is_none() || self.playing {
            return None;
        }
        self.playing = true;
        self.last_tick = Some(now);

        if self.timeline_duration_seconds <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(
            1.0 / self.frame_rate.max(MIN_TICK_RATE),
        ))
    }

    /// Suspend playback. Live tick sources may keep firing; ticks are
    /// ignored at delivery time rather than by canceling the source, which
    /// avoids stop/start races.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop playback and rewind to progress 0.
    pub fn stop(&mut self) {
        self.playing = false;
        self.set_progress(0.0);
    }

    /// Advance playback by the wall-clock time elapsed since the previous
    /// tick. The boundary check happens on every tick: reaching progress 1
    /// either wraps to exactly 0 (looping) or clamps to exactly 1 and ends
    /// playback.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.playing || self.handle.is_none() {
            return TickOutcome::Stop;
        }

        let elapsed = self
            .last_tick
            .map(|t| now.duration_since(t).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        if self.timeline_duration_seconds <= 0.0 {
            return TickOutcome::Stop;
        }

        let delta = elapsed * self.speed / self.timeline_duration_seconds;
        self.set_progress(self.progress + delta);

        if self.progress >= 1.0 {
            if self.looping {
                self.set_progress(0.0);
                return TickOutcome::Continue;
            }
            self.set_progress(1.0);
            self.playing = false;
            return TickOutcome::Stop;
        }
        TickOutcome::Continue
    }

    /// Step by `frames` whole frames, forward or backward. The step size is
    /// relative to the total frame count, independent of current position.
    pub fn step_frames(&mut self, frames: i64) {
        let total = self.total_frames();
        if self.handle.is_none() || total == 0 {
            return;
        }
        let delta = frames as f64 / total as f64;
        self.set_progress(self.progress + delta);
    }

    /// Seek to a frame index, clamped to `[0, total_frames() - 1]`.
    pub fn seek_frame(&mut self, index: i64) {
        let total = self.total_frames();
        if self.handle.is_none() || total <= 1 {
            return;
        }
        let clamped = index.clamp(0, total as i64 - 1);
        self.set_progress(clamped as f64 / (total - 1) as f64);
    }

    /// Seek to a point in seconds on the visible timeline, clamped to
    /// `[0, timeline_duration_seconds()]`.
    pub fn seek_seconds(&mut self, seconds: f64) {
        if self.handle.is_none() || self.timeline_duration_seconds <= 0.0 {
            return;
        }
        let clamped = seconds.clamp(0.0, self.timeline_duration_seconds);
        self.set_progress(clamped / self.timeline_duration_seconds);
    }

    /// Set the speed multiplier, clamped to [`SPEED_RANGE`]. Takes effect
    /// on the next tick.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1);
    }

    /// Toggle whether playback wraps at the end of the timeline.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Normalized playback position in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Effective frames per second used for frame math and tick pacing.
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Duration the progress axis is measured against. May be shorter than
    /// the native asset duration when a trim range is declared.
    pub fn timeline_duration_seconds(&self) -> f64 {
        self.timeline_duration_seconds
    }

    /// Decoder-reported duration of the full, untrimmed asset.
    pub fn native_duration_seconds(&self) -> f64 {
        self.native_duration_seconds
    }

    /// Timing metadata resolved from the loaded asset.
    pub fn metadata(&self) -> &TimingMetadata {
        &self.metadata
    }

    /// Native pixel dimensions of the loaded asset, if any.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.handle.as_ref().map(|h| (h.width(), h.height()))
    }

    pub fn has_asset(&self) -> bool {
        self.handle.is_some()
    }

    /// Total frame count of the visible timeline; 0 with no asset loaded,
    /// at least 1 otherwise.
    pub fn total_frames(&self) -> u64 {
        if self.handle.is_none() {
            return 0;
        }
        let frames = match self.metadata.total_frames {
            Some(frames) => frames,
            None => self.timeline_duration_seconds * self.frame_rate,
        };
        (frames.round() as i64).max(1) as u64
    }

    /// Frame index the current progress projects onto.
    pub fn current_frame(&self) -> u64 {
        let total = self.total_frames();
        if total <= 1 {
            return 0;
        }
        let last = (total - 1) as i64;
        let raw = (self.progress * last as f64).round() as i64;
        raw.clamp(0, last) as u64
    }

    /// Elapsed seconds the current progress projects onto.
    pub fn current_time_seconds(&self) -> f64 {
        self.timeline_duration_seconds * self.progress
    }

    fn request_redraw(&mut self) {
        for obs in &mut self.observers {
            obs.redraw_requested();
        }
    }
}
