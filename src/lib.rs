#![forbid(unsafe_code)]

//! Playback and timeline synchronization for vector animation assets.
//!
//! The engine keeps every view of playback position (progress bar, elapsed
//! clock, frame counter, decoder seek target) derived from one normalized
//! progress value:
//!
//! - [`TimingMetadata`] resolves an asset's declared timing scalars
//! - [`PlaybackSession`] owns progress, playback state and the decoder
//!   handle, and converts between progress, seconds, frame index and
//!   native frame coordinates
//! - [`AnimationDecoder`]/[`AnimationHandle`] are the seams a real
//!   renderer plugs into; [`MetadataDecoder`] drives a session headlessly

pub mod decoder;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod session;
pub mod timecode;
pub mod transport;

pub use decoder::{AnimationDecoder, AnimationHandle, MetadataDecoder};
pub use error::{LottineError, LottineResult};
pub use layout::fit_rect;
pub use metadata::TimingMetadata;
pub use session::{FALLBACK_FRAME_RATE, PlaybackSession, TickOutcome, TimelineObserver};
pub use timecode::format_clock;
pub use transport::{FrameRepeater, SpeedSteps};
