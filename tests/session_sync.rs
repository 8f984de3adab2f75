//! Observer synchronization and seek translation against a scripted decoder.

use std::{cell::RefCell, rc::Rc};

use lottine::{
    AnimationDecoder, AnimationHandle, LottineResult, PlaybackSession, TimelineObserver,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Event {
    Redraw,
    Progress(f64),
    Time(f64),
    Frame(u64),
}

#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    fn take(&self) -> Vec<Event> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl TimelineObserver for Recorder {
    fn progress_changed(&mut self, progress: f64) {
        self.events.borrow_mut().push(Event::Progress(progress));
    }

    fn time_changed(&mut self, seconds: f64) {
        self.events.borrow_mut().push(Event::Time(seconds));
    }

    fn frame_changed(&mut self, frame: u64) {
        self.events.borrow_mut().push(Event::Frame(frame));
    }

    fn redraw_requested(&mut self) {
        self.events.borrow_mut().push(Event::Redraw);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Seek {
    Frame(f64),
    Time(f64),
}

/// Decoder whose handles report scripted properties and log every seek.
#[derive(Clone)]
struct ScriptedDecoder {
    duration: f64,
    fps: Option<f64>,
    frame_seek: bool,
    seeks: Rc<RefCell<Vec<Seek>>>,
}

impl ScriptedDecoder {
    fn new(duration: f64, fps: Option<f64>, frame_seek: bool) -> Self {
        Self {
            duration,
            fps,
            frame_seek,
            seeks: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn take_seeks(&self) -> Vec<Seek> {
        self.seeks.borrow_mut().drain(..).collect()
    }
}

struct ScriptedHandle {
    duration: f64,
    fps: Option<f64>,
    frame_seek: bool,
    seeks: Rc<RefCell<Vec<Seek>>>,
}

impl AnimationDecoder for ScriptedDecoder {
    fn decode(&self, bytes: &[u8]) -> LottineResult<Box<dyn AnimationHandle>> {
        if bytes.is_empty() {
            return Err(lottine::LottineError::decode("empty asset"));
        }
        Ok(Box::new(ScriptedHandle {
            duration: self.duration,
            fps: self.fps,
            frame_seek: self.frame_seek,
            seeks: Rc::clone(&self.seeks),
        }))
    }
}

impl AnimationHandle for ScriptedHandle {
    fn duration_seconds(&self) -> f64 {
        self.duration
    }

    fn width(&self) -> u32 {
        320
    }

    fn height(&self) -> u32 {
        240
    }

    fn native_frame_rate(&self) -> Option<f64> {
        self.fps
    }

    fn supports_frame_seek(&self) -> bool {
        self.frame_seek
    }

    fn seek_frame(&mut self, frame: f64) {
        self.seeks.borrow_mut().push(Seek::Frame(frame));
    }

    fn seek_time(&mut self, seconds: f64) {
        self.seeks.borrow_mut().push(Seek::Time(seconds));
    }
}

fn session_with(
    doc: &[u8],
    decoder: &ScriptedDecoder,
) -> (PlaybackSession, Recorder) {
    let mut session = PlaybackSession::new();
    let recorder = Recorder::default();
    session.subscribe(Box::new(recorder.clone()));
    session.load(doc, decoder).unwrap();
    (session, recorder)
}

#[test]
fn load_requests_redraw_but_stays_silent() {
    let decoder = ScriptedDecoder::new(4.0, None, false);
    let (_session, recorder) = session_with(br#"{"fr":30,"ip":0,"op":90}"#, &decoder);
    assert_eq!(recorder.take(), vec![Event::Redraw]);
}

#[test]
fn set_progress_notifies_in_fixed_order_with_consistent_projections() {
    let decoder = ScriptedDecoder::new(4.0, None, false);
    let (mut session, recorder) = session_with(br#"{"fr":30,"ip":0,"op":90}"#, &decoder);
    recorder.take();

    session.set_progress(0.5);
    // Redraw follows the decoder seek, then progress, time, frame.
    assert_eq!(
        recorder.take(),
        vec![
            Event::Redraw,
            Event::Progress(0.5),
            Event::Time(1.5),
            // 90 frames: round(0.5 * 89) = 45 (ties away from zero).
            Event::Frame(45),
        ]
    );
}

#[test]
fn idempotent_set_progress_refires_unchanged_values() {
    let decoder = ScriptedDecoder::new(4.0, None, false);
    let (mut session, recorder) = session_with(br#"{"fr":30,"ip":0,"op":90}"#, &decoder);

    session.set_progress(0.25);
    let first = recorder.take();
    session.set_progress(session.progress());
    assert_eq!(recorder.take(), first);
    assert_eq!(session.progress(), 0.25);
}

#[test]
fn trimmed_range_prefers_native_frame_seek() {
    let decoder = ScriptedDecoder::new(10.0, None, true);
    let (mut session, _recorder) = session_with(br#"{"fr":24,"ip":10,"op":50}"#, &decoder);
    decoder.take_seeks();

    session.set_progress(0.5);
    // Progress 0..1 spans exactly the declared in/out window.
    assert_eq!(decoder.take_seeks(), vec![Seek::Frame(30.0)]);
}

#[test]
fn trimmed_range_falls_back_to_time_seek_in_native_frames() {
    let decoder = ScriptedDecoder::new(10.0, None, false);
    let (mut session, _recorder) = session_with(br#"{"fr":20,"ip":10,"op":50}"#, &decoder);
    decoder.take_seeks();

    session.set_progress(0.5);
    // Frame 30 at 20 fps on the native timeline.
    assert_eq!(decoder.take_seeks(), vec![Seek::Time(1.5)]);
}

#[test]
fn untrimmed_asset_seeks_by_timeline_seconds() {
    let decoder = ScriptedDecoder::new(8.0, Some(25.0), true);
    let (mut session, _recorder) = session_with(br#"{"v":"5.5.2"}"#, &decoder);
    decoder.take_seeks();

    assert_eq!(session.timeline_duration_seconds(), 8.0);
    session.set_progress(0.25);
    assert_eq!(decoder.take_seeks(), vec![Seek::Time(2.0)]);
}

#[test]
fn decoder_native_frame_rate_feeds_frame_math() {
    let decoder = ScriptedDecoder::new(2.0, Some(25.0), false);
    let (session, _recorder) = session_with(br#"{"v":"5.5.2"}"#, &decoder);

    assert_eq!(session.frame_rate(), 25.0);
    // No derived frame count: 2.0s * 25fps.
    assert_eq!(session.total_frames(), 50);
}

#[test]
fn decode_failure_surfaces_and_resets() {
    let decoder = ScriptedDecoder::new(4.0, None, false);
    let (mut session, recorder) = session_with(br#"{"fr":30,"ip":0,"op":90}"#, &decoder);
    recorder.take();

    let err = session.load(b"", &decoder).unwrap_err();
    assert!(err.to_string().contains("decode error"));
    assert!(!session.has_asset());
    assert_eq!(session.total_frames(), 0);

    // Controls stay total in the no-asset state and notify nothing.
    session.step_frames(1);
    session.seek_frame(4);
    session.seek_seconds(0.5);
    assert_eq!(recorder.take(), Vec::new());
}

#[test]
fn seek_frame_projection_round_trips() {
    let decoder = ScriptedDecoder::new(3.0, None, true);
    let (mut session, _recorder) = session_with(br#"{"fr":30,"ip":0,"op":90}"#, &decoder);

    for index in [0_i64, 17, 45, 89] {
        session.seek_frame(index);
        assert_eq!(session.current_frame(), index as u64);
        let expected_time = session.timeline_duration_seconds() * session.progress();
        assert_eq!(session.current_time_seconds(), expected_time);
    }
}
