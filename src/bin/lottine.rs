use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use lottine::{
    MetadataDecoder, PlaybackSession, TickOutcome, TimelineObserver, TimingMetadata, format_clock,
};

#[derive(Parser, Debug)]
#[command(name = "lottine", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the timing metadata resolved from an animation JSON.
    Inspect(InspectArgs),
    /// Drive a headless playback session in real time, printing frame lines.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input animation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input animation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback speed multiplier (clamped to 0.1..=4.0).
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Loop at the end of the timeline instead of stopping.
    #[arg(long = "loop")]
    looping: bool,

    /// Wall-clock cap in seconds; playback stops when it is reached.
    /// Required when looping, otherwise defaults to the full timeline.
    #[arg(long)]
    duration: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn read_asset(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read animation '{}'", path.display()))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = read_asset(&args.in_path)?;
    let meta = TimingMetadata::resolve(&bytes);

    let mut session = PlaybackSession::new();
    session
        .load(&bytes, &MetadataDecoder)
        .with_context(|| format!("decode animation '{}'", args.in_path.display()))?;

    let report = serde_json::json!({
        "metadata": meta,
        "frame_rate": session.frame_rate(),
        "timeline_duration_seconds": session.timeline_duration_seconds(),
        "total_frames": session.total_frames(),
        "size": session.size(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Prints one line per rendered frame, deduplicating the per-tick
/// frame notifications.
#[derive(Default)]
struct FramePrinter {
    last_frame: Option<u64>,
    seconds: f64,
}

impl TimelineObserver for FramePrinter {
    fn time_changed(&mut self, seconds: f64) {
        self.seconds = seconds;
    }

    fn frame_changed(&mut self, frame: u64) {
        if self.last_frame == Some(frame) {
            return;
        }
        self.last_frame = Some(frame);
        println!("{}  frame {frame}", format_clock(self.seconds));
    }
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    if args.looping && args.duration.is_none() {
        anyhow::bail!("--loop requires --duration, otherwise playback never ends");
    }

    let bytes = read_asset(&args.in_path)?;
    let mut session = PlaybackSession::new();
    session
        .load(&bytes, &MetadataDecoder)
        .with_context(|| format!("decode animation '{}'", args.in_path.display()))?;
    session.set_speed(args.speed);
    session.set_looping(args.looping);
    session.subscribe(Box::new(FramePrinter::default()));

    let started = Instant::now();
    let Some(interval) = session.play(started) else {
        anyhow::bail!("animation has no playable timeline (zero duration)");
    };

    loop {
        std::thread::sleep(interval);
        let now = Instant::now();
        if session.tick(now) == TickOutcome::Stop {
            break;
        }
        if let Some(cap) = args.duration
            && now.duration_since(started).as_secs_f64() >= cap
        {
            session.pause();
            break;
        }
    }

    eprintln!(
        "played {} of {}",
        format_clock(session.current_time_seconds()),
        format_clock(session.timeline_duration_seconds()),
    );
    Ok(())
}
