//! Looping preview player
//!
//! Two states: `Idle` and `Playing`. While playing, each poll that is due
//! shows the next frame and asks the scheduler to wake it again after the
//! frame interval. At the end of the stream the source is rewound to frame
//! zero, so playback only ends when it is stopped.

use super::{FrameSource, VideoError, VideoFrame};
use std::time::{Duration, Instant};

/// Delay between preview frames
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Timer primitive the player uses to request its next poll
pub trait Scheduler {
    fn schedule_after(&mut self, delay: Duration);
}

impl Scheduler for egui::Context {
    fn schedule_after(&mut self, delay: Duration) {
        self.request_repaint_after(delay);
    }
}

/// Playback state
pub enum PlayerState {
    Idle,
    Playing {
        source: Box<dyn FrameSource>,
        /// When the next frame should be shown
        next_due: Instant,
    },
}

impl std::fmt::Debug for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerState::Idle => write!(f, "Idle"),
            PlayerState::Playing { source, next_due } => f
                .debug_struct("Playing")
                .field("source", &source.path())
                .field("next_due", next_due)
                .finish(),
        }
    }
}

/// Looping video preview
#[derive(Debug)]
pub struct LoopPlayer {
    state: PlayerState,
    interval: Duration,
    /// Last frame shown
    current: Option<VideoFrame>,
    /// Completed passes through the stream
    loops: u64,
}

impl Default for LoopPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl LoopPlayer {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: PlayerState::Idle,
            interval,
            current: None,
            loops: 0,
        }
    }

    /// Start playing `source` from its current position; the first frame is due now
    pub fn start(&mut self, source: Box<dyn FrameSource>, now: Instant, scheduler: &mut dyn Scheduler) {
        let (width, height) = source.dimensions();
        log::info!("Starting preview of {:?} ({}x{})", source.path(), width, height);

        self.state = PlayerState::Playing {
            source,
            next_due: now,
        };
        self.current = None;
        self.loops = 0;
        scheduler.schedule_after(Duration::ZERO);
    }

    /// Stop playback and release the source
    pub fn stop(&mut self) {
        if self.is_playing() {
            log::info!("Stopped preview after {} loops", self.loops);
        }
        self.state = PlayerState::Idle;
        self.current = None;
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayerState::Playing { .. })
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn current_frame(&self) -> Option<&VideoFrame> {
        self.current.as_ref()
    }

    pub fn loop_count(&self) -> u64 {
        self.loops
    }

    /// Advance playback if a frame is due
    ///
    /// Returns `true` when a new frame was decoded. Always reschedules while
    /// playing. A decode failure, or a stream with no frames even after
    /// rewinding, stops the player and is returned.
    pub fn poll(&mut self, now: Instant, scheduler: &mut dyn Scheduler) -> Result<bool, VideoError> {
        let result = match &mut self.state {
            PlayerState::Idle => return Ok(false),
            PlayerState::Playing { source, next_due } => {
                if now < *next_due {
                    scheduler.schedule_after(*next_due - now);
                    return Ok(false);
                }
                let frame = next_looping(source.as_mut(), &mut self.loops);
                if frame.is_ok() {
                    *next_due = now + self.interval;
                }
                frame
            }
        };

        match result {
            Ok(frame) => {
                self.current = Some(frame);
                scheduler.schedule_after(self.interval);
                Ok(true)
            }
            Err(e) => {
                log::error!("Preview stopped: {}", e);
                self.stop();
                Err(e)
            }
        }
    }
}

/// Next frame, rewinding to frame zero at end of stream
fn next_looping(source: &mut dyn FrameSource, loops: &mut u64) -> Result<VideoFrame, VideoError> {
    if let Some(frame) = source.next_frame()? {
        return Ok(frame);
    }
    source.rewind()?;
    *loops += 1;
    source
        .next_frame()?
        .ok_or_else(|| VideoError::EmptyStream(source.path().to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    struct CountingSource {
        path: PathBuf,
        frames: u64,
        position: u64,
    }

    impl CountingSource {
        fn boxed(frames: u64) -> Box<dyn FrameSource> {
            Box::new(Self {
                path: PathBuf::from("counting"),
                frames,
                position: 0,
            })
        }
    }

    impl FrameSource for CountingSource {
        fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
            if self.position >= self.frames {
                return Ok(None);
            }
            let frame = VideoFrame::new(vec![0; 4], 1, 1, self.position);
            self.position += 1;
            Ok(Some(frame))
        }

        fn rewind(&mut self) -> Result<(), VideoError> {
            self.position = 0;
            Ok(())
        }

        fn dimensions(&self) -> (u32, u32) {
            (1, 1)
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    #[derive(Default)]
    struct RecordingScheduler {
        delays: Vec<Duration>,
    }

    impl Scheduler for RecordingScheduler {
        fn schedule_after(&mut self, delay: Duration) {
            self.delays.push(delay);
        }
    }

    const TICK: Duration = Duration::from_millis(10);

    #[test]
    fn test_idle_does_nothing() {
        let mut player = LoopPlayer::default();
        let mut scheduler = RecordingScheduler::default();

        assert!(!player.poll(Instant::now(), &mut scheduler).unwrap());
        assert!(scheduler.delays.is_empty());
        assert!(matches!(player.state(), PlayerState::Idle));
    }

    #[test]
    fn test_frames_advance_on_interval() {
        let mut player = LoopPlayer::new(TICK);
        let mut scheduler = RecordingScheduler::default();
        let t0 = Instant::now();

        player.start(CountingSource::boxed(5), t0, &mut scheduler);
        assert!(player.poll(t0, &mut scheduler).unwrap());
        assert_eq!(player.current_frame().unwrap().index, 0);

        // Not due yet: no new frame, wake-up requested for the remainder
        assert!(!player.poll(t0 + Duration::from_millis(4), &mut scheduler).unwrap());
        assert_eq!(scheduler.delays.last(), Some(&Duration::from_millis(6)));

        assert!(player.poll(t0 + TICK, &mut scheduler).unwrap());
        assert_eq!(player.current_frame().unwrap().index, 1);
        assert_eq!(scheduler.delays.last(), Some(&TICK));
    }

    #[test]
    fn test_end_of_stream_loops_to_frame_zero() {
        let mut player = LoopPlayer::new(TICK);
        let mut scheduler = RecordingScheduler::default();
        let mut now = Instant::now();

        player.start(CountingSource::boxed(3), now, &mut scheduler);
        let mut seen = Vec::new();
        for _ in 0..7 {
            assert!(player.poll(now, &mut scheduler).unwrap());
            seen.push(player.current_frame().unwrap().index);
            now += TICK;
        }

        assert_eq!(seen, [0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(player.loop_count(), 2);
        assert!(player.is_playing());
    }

    #[test]
    fn test_stop_returns_to_idle() {
        let mut player = LoopPlayer::new(TICK);
        let mut scheduler = RecordingScheduler::default();
        let now = Instant::now();

        player.start(CountingSource::boxed(2), now, &mut scheduler);
        player.poll(now, &mut scheduler).unwrap();
        player.stop();

        assert!(!player.is_playing());
        assert!(player.current_frame().is_none());
        let scheduled = scheduler.delays.len();
        assert!(!player.poll(now + TICK, &mut scheduler).unwrap());
        assert_eq!(scheduler.delays.len(), scheduled);
    }

    #[test]
    fn test_empty_stream_stops_with_error() {
        let mut player = LoopPlayer::new(TICK);
        let mut scheduler = RecordingScheduler::default();
        let now = Instant::now();

        player.start(CountingSource::boxed(0), now, &mut scheduler);
        let err = player.poll(now, &mut scheduler).unwrap_err();

        assert!(matches!(err, VideoError::EmptyStream(_)));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_gif_source_loops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.gif");
        crate::video::test_support::write_gif(&path, 2);

        let mut player = LoopPlayer::new(TICK);
        let mut scheduler = RecordingScheduler::default();
        let mut now = Instant::now();

        player.start(Box::new(crate::video::GifSource::open(&path).unwrap()), now, &mut scheduler);
        for _ in 0..5 {
            player.poll(now, &mut scheduler).unwrap();
            now += TICK;
        }
        assert_eq!(player.current_frame().unwrap().index, 0);
        assert_eq!(player.loop_count(), 2);
    }
}
