use {crate::*, std::time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogPhase {
    /// Not monitoring (never armed, or paused).
    Idle,
    /// A session start was issued, waiting for it to come up.
    Starting,
    /// Session up, waiting for the window to elapse.
    Observing,
    /// Last window saw frames.
    Healthy,
    /// Last window saw no frames, a restart is in progress.
    Stalled,
    /// All fallback attempts used up. Terminal until re-armed.
    Exhausted,
}

/// What the supervisor should do when a window elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Frames arrived; `frames` counts everything since the last (re)start.
    FramesOk { frames: u64 },
    /// Nothing arrived; restart with `selector`.
    Retry { attempt: u32, selector: DeviceSelector },
    /// Nothing arrived and no attempts remain. Returned exactly once.
    Exhausted,
    /// Not armed, nothing to do.
    Disarmed,
}

/// Stall detector for the capture session.
///
/// Pure state machine over the shared frame counter: the supervisor feeds it
/// counter readings when its timer fires and acts on the returned [`Verdict`].
/// Every window is checked, including after the session turned healthy, so a
/// device that stops delivering later is caught as well.
#[derive(Debug, Clone)]
pub struct Watchdog {
    phase: WatchdogPhase,
    attempt_count: u32,
    max_attempts: u32,
    window: Duration,
    frames_at_restart: u64,
    frames_at_window: u64,
}

impl Watchdog {
    pub fn new(window: Duration, max_attempts: u32) -> Self {
        Self {
            phase: WatchdogPhase::Idle,
            attempt_count: 0,
            max_attempts,
            window,
            frames_at_restart: 0,
            frames_at_window: 0,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.watchdog_window(), config.max_attempts())
    }

    pub fn phase(&self) -> WatchdogPhase {
        self.phase
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether the supervisor should keep its timer running.
    pub fn is_armed(&self) -> bool {
        !matches!(self.phase, WatchdogPhase::Idle | WatchdogPhase::Exhausted)
    }

    /// Session start or resume: forget previous attempts and watch from `frames_now`.
    pub fn arm(&mut self, frames_now: u64) {
        self.attempt_count = 0;
        self.set_baseline(frames_now);
        self.phase = WatchdogPhase::Starting;
    }

    /// The session came up (or failed to; the window decides either way).
    pub fn session_started(&mut self) {
        if self.phase == WatchdogPhase::Starting {
            self.phase = WatchdogPhase::Observing;
        }
    }

    /// A fallback restart was issued after a `Retry` verdict.
    pub fn restarted(&mut self, frames_now: u64) {
        if self.phase == WatchdogPhase::Stalled {
            self.set_baseline(frames_now);
            self.phase = WatchdogPhase::Starting;
        }
    }

    pub fn disarm(&mut self) {
        self.phase = WatchdogPhase::Idle;
    }

    /// The timer fired; `frames_now` is the current frame counter.
    pub fn window_elapsed(&mut self, frames_now: u64) -> Verdict {
        if !self.is_armed() {
            return Verdict::Disarmed;
        }

        let in_window = frames_now.saturating_sub(self.frames_at_window);
        self.frames_at_window = frames_now;

        if in_window > 0 {
            self.phase = WatchdogPhase::Healthy;
            self.attempt_count = 0;
            return Verdict::FramesOk {
                frames: frames_now.saturating_sub(self.frames_at_restart),
            };
        }

        self.attempt_count += 1;
        if self.attempt_count > self.max_attempts {
            self.phase = WatchdogPhase::Exhausted;
            return Verdict::Exhausted;
        }
        self.phase = WatchdogPhase::Stalled;
        Verdict::Retry {
            attempt: self.attempt_count,
            selector: DeviceSelector::for_attempt(self.attempt_count),
        }
    }

    fn set_baseline(&mut self, frames_now: u64) {
        self.frames_at_restart = frames_now;
        self.frames_at_window = frames_now;
    }
}
