use {crate::*, std::time::Duration};

/// Timing and startup settings for the capture pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    watchdog_window: Duration,
    max_attempts: u32,
    frame_budget: Duration,
    capture_timeout: Duration,
    initial_selector: DeviceSelector,
    initial_mode: PipelineMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            watchdog_window: Duration::from_millis(2000),
            max_attempts: 3,
            frame_budget: Duration::from_millis(66),
            capture_timeout: Duration::from_millis(100),
            initial_selector: DeviceSelector::Any,
            initial_mode: PipelineMode::PassThrough,
        }
    }
}

impl PipelineConfig {
    /// How long the watchdog waits for frames before declaring a stall.
    pub fn with_watchdog_window(mut self, window: Duration) -> Self {
        self.watchdog_window = window;
        self
    }

    /// Fallback restarts before giving up.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Render budget per draw (66 ms is about 15 draws per second).
    pub fn with_frame_budget(mut self, budget: Duration) -> Self {
        self.frame_budget = budget;
        self
    }

    /// Longest a device may block waiting for a single frame.
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = timeout;
        self
    }

    pub fn with_initial_selector(mut self, selector: DeviceSelector) -> Self {
        self.initial_selector = selector;
        self
    }

    pub fn with_initial_mode(mut self, mode: PipelineMode) -> Self {
        self.initial_mode = mode;
        self
    }

    pub fn watchdog_window(&self) -> Duration {
        self.watchdog_window
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    pub fn capture_timeout(&self) -> Duration {
        self.capture_timeout
    }

    pub fn initial_selector(&self) -> DeviceSelector {
        self.initial_selector
    }

    pub fn initial_mode(&self) -> PipelineMode {
        self.initial_mode
    }
}
