use std::time::Duration;

/// Fixed render cadence with no backlog.
///
/// A tick that took longer than the budget is followed immediately by the
/// next one; missed ticks are never made up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCadence {
    budget: Duration,
}

impl FrameCadence {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// How long to wait after a tick that took `draw`.
    pub fn wait_after(&self, draw: Duration) -> Duration {
        self.budget.saturating_sub(draw)
    }
}
