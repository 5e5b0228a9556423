use {
    base::Vec2,
    std::fmt,
    tokio::sync::mpsc,
};

/// Human-readable pipeline status for an on-screen label.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    CameraStarted(Vec2<usize>),
    CameraStopped,
    FramesOk(u64),
    NoFramesRetrying(u32),
    RetryingCamera(u32),
    RetriesExhausted,
    DeviceUnavailable(String),
    CaptureTiming { fps: f32, millis: f32 },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::CameraStarted(size) => write!(f, "Camera started: {size}"),
            Status::CameraStopped => write!(f, "Camera stopped"),
            Status::FramesOk(count) => write!(f, "Frames OK: {count}"),
            Status::NoFramesRetrying(attempt) => write!(f, "No frames - retrying ({attempt})"),
            Status::RetryingCamera(attempt) => write!(f, "Retrying camera (#{attempt})"),
            Status::RetriesExhausted => write!(f, "No frames - all retries failed"),
            Status::DeviceUnavailable(msg) => write!(f, "Device unavailable: {msg}"),
            Status::CaptureTiming { fps, millis } => write!(f, "FPS: {fps:.1} MS: {millis:.1}"),
        }
    }
}

/// Sending half of the status channel. Cheap to clone, usable from any thread, never blocks.
#[derive(Debug, Clone)]
pub struct StatusSender {
    sender: mpsc::UnboundedSender<Status>,
}

impl StatusSender {
    pub fn send(&self, status: Status) {
        log::debug!("status: {}", status);
        // presentation may already be gone during shutdown
        let _ = self.sender.send(status);
    }
}

pub struct StatusReceiver {
    receiver: mpsc::UnboundedReceiver<Status>,
}

impl StatusReceiver {
    pub async fn recv(&mut self) -> Option<Status> {
        self.receiver.recv().await
    }

    /// Everything queued right now, oldest first.
    pub fn drain(&mut self) -> Vec<Status> {
        let mut statuses = Vec::new();
        while let Ok(status) = self.receiver.try_recv() {
            statuses.push(status);
        }
        statuses
    }

    /// Most recent queued status, discarding older ones.
    pub fn latest(&mut self) -> Option<Status> {
        self.drain().pop()
    }
}

pub fn status_channel() -> (StatusSender, StatusReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (StatusSender { sender }, StatusReceiver { receiver })
}
