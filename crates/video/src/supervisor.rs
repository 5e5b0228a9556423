use {
    crate::*,
    tokio::{
        sync::mpsc,
        task::JoinHandle,
        time::{Instant, sleep_until, timeout},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pause,
    Resume,
    Shutdown,
}

/// Runs the watchdog timer and owns the capture session's lifecycle.
///
/// Lives on a tokio task. Every start and stop goes through this one task, so
/// they are strictly serialized.
pub struct Supervisor {
    session: CaptureSession,
    watchdog: Watchdog,
    counter: FrameCounter,
    status: StatusSender,
    initial_selector: DeviceSelector,
    deadline: Option<Instant>,
}

/// Control side of a spawned [`Supervisor`].
pub struct SupervisorHandle {
    commands: mpsc::UnboundedSender<Command>,
    join_handle: JoinHandle<CaptureSession>,
}

impl Supervisor {
    pub fn new(session: CaptureSession, config: &PipelineConfig, status: StatusSender) -> Self {
        let counter = session.counter();
        Self {
            session,
            watchdog: Watchdog::from_config(config),
            counter,
            status,
            initial_selector: config.initial_selector(),
            deadline: None,
        }
    }

    /// Start capturing and monitoring on the current tokio runtime.
    pub fn spawn(self) -> SupervisorHandle {
        let (commands, receiver) = mpsc::unbounded_channel();
        let join_handle = tokio::spawn(self.run(receiver));
        SupervisorHandle {
            commands,
            join_handle,
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> CaptureSession {
        self.resume().await;
        loop {
            let deadline = self.deadline;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Pause) => self.pause().await,
                    Some(Command::Resume) => self.resume().await,
                    Some(Command::Shutdown) | None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_window_elapsed().await;
                }
            }
        }

        // timer first, then the device
        self.deadline = None;
        self.watchdog.disarm();
        self.session.stop().await;
        log::info!("supervisor: stopped");
        self.session
    }

    async fn resume(&mut self) {
        log::info!("supervisor: resuming with {} device", self.initial_selector);
        self.session.stop().await;
        self.watchdog.arm(self.counter.get());
        self.start(self.initial_selector).await;
        self.rearm();
    }

    async fn pause(&mut self) {
        log::info!("supervisor: pausing");
        self.deadline = None;
        self.watchdog.disarm();
        self.session.stop().await;
    }

    // bounded by the watchdog window; a hung open counts as unavailable
    async fn start(&mut self, selector: DeviceSelector) -> bool {
        let started = match timeout(self.watchdog.window(), self.session.start(selector)).await {
            Ok(Ok(_)) => true,
            Ok(Err(error)) => {
                self.status.send(Status::DeviceUnavailable(error.to_string()));
                false
            }
            Err(_) => {
                log::warn!("supervisor: opening {} device timed out", selector);
                self.status
                    .send(Status::DeviceUnavailable(format!("opening {selector} device timed out")));
                false
            }
        };
        self.watchdog.session_started();
        started
    }

    fn rearm(&mut self) {
        self.deadline = Some(Instant::now() + self.watchdog.window());
    }

    async fn on_window_elapsed(&mut self) {
        match self.watchdog.window_elapsed(self.counter.get()) {
            Verdict::FramesOk { frames } => {
                self.status.send(Status::FramesOk(frames));
                self.rearm();
            }
            Verdict::Retry { attempt, selector } => {
                log::warn!(
                    "supervisor: no frames, fallback attempt {} with {} device",
                    attempt,
                    selector
                );
                self.status.send(Status::NoFramesRetrying(attempt));
                self.session.stop().await;
                self.watchdog.restarted(self.counter.get());
                if self.start(selector).await {
                    self.status.send(Status::RetryingCamera(attempt));
                }
                self.rearm();
            }
            Verdict::Exhausted => {
                log::error!("supervisor: no frames after all fallback attempts");
                self.status.send(Status::RetriesExhausted);
                self.deadline = None;
            }
            Verdict::Disarmed => {
                self.deadline = None;
            }
        }
    }
}

impl SupervisorHandle {
    /// Stop the timer and the capture session. Resume restarts both.
    pub fn pause(&self) {
        let _ = self.commands.send(Command::Pause);
    }

    pub fn resume(&self) {
        let _ = self.commands.send(Command::Resume);
    }

    /// Stop the timer, then the session, and wait for both. Returns the stopped session.
    pub async fn shutdown(self) -> Result<CaptureSession, VideoError> {
        let _ = self.commands.send(Command::Shutdown);
        self.join_handle
            .await
            .map_err(|error| VideoError::Channel(format!("supervisor task failed: {error}")))
    }
}
