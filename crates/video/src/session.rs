use {
    crate::*,
    base::Vec2,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicU64, Ordering},
        },
        time::{Duration, Instant},
    },
    tokio::{
        sync::oneshot,
        task::{JoinHandle, spawn_blocking},
    },
};

// delay before polling the device again after a capture error
const CAPTURE_ERROR_BACKOFF_MS: u64 = 20;

// report capture timing once every this many frames
const TIMING_REPORT_INTERVAL: u32 = 15;

/// Monotonic count of frames received from the device, shared with the watchdog.
#[derive(Debug, Clone, Default)]
pub struct FrameCounter {
    count: Arc<AtomicU64>,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Count one frame and return its sequence number (starting at 1).
    fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Per-frame path of the capture session. Runs on the capture worker thread.
pub struct FrameSink {
    frames: Arc<FrameBuffer>,
    mode: ModeHandle,
    transform: Arc<dyn Transform>,
    counter: FrameCounter,
    status: StatusSender,
}

impl FrameSink {
    pub fn new(
        frames: Arc<FrameBuffer>,
        mode: ModeHandle,
        transform: Arc<dyn Transform>,
        status: StatusSender,
    ) -> Self {
        Self {
            frames,
            mode,
            transform,
            counter: FrameCounter::new(),
            status,
        }
    }

    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }

    /// Handle one captured frame and give it back to the caller untouched.
    ///
    /// Pass-through publishes a copy of the raw frame. Processed mode runs the
    /// transform on a copy and publishes it expanded to RGBA; if the transform
    /// fails the raw frame is published instead (also as RGBA) and capture
    /// carries on.
    pub fn on_frame_captured(&self, raw: Frame) -> Frame {
        let sequence = self.counter.increment();
        log::trace!(
            "frame {}: {} {:?}",
            sequence,
            raw.size,
            raw.layout
        );

        let published = match self.mode.get() {
            PipelineMode::PassThrough => Some(self.copy_out(&raw)),
            PipelineMode::Processed => self.process(&raw),
        };
        if let Some(mut frame) = published {
            frame.sequence = sequence;
            self.frames.publish(frame);
        }
        raw
    }

    fn copy_out(&self, frame: &Frame) -> Frame {
        let mut data = self.frames.acquire(frame.data.len());
        data.copy_from_slice(&frame.data);
        Frame {
            size: frame.size,
            layout: frame.layout,
            data,
            sequence: frame.sequence,
        }
    }

    fn process(&self, raw: &Frame) -> Option<Frame> {
        let mut work = self.copy_out(raw);
        let source = match transform::run_transform(self.transform.as_ref(), &mut work) {
            Ok(()) => &work,
            Err(error) => {
                log::warn!("{}, publishing the unprocessed frame", error);
                raw
            }
        };
        let normalized = self.normalize(source);
        self.frames.recycle(work);
        normalized
    }

    fn normalize(&self, frame: &Frame) -> Option<Frame> {
        let mut data = self.frames.acquire(frame.size.area() * 4);
        match convert::expand_to_rgba(frame, &mut data) {
            Ok(()) => Some(Frame {
                size: frame.size,
                layout: PixelLayout::Rgba,
                data,
                sequence: frame.sequence,
            }),
            Err(error) => {
                log::warn!("dropping frame: {}", error);
                None
            }
        }
    }
}

// rolling capture-callback timing, reported through the status channel
#[derive(Default)]
struct CaptureTiming {
    frames: u32,
    total: Duration,
}

impl CaptureTiming {
    fn record(&mut self, elapsed: Duration) -> Option<Status> {
        self.frames += 1;
        self.total += elapsed;
        if self.frames < TIMING_REPORT_INTERVAL {
            return None;
        }
        let millis = self.total.as_secs_f32() * 1000.0 / self.frames as f32;
        let fps = if millis > 0.0 { 1000.0 / millis } else { 0.0 };
        *self = Self::default();
        Some(Status::CaptureTiming { fps, millis })
    }
}

/// Owns the capture device and the worker thread that pumps its frames.
///
/// `start` and `stop` take `&mut self`, so a new start can never race a stop
/// that hasn't finished; `stop` joins the worker before returning.
pub struct CaptureSession {
    driver: Arc<dyn CaptureDriver>,
    sink: Arc<FrameSink>,
    capture_timeout: Duration,
    cancel: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
    selector: Option<DeviceSelector>,
    size: Option<Vec2<usize>>,
}

impl CaptureSession {
    pub fn new(driver: Arc<dyn CaptureDriver>, sink: FrameSink, config: &PipelineConfig) -> Self {
        Self {
            driver,
            sink: Arc::new(sink),
            capture_timeout: config.capture_timeout(),
            cancel: Arc::new(AtomicBool::new(true)),
            join_handle: None,
            selector: None,
            size: None,
        }
    }

    pub fn counter(&self) -> FrameCounter {
        self.sink.counter().clone()
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.is_some()
    }

    /// Selector of the running device, `None` when stopped.
    pub fn selector(&self) -> Option<DeviceSelector> {
        self.selector
    }

    /// Negotiated frame size of the running device.
    pub fn size(&self) -> Option<Vec2<usize>> {
        self.size
    }

    /// Open the device behind `selector` and start pumping frames.
    ///
    /// A running session is stopped first. Fails with `DeviceUnavailable` if
    /// the driver can't open the device; the session is then stopped.
    pub async fn start(&mut self, selector: DeviceSelector) -> Result<Vec2<usize>, VideoError> {
        self.stop().await;

        // fresh flag per worker, so a late stop can't be undone by a restart
        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Arc::clone(&cancel);

        log::info!("capture session: opening {} device via {}", selector, self.driver.name());

        // the device is opened on the worker thread because some backends
        // require open and capture on the same OS thread
        let (init_tx, init_rx) = oneshot::channel::<Result<Vec2<usize>, VideoError>>();
        let driver = Arc::clone(&self.driver);
        let sink = Arc::clone(&self.sink);
        let timeout = self.capture_timeout;
        self.join_handle = Some(spawn_blocking(move || {
            let mut device = match driver.open(selector) {
                Ok(device) => {
                    let _ = init_tx.send(Ok(device.size()));
                    device
                }
                Err(error) => {
                    let _ = init_tx.send(Err(error));
                    return;
                }
            };
            capture_loop(device.as_mut(), &sink, &cancel, timeout);
            device.close();
            log::info!("capture session: {} device closed", selector);
        }));

        // the worker is registered before waiting, so dropping this future
        // (e.g. on a start timeout) still leaves it reachable by stop()
        let result = match init_rx.await {
            Ok(result) => result,
            Err(_) => Err(VideoError::DeviceUnavailable(
                "capture worker died during open".to_string(),
            )),
        };
        match result {
            Ok(size) => {
                self.selector = Some(selector);
                self.size = Some(size);
                log::info!("capture session: started {} device at {}", selector, size);
                self.sink.status.send(Status::CameraStarted(size));
                Ok(size)
            }
            Err(error) => {
                log::warn!("capture session: {} device: {}", selector, error);
                self.stop().await;
                Err(error)
            }
        }
    }

    /// Release the device and wait for the worker to exit. Idempotent.
    pub async fn stop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            if let Err(error) = join_handle.await {
                log::error!("capture worker panicked: {}", error);
            }
            if self.selector.is_some() {
                self.sink.status.send(Status::CameraStopped);
            }
        }
        self.selector = None;
        self.size = None;
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        // the worker notices within one capture timeout
        self.cancel.store(true, Ordering::Relaxed);
    }
}

fn capture_loop(
    device: &mut dyn CaptureDevice,
    sink: &FrameSink,
    cancel: &AtomicBool,
    timeout: Duration,
) {
    let mut timing = CaptureTiming::default();
    while !cancel.load(Ordering::Relaxed) {
        match device.blocking_capture(timeout) {
            Ok(Some(frame)) => {
                let started = Instant::now();
                let frame = sink.on_frame_captured(frame);
                if let Some(status) = timing.record(started.elapsed()) {
                    sink.status.send(status);
                }
                device.recycle(frame);
            }
            // nothing within the timeout, stall detection is the watchdog's job
            Ok(None) => {}
            Err(error) => {
                log::warn!("capture failed: {}", error);
                std::thread::sleep(Duration::from_millis(CAPTURE_ERROR_BACKOFF_MS));
            }
        }
    }
}
