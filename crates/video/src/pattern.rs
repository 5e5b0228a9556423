use {
    crate::*,
    base::Vec2,
    std::{
        collections::HashSet,
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
        time::{Duration, Instant},
    },
};

#[derive(Debug, Clone)]
pub struct PatternConfig {
    pub size: Vec2<usize>,
    pub layout: PixelLayout,
    pub frame_interval: Duration,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(320, 240),
            layout: PixelLayout::Rgb,
            frame_interval: Duration::from_millis(33),
        }
    }
}

/// Synthetic capture driver producing a moving test pattern.
///
/// Devices can be made unavailable (open fails) or silent (open succeeds but
/// no frame ever arrives), and all frames can be withheld globally, which is
/// what the watchdog needs to be exercised without hardware.
pub struct PatternDriver {
    config: PatternConfig,
    withhold: Arc<AtomicBool>,
    unavailable: Mutex<HashSet<DeviceSelector>>,
    silent: Mutex<HashSet<DeviceSelector>>,
    opened: Mutex<Vec<DeviceSelector>>,
}

impl PatternDriver {
    pub fn new(config: PatternConfig) -> Self {
        Self {
            config,
            withhold: Arc::new(AtomicBool::new(false)),
            unavailable: Mutex::new(HashSet::new()),
            silent: Mutex::new(HashSet::new()),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Stop (or resume) frame delivery on every open and future device.
    pub fn withhold_frames(&self, withhold: bool) {
        self.withhold.store(withhold, Ordering::Relaxed);
    }

    pub fn set_unavailable(&self, selector: DeviceSelector, unavailable: bool) {
        let mut set = self.unavailable.lock().unwrap_or_else(|e| e.into_inner());
        if unavailable {
            set.insert(selector);
        } else {
            set.remove(&selector);
        }
    }

    pub fn set_silent(&self, selector: DeviceSelector, silent: bool) {
        let mut set = self.silent.lock().unwrap_or_else(|e| e.into_inner());
        if silent {
            set.insert(selector);
        } else {
            set.remove(&selector);
        }
    }

    /// Every selector passed to `open`, in order, including failed opens.
    pub fn opened(&self) -> Vec<DeviceSelector> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl CaptureDriver for PatternDriver {
    fn name(&self) -> &str {
        "pattern"
    }

    fn open(&self, selector: DeviceSelector) -> Result<Box<dyn CaptureDevice>, VideoError> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(selector);
        if self
            .unavailable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&selector)
        {
            return Err(VideoError::DeviceUnavailable(format!(
                "no {selector} pattern device"
            )));
        }
        let silent = self
            .silent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&selector);
        Ok(Box::new(PatternDevice {
            config: self.config.clone(),
            withhold: Arc::clone(&self.withhold),
            silent,
            next_due: Instant::now(),
            tick: 0,
            spare: None,
            open: true,
        }))
    }
}

struct PatternDevice {
    config: PatternConfig,
    withhold: Arc<AtomicBool>,
    silent: bool,
    next_due: Instant,
    tick: u64,
    spare: Option<Vec<u8>>,
    open: bool,
}

impl PatternDevice {
    fn render(&mut self) -> Frame {
        let size = self.config.size;
        let layout = self.config.layout;
        let mut data = self.spare.take().unwrap_or_default();
        data.resize(Frame::byte_len(size, layout), 0);

        let shift = (self.tick * 4) as usize;
        let channels = layout.channels();
        for y in 0..size.y {
            for x in 0..size.x {
                let offset = (y * size.x + x) * channels;
                let wave = ((x + y + shift) & 0xff) as u8;
                let pixel = &mut data[offset..offset + channels];
                match layout {
                    PixelLayout::Luma => pixel[0] = wave,
                    PixelLayout::Rgb | PixelLayout::Rgba => {
                        pixel[0] = wave;
                        pixel[1] = (x * 255 / size.x.max(1)) as u8;
                        pixel[2] = (y * 255 / size.y.max(1)) as u8;
                        if channels == 4 {
                            pixel[3] = convert::OPAQUE_ALPHA;
                        }
                    }
                }
            }
        }
        self.tick += 1;
        Frame {
            size,
            layout,
            data,
            sequence: 0,
        }
    }
}

impl CaptureDevice for PatternDevice {
    fn size(&self) -> Vec2<usize> {
        self.config.size
    }

    fn blocking_capture(&mut self, timeout: Duration) -> Result<Option<Frame>, VideoError> {
        if !self.open {
            return Err(VideoError::Stream("pattern device is closed".to_string()));
        }
        if self.silent || self.withhold.load(Ordering::Relaxed) {
            std::thread::sleep(timeout);
            return Ok(None);
        }

        let now = Instant::now();
        if self.next_due > now {
            let remaining = self.next_due - now;
            if remaining > timeout {
                std::thread::sleep(timeout);
                return Ok(None);
            }
            std::thread::sleep(remaining);
        }

        // don't try to catch up after a slow consumer
        self.next_due = Instant::now().max(self.next_due) + self.config.frame_interval;
        Ok(Some(self.render()))
    }

    fn recycle(&mut self, frame: Frame) {
        self.spare = Some(frame.data);
    }

    fn close(&mut self) {
        self.open = false;
    }
}
