use {
    crate::*,
    base::Vec2,
    std::{fmt, time::Duration},
};

/// Which physical capture device to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceSelector {
    Any,
    Back,
    Front,
}

impl DeviceSelector {
    /// Selector for the given fallback attempt, cycling back, front, any.
    pub fn for_attempt(attempt: u32) -> Self {
        match attempt % 3 {
            1 => DeviceSelector::Back,
            2 => DeviceSelector::Front,
            _ => DeviceSelector::Any,
        }
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceSelector::Any => write!(f, "any"),
            DeviceSelector::Back => write!(f, "back"),
            DeviceSelector::Front => write!(f, "front"),
        }
    }
}

/// Opens capture devices. Shared between the session and its worker threads.
pub trait CaptureDriver: Send + Sync {
    fn name(&self) -> &str;

    /// Open the device behind `selector`. Called on the capture worker thread,
    /// the same thread that will call `blocking_capture`.
    fn open(&self, selector: DeviceSelector) -> Result<Box<dyn CaptureDevice>, VideoError>;
}

/// An open capture device.
pub trait CaptureDevice: Send {
    /// Negotiated frame size.
    fn size(&self) -> Vec2<usize>;

    /// Wait at most `timeout` for the next frame. `Ok(None)` means nothing arrived in time.
    fn blocking_capture(&mut self, timeout: Duration) -> Result<Option<Frame>, VideoError>;

    /// Receive a captured frame back once the pipeline is done with it.
    fn recycle(&mut self, _frame: Frame) {}

    /// Release the device. Safe to call more than once.
    fn close(&mut self);
}
