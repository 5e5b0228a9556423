//! Real-time frame delivery for a live camera view.
//!
//! Frames come from a [`CaptureDriver`] on a blocking worker, optionally pass
//! through an external [`Transform`], and land in a latest-wins
//! [`FrameBuffer`] that the render thread drains. A [`Supervisor`] drives the
//! [`Watchdog`] and cycles device selectors when the device stalls.

pub mod config;
pub mod convert;
pub mod device;
pub mod error;
pub mod frame;
pub mod framebuffer;
pub mod mode;
pub mod pattern;
pub mod session;
pub mod status;
pub mod supervisor;
pub mod transform;
pub mod watchdog;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::PipelineConfig;
pub use device::{CaptureDevice, CaptureDriver, DeviceSelector};
pub use error::VideoError;
pub use frame::{Frame, PixelLayout};
pub use framebuffer::FrameBuffer;
pub use mode::{Layer, LayerVisibility, ModeController, ModeHandle, PipelineMode};
pub use pattern::{PatternConfig, PatternDriver};
pub use session::{CaptureSession, FrameCounter, FrameSink};
pub use status::{Status, StatusReceiver, StatusSender, status_channel};
pub use supervisor::{Supervisor, SupervisorHandle};
pub use transform::Transform;
pub use watchdog::{Verdict, Watchdog, WatchdogPhase};

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Config, V4l2Driver};
