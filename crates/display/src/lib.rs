//! Render side of the live view: drains the latest frame, uploads it as a
//! texture and draws it as a full-screen quad at a fixed cadence.

pub mod cadence;
pub mod canvas;
pub mod error;
pub mod quad;
pub mod renderloop;
pub mod surface;
pub mod texture;

#[cfg(feature = "window")]
pub mod window;

pub use cadence::FrameCadence;
pub use canvas::Canvas;
pub use error::DisplayError;
pub use quad::Quad;
pub use renderloop::{RenderHandle, RenderLoop, RenderTask};
pub use surface::Surface;
pub use texture::{PixelFormat, ProgramId, TextureId, TexturePipeline, TextureSpec};

#[cfg(feature = "window")]
pub use {minifb::Key, window::WindowSurface};
