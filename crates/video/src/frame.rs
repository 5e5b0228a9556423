use {crate::*, base::Vec2};

/// Channel layout of a frame. Pixels are interleaved, rows are tightly packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    Luma,
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Luma => 1,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    pub fn from_channels(channels: usize) -> Result<Self, VideoError> {
        match channels {
            1 => Ok(PixelLayout::Luma),
            3 => Ok(PixelLayout::Rgb),
            4 => Ok(PixelLayout::Rgba),
            _ => Err(VideoError::InvalidFrame(format!(
                "unsupported channel count: {channels}"
            ))),
        }
    }
}

/// One decoded image from the capture device.
///
/// `data` holds `size.x * size.y * layout.channels()` bytes with no row
/// padding. Once a frame is published to a [`FrameBuffer`] nobody mutates it
/// again; the consumer gets sole ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: Vec2<usize>,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
    /// Value of the session frame counter when this frame was captured, 0 if never published.
    pub sequence: u64,
}

impl Frame {
    pub fn new(size: Vec2<usize>, layout: PixelLayout, data: Vec<u8>) -> Result<Self, VideoError> {
        let frame = Self {
            size,
            layout,
            data,
            sequence: 0,
        };
        frame.ensure_continuous()?;
        Ok(frame)
    }

    /// All-zero frame.
    pub fn blank(size: Vec2<usize>, layout: PixelLayout) -> Self {
        Self {
            size,
            layout,
            data: vec![0; Self::byte_len(size, layout)],
            sequence: 0,
        }
    }

    pub fn byte_len(size: Vec2<usize>, layout: PixelLayout) -> usize {
        size.area() * layout.channels()
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn is_continuous(&self) -> bool {
        self.data.len() == Self::byte_len(self.size, self.layout)
    }

    pub fn ensure_continuous(&self) -> Result<(), VideoError> {
        if self.is_continuous() {
            Ok(())
        } else {
            Err(VideoError::InvalidFrame(format!(
                "{} {:?} frame needs {} bytes, has {}",
                self.size,
                self.layout,
                Self::byte_len(self.size, self.layout),
                self.data.len()
            )))
        }
    }

    /// Channels of the pixel at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let channels = self.channels();
        let offset = (y * self.size.x + x) * channels;
        &self.data[offset..offset + channels]
    }
}
