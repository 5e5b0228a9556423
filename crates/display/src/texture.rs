use {
    crate::*,
    base::Vec2,
    video::{Frame, PixelLayout},
};

/// Texture storage format, picked from the frame's channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Luminance,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_layout(layout: PixelLayout) -> Self {
        match layout {
            PixelLayout::Luma => PixelFormat::Luminance,
            PixelLayout::Rgb => PixelFormat::Rgb,
            PixelLayout::Rgba => PixelFormat::Rgba,
        }
    }

    pub fn layout(&self) -> PixelLayout {
        match self {
            PixelFormat::Luminance => PixelLayout::Luma,
            PixelFormat::Rgb => PixelLayout::Rgb,
            PixelFormat::Rgba => PixelLayout::Rgba,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.layout().channels()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSpec {
    pub size: Vec2<usize>,
    pub format: PixelFormat,
}

impl TextureSpec {
    pub fn of(frame: &Frame) -> Self {
        Self {
            size: frame.size,
            format: PixelFormat::from_layout(frame.layout),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.size.area() * self.format.bytes_per_pixel()
    }
}

// shown until the first frame arrives
const PLACEHOLDER_SIZE: Vec2<usize> = Vec2::new(2, 2);
const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 0, 255];

/// The one texture and program the render loop draws with.
///
/// Storage is reallocated only when a frame's size or format differs from the
/// current texture; otherwise it is updated in place.
#[derive(Debug, Default)]
pub struct TexturePipeline {
    program: Option<ProgramId>,
    texture: Option<TextureId>,
    spec: Option<TextureSpec>,
    allocations: u64,
    uploads: u64,
}

impl TexturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the program and texture, the texture holding a 2x2 opaque-black placeholder.
    pub fn init<S: Surface>(&mut self, surface: &mut S) -> Result<(), DisplayError> {
        let program = surface.create_program()?;
        self.program = Some(program);
        let texture = surface.create_texture()?;
        self.texture = Some(texture);

        let spec = TextureSpec {
            size: PLACEHOLDER_SIZE,
            format: PixelFormat::Rgba,
        };
        let data = PLACEHOLDER_PIXEL.repeat(PLACEHOLDER_SIZE.area());
        self.allocate(surface, texture, spec, &data)
    }

    /// Upload `frame` into the texture.
    pub fn upload<S: Surface>(&mut self, surface: &mut S, frame: &Frame) -> Result<(), DisplayError> {
        frame
            .ensure_continuous()
            .map_err(|error| DisplayError::Texture(error.to_string()))?;
        let texture = self
            .texture
            .ok_or_else(|| DisplayError::Texture("texture pipeline not initialized".to_string()))?;

        let spec = TextureSpec::of(frame);
        if self.spec == Some(spec) {
            surface.update_texture(texture, &frame.data)?;
        } else {
            log::debug!("texture: reallocating for {} {:?}", spec.size, spec.format);
            self.allocate(surface, texture, spec, &frame.data)?;
        }
        self.uploads += 1;
        Ok(())
    }

    fn allocate<S: Surface>(
        &mut self,
        surface: &mut S,
        texture: TextureId,
        spec: TextureSpec,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        // a failed allocation leaves the old storage undefined
        self.spec = None;
        surface.allocate_texture(texture, spec, data)?;
        self.spec = Some(spec);
        self.allocations += 1;
        Ok(())
    }

    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Size and format of the current texture storage.
    pub fn spec(&self) -> Option<TextureSpec> {
        self.spec
    }

    /// Storage allocations so far, the placeholder included.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Frames uploaded so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Delete the texture and program. Each handle is released at most once,
    /// even if deleting the other one fails.
    pub fn release<S: Surface>(&mut self, surface: &mut S) -> Result<(), DisplayError> {
        let mut failures = Vec::new();
        if let Some(texture) = self.texture.take() {
            if let Err(error) = surface.delete_texture(texture) {
                failures.push(format!("texture {}: {}", texture.0, error));
            }
        }
        if let Some(program) = self.program.take() {
            if let Err(error) = surface.delete_program(program) {
                failures.push(format!("program {}: {}", program.0, error));
            }
        }
        self.spec = None;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DisplayError::ResourceTeardown(failures.join(", ")))
        }
    }
}
