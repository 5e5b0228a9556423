use {
    crate::*,
    base::Vec2,
    std::collections::HashMap,
    video::convert,
};

const CLEAR_COLOR: u32 = 0x0000_0000;

struct CpuTexture {
    spec: Option<TextureSpec>,
    rgba: Vec<u8>,
}

/// Software [`Surface`] rendering into a packed `0RGB` pixel buffer.
///
/// Textures are kept as RGBA in memory and sampled nearest-neighbour through
/// the quad's texture coordinates. Works headless; the window surface presents
/// its pixels.
pub struct Canvas {
    size: Vec2<usize>,
    viewport: Vec2<usize>,
    pixels: Vec<u32>,
    textures: HashMap<TextureId, CpuTexture>,
    programs: Vec<ProgramId>,
    next_id: u32,
    resized: Option<Vec2<usize>>,
    presented: u64,
}

impl Canvas {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            viewport: size,
            pixels: vec![CLEAR_COLOR; size.area()],
            textures: HashMap::new(),
            programs: Vec::new(),
            next_id: 1,
            resized: None,
            presented: 0,
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    /// Change the pixel buffer size and report it through `poll_resize`.
    pub fn resize(&mut self, size: Vec2<usize>) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.pixels = vec![CLEAR_COLOR; size.area()];
        self.resized = Some(size);
    }

    /// Row-major `0RGB` pixels, `size.x * size.y` of them.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.size.x + x]
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Spec of a live texture.
    pub fn texture_spec(&self, texture: TextureId) -> Option<TextureSpec> {
        self.textures.get(&texture).and_then(|t| t.spec)
    }

    /// Number of live textures and programs.
    pub fn live_handles(&self) -> usize {
        self.textures.len() + self.programs.len()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn texture_mut(&mut self, texture: TextureId) -> Result<&mut CpuTexture, DisplayError> {
        self.textures
            .get_mut(&texture)
            .ok_or_else(|| DisplayError::Texture(format!("no texture {}", texture.0)))
    }
}

fn check_len(spec: TextureSpec, data: &[u8]) -> Result<(), DisplayError> {
    if data.len() != spec.byte_len() {
        return Err(DisplayError::Texture(format!(
            "{} {:?} texture needs {} bytes, got {}",
            spec.size,
            spec.format,
            spec.byte_len(),
            data.len()
        )));
    }
    Ok(())
}

impl Surface for Canvas {
    fn create_program(&mut self) -> Result<ProgramId, DisplayError> {
        let program = ProgramId(self.next_id());
        self.programs.push(program);
        Ok(program)
    }

    fn create_texture(&mut self) -> Result<TextureId, DisplayError> {
        let texture = TextureId(self.next_id());
        self.textures.insert(
            texture,
            CpuTexture {
                spec: None,
                rgba: Vec::new(),
            },
        );
        Ok(texture)
    }

    fn allocate_texture(
        &mut self,
        texture: TextureId,
        spec: TextureSpec,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        check_len(spec, data)?;
        let target = self.texture_mut(texture)?;
        // fresh storage, not a resize of the old one
        target.rgba = Vec::with_capacity(spec.size.area() * 4);
        convert::expand_pixels_to_rgba(spec.format.layout(), data, &mut target.rgba);
        target.spec = Some(spec);
        Ok(())
    }

    fn update_texture(&mut self, texture: TextureId, data: &[u8]) -> Result<(), DisplayError> {
        let target = self.texture_mut(texture)?;
        let spec = target
            .spec
            .ok_or_else(|| DisplayError::Texture(format!("texture {} has no storage", texture.0)))?;
        check_len(spec, data)?;
        convert::expand_pixels_to_rgba(spec.format.layout(), data, &mut target.rgba);
        Ok(())
    }

    fn set_viewport(&mut self, size: Vec2<usize>) {
        self.viewport = size;
    }

    fn clear(&mut self) {
        self.pixels.fill(CLEAR_COLOR);
    }

    fn draw_quad(
        &mut self,
        program: ProgramId,
        texture: TextureId,
        quad: &Quad,
    ) -> Result<(), DisplayError> {
        if !self.programs.contains(&program) {
            return Err(DisplayError::Surface(format!("no program {}", program.0)));
        }
        let source = self
            .textures
            .get(&texture)
            .ok_or_else(|| DisplayError::Texture(format!("no texture {}", texture.0)))?;
        let Some(spec) = source.spec.filter(|spec| !spec.size.is_empty()) else {
            return Ok(());
        };

        let width = self.viewport.x.min(self.size.x);
        let height = self.viewport.y.min(self.size.y);
        for y in 0..height {
            let sy = (y as f32 + 0.5) / self.viewport.y as f32;
            for x in 0..width {
                let sx = (x as f32 + 0.5) / self.viewport.x as f32;
                let [u, v] = quad.texcoord_at(sx, sy);
                let tx = ((u * spec.size.x as f32) as usize).min(spec.size.x - 1);
                let ty = ((v * spec.size.y as f32) as usize).min(spec.size.y - 1);
                let offset = (ty * spec.size.x + tx) * 4;
                let texel = &source.rgba[offset..offset + 4];
                self.pixels[y * self.size.x + x] =
                    ((texel[0] as u32) << 16) | ((texel[1] as u32) << 8) | texel[2] as u32;
            }
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.presented += 1;
        Ok(())
    }

    fn poll_resize(&mut self) -> Option<Vec2<usize>> {
        self.resized.take()
    }

    fn delete_texture(&mut self, texture: TextureId) -> Result<(), DisplayError> {
        self.textures
            .remove(&texture)
            .map(|_| ())
            .ok_or_else(|| DisplayError::ResourceTeardown(format!("no texture {}", texture.0)))
    }

    fn delete_program(&mut self, program: ProgramId) -> Result<(), DisplayError> {
        let index = self
            .programs
            .iter()
            .position(|&p| p == program)
            .ok_or_else(|| DisplayError::ResourceTeardown(format!("no program {}", program.0)))?;
        self.programs.remove(index);
        Ok(())
    }
}
