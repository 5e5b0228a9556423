use {
    crate::*,
    base::Vec2,
    minifb::{Key, KeyRepeat, Window, WindowOptions},
};

/// A desktop window presenting a [`Canvas`].
///
/// minifb windows must stay on the thread that created them, so this surface
/// is `!Send` and the render loop runs on that thread.
pub struct WindowSurface {
    window: Window,
    canvas: Canvas,
}

impl WindowSurface {
    pub fn new(title: &str, size: Vec2<usize>) -> Result<Self, DisplayError> {
        let mut window = Window::new(
            title,
            size.x,
            size.y,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;
        // pacing comes from the render loop
        window.set_target_fps(0);
        log::info!("window: opened at {}", size);
        Ok(Self {
            window,
            canvas: Canvas::new(size),
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.window.is_key_down(key)
    }

    /// Pressed since the last update, without key repeat.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl Surface for WindowSurface {
    fn create_program(&mut self) -> Result<ProgramId, DisplayError> {
        self.canvas.create_program()
    }

    fn create_texture(&mut self) -> Result<TextureId, DisplayError> {
        self.canvas.create_texture()
    }

    fn allocate_texture(
        &mut self,
        texture: TextureId,
        spec: TextureSpec,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        self.canvas.allocate_texture(texture, spec, data)
    }

    fn update_texture(&mut self, texture: TextureId, data: &[u8]) -> Result<(), DisplayError> {
        self.canvas.update_texture(texture, data)
    }

    fn set_viewport(&mut self, size: Vec2<usize>) {
        self.canvas.set_viewport(size);
    }

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn draw_quad(
        &mut self,
        program: ProgramId,
        texture: TextureId,
        quad: &Quad,
    ) -> Result<(), DisplayError> {
        self.canvas.draw_quad(program, texture, quad)
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        let size = self.canvas.size();
        self.window
            .update_with_buffer(self.canvas.pixels(), size.x, size.y)?;
        self.canvas.present()
    }

    fn poll_resize(&mut self) -> Option<Vec2<usize>> {
        let (width, height) = self.window.get_size();
        if width > 0 && height > 0 {
            self.canvas.resize(Vec2::new(width, height));
        }
        self.canvas.poll_resize()
    }

    fn delete_texture(&mut self, texture: TextureId) -> Result<(), DisplayError> {
        self.canvas.delete_texture(texture)
    }

    fn delete_program(&mut self, program: ProgramId) -> Result<(), DisplayError> {
        self.canvas.delete_program(program)
    }
}
