use {
    crate::*,
    base::Vec2,
};

/// Drawing target of the render loop.
///
/// Shaped after a GL context: textures and programs are opaque handles owned
/// by the surface and only valid on the thread that drives the render loop.
pub trait Surface {
    fn create_program(&mut self) -> Result<ProgramId, DisplayError>;

    fn create_texture(&mut self) -> Result<TextureId, DisplayError>;

    /// (Re)allocate storage for `texture` and fill it with `data`.
    fn allocate_texture(
        &mut self,
        texture: TextureId,
        spec: TextureSpec,
        data: &[u8],
    ) -> Result<(), DisplayError>;

    /// Overwrite the existing storage of `texture`; `data` matches its current spec.
    fn update_texture(&mut self, texture: TextureId, data: &[u8]) -> Result<(), DisplayError>;

    fn set_viewport(&mut self, size: Vec2<usize>);

    fn clear(&mut self);

    fn draw_quad(
        &mut self,
        program: ProgramId,
        texture: TextureId,
        quad: &Quad,
    ) -> Result<(), DisplayError>;

    fn present(&mut self) -> Result<(), DisplayError>;

    /// New surface size if it changed since the last call.
    fn poll_resize(&mut self) -> Option<Vec2<usize>>;

    fn delete_texture(&mut self, texture: TextureId) -> Result<(), DisplayError>;

    fn delete_program(&mut self, program: ProgramId) -> Result<(), DisplayError>;
}
