/// Two-triangle strip covering the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Clip-space corners: bottom-left, bottom-right, top-left, top-right.
    pub positions: [[f32; 2]; 4],
    pub texcoords: [[f32; 2]; 4],
}

impl Quad {
    /// Texture coordinates are flipped vertically: capture rows start at the
    /// top of the image, texture rows at v = 0.
    pub const FULL_SCREEN: Quad = Quad {
        positions: [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]],
        texcoords: [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
    };

    /// Interpolated texture coordinate at viewport position (`sx`, `sy`),
    /// both in 0..=1 with the origin at the top-left of the viewport.
    pub fn texcoord_at(&self, sx: f32, sy: f32) -> [f32; 2] {
        // clip-space y grows upwards
        let fx = sx;
        let fy = 1.0 - sy;
        let bottom = lerp(self.texcoords[0], self.texcoords[1], fx);
        let top = lerp(self.texcoords[2], self.texcoords[3], fx);
        lerp(bottom, top, fy)
    }
}

fn lerp(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}
