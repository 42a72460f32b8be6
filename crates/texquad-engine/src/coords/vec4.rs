/// 4-component float vector in homogeneous clip space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Perspective divide. Returns `None` when `w` is zero.
    #[inline]
    pub fn to_ndc(self) -> Option<super::Vec2> {
        if self.w == 0.0 {
            return None;
        }
        Some(super::Vec2::new(self.x / self.w, self.y / self.w))
    }
}

impl From<[f32; 4]> for Vec4 {
    #[inline]
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}
