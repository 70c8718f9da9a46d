/// Viewport size in logical pixels.
///
/// The sprite pipeline uploads this as its projection basis: logical px are
/// mapped to NDC with `(0, 0)` at the top-left corner.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a logical-pixel position to normalized device coordinates.
    ///
    /// Mirrors the vertex shader; kept on the CPU side for tests and tooling.
    #[inline]
    pub fn to_ndc(self, x: f32, y: f32) -> [f32; 2] {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        [x / w * 2.0 - 1.0, 1.0 - y / h * 2.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let vp = Viewport::new(200.0, 100.0);
        assert_eq!(vp.to_ndc(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(vp.to_ndc(200.0, 100.0), [1.0, -1.0]);
        assert_eq!(vp.to_ndc(100.0, 50.0), [0.0, 0.0]);
    }

    #[test]
    fn validity() {
        assert!(Viewport::new(1.0, 1.0).is_valid());
        assert!(!Viewport::new(0.0, 1.0).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 1.0).is_valid());
    }
}
