/// Straight-alpha RGBA color.
///
/// Invariant:
/// - every channel lies in [0, 1]. Constructors and setters clamp their input,
///   so a `Color` can never carry an out-of-range channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// Creates a color from straight RGBA components, clamping each to [0, 1].
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r: clamp_unit(r), g: clamp_unit(g), b: clamp_unit(b), a: clamp_unit(a) }
    }

    /// Opaque color.
    #[inline]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Creates a color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    #[inline]
    pub fn red(self) -> f32 {
        self.r
    }

    #[inline]
    pub fn green(self) -> f32 {
        self.g
    }

    #[inline]
    pub fn blue(self) -> f32 {
        self.b
    }

    #[inline]
    pub fn alpha(self) -> f32 {
        self.a
    }

    #[inline]
    pub fn set_red(&mut self, v: f32) {
        self.r = clamp_unit(v);
    }

    #[inline]
    pub fn set_green(&mut self, v: f32) {
        self.g = clamp_unit(v);
    }

    #[inline]
    pub fn set_blue(&mut self, v: f32) {
        self.b = clamp_unit(v);
    }

    #[inline]
    pub fn set_alpha(&mut self, v: f32) {
        self.a = clamp_unit(v);
    }

    /// Returns a copy with alpha replaced.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: clamp_unit(a), ..self }
    }

    /// Channels as an `[r, g, b, a]` array, the layout used in vertex data.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels quantised to bytes, in RGBA order.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b), to_byte(self.a)]
    }

    /// Packs the color as `0xAARRGGBB`.
    #[inline]
    pub fn to_argb(self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = clamp_unit(t);
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// NaN maps to 0 so a bad input cannot poison vertex data.
#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_clamps_channels() {
        let c = Color::new(1.5, -0.25, 0.5, 2.0);
        assert_eq!(c.red(), 1.0);
        assert_eq!(c.green(), 0.0);
        assert_eq!(c.blue(), 0.5);
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn setters_clamp_channels() {
        let mut c = Color::WHITE;
        c.set_red(-3.0);
        c.set_green(7.0);
        c.set_blue(0.25);
        c.set_alpha(f32::NAN);
        assert_eq!(c.to_array(), [0.0, 1.0, 0.25, 0.0]);
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.1, 0.2, 0.3).alpha(), 1.0);
    }

    #[test]
    fn byte_packing() {
        let c = Color::new(1.0, 0.0, 0.5, 1.0);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
        assert_eq!(c.to_argb(), 0xFF_FF_00_80);
    }

    #[test]
    fn from_rgba8_round_trips_bytes() {
        let c = Color::from_rgba8(12, 34, 56, 78);
        assert_eq!(c.to_rgba8(), [12, 34, 56, 78]);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Color::new(1.0, 0.0, 0.0, 1.0);
        let b = Color::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5).to_array(), [0.5, 0.0, 0.5, 0.5]);
        // t outside [0, 1] is clamped.
        assert_eq!(a.lerp(b, 4.0), b);
    }
}
