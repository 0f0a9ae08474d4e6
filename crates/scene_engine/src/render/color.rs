//! Linear RGB(A) colors

/// RGB color with float channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color3 {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color3 {
    /// Create a color from channels
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Color from a `0xRRGGBB` literal
    pub fn rgb(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Color from hue in degrees, saturation and value.
    ///
    /// Hue wraps around, so 360° equals 0°.
    pub fn from_hsv(hue_degrees: f32, saturation: f32, value: f32) -> Self {
        let hue = hue_degrees.rem_euclid(360.0) / 60.0;
        let sector = hue.floor();
        let f = hue - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - f * saturation);
        let t = value * (1.0 - (1.0 - f) * saturation);

        match sector as u32 {
            0 => Self::new(value, t, p),
            1 => Self::new(q, value, p),
            2 => Self::new(p, value, t),
            3 => Self::new(p, q, value),
            4 => Self::new(t, p, value),
            _ => Self::new(value, p, q),
        }
    }

    /// Fully saturated, full-value color of the given hue
    pub fn from_hue(hue_degrees: f32) -> Self {
        Self::from_hsv(hue_degrees, 1.0, 1.0)
    }

    /// Add an opaque alpha channel
    pub const fn opaque(self) -> Color4 {
        Color4::new(self.r, self.g, self.b, 1.0)
    }
}

/// RGBA color with float channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color4 {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color4 {
    /// Create a color from channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` literal
    pub fn rgb(hex: u32) -> Self {
        Color3::rgb(hex).opaque()
    }

    /// Channels as an array
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color3> for Color4 {
    fn from(color: Color3) -> Self {
        color.opaque()
    }
}
