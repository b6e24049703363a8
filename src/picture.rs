use nalgebra::Vector3;

/// Linear RGB triple. Sharing the vector type keeps attenuation a plain
/// componentwise multiply.
pub type Color = Vector3<f32>;

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct RGBA8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<Color> for RGBA8 {
    fn from(value: Color) -> Self {
        RGBA8::new_norm(value.x, value.y, value.z, 1.0)
    }
}

fn normalize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

impl RGBA8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        RGBA8 { r, g, b, a }
    }

    pub fn new_norm(r: f32, g: f32, b: f32, a: f32) -> Self {
        RGBA8::new(normalize(r), normalize(g), normalize(b), normalize(a))
    }

    pub fn channels(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Owned framebuffer of `width * height` pixels, row-major, top row first.
pub struct Picture {
    pixels: Vec<RGBA8>,
    size: (u32, u32),
}

impl Picture {
    pub fn new(pixels: Vec<RGBA8>, size: (u32, u32)) -> Self {
        assert_eq!(pixels.len(), size.0 as usize * size.1 as usize);
        Picture { pixels, size }
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    pub fn pixel(&self, x: u32, y: u32) -> &RGBA8 {
        &self.pixels[y as usize * self.width() as usize + x as usize]
    }

    /// Flattens the framebuffer into tightly packed RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
            .into_iter()
            .flat_map(|pixel| pixel.channels())
            .collect()
    }
}
