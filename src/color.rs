// Simple color struct, created from an unsigned 32 representing 0xRRGGBB.
// Alpha is supplied per draw call, so a color only carries its channels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_u32(0xffffff);

    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 16) as u8;
        let g = (num >> 8) as u8;
        let b = num as u8;

        Color { r, g, b }
    }

    pub fn rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha.max(0.0).min(1.0))
    }

    pub fn transparent(&self) -> String {
        self.rgba(0.0)
    }
}
