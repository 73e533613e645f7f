#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32, // Red component (0.0 - 1.0)
    pub g: f32, // Green component (0.0 - 1.0)
    pub b: f32, // Blue component (0.0 - 1.0)
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a hexadecimal string.
    /// Accepts formats like "#RRGGBB" or "RRGGBB".
    pub fn from_hex(hex: &str) -> Result<Self, &'static str> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err("Hex string should be 6 characters long (RRGGBB).");
        }

        let channel = |range: std::ops::Range<usize>, err: &'static str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| err)
        };

        Ok(Self::new(
            channel(0..2, "Invalid red component in hex")?,
            channel(2..4, "Invalid green component in hex")?,
            channel(4..6, "Invalid blue component in hex")?,
        ))
    }

    const fn hex_char_to_u8(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => 0,
        }
    }

    const fn hex_pair_to_u8(high: u8, low: u8) -> u8 {
        (Self::hex_char_to_u8(high) << 4) | Self::hex_char_to_u8(low)
    }

    /// Const constructor for the predefined palette below. Expects a valid "RRGGBB" literal.
    const fn hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();
        let r = Self::hex_pair_to_u8(bytes[0], bytes[1]) as f32 / 255.0;
        let g = Self::hex_pair_to_u8(bytes[2], bytes[3]) as f32 / 255.0;
        let b = Self::hex_pair_to_u8(bytes[4], bytes[5]) as f32 / 255.0;
        Self { r, g, b }
    }

    fn channel_u8(v: f32) -> u8 {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            Self::channel_u8(self.r),
            Self::channel_u8(self.g),
            Self::channel_u8(self.b),
        )
    }

    pub fn to_crossterm_color(&self) -> crossterm::style::Color {
        let (r, g, b) = self.to_rgb8();
        crossterm::style::Color::Rgb { r, g, b }
    }

    /// 0x00RRGGBB, the layout minifb expects
    pub fn to_u32(&self) -> u32 {
        let (r, g, b) = self.to_rgb8();
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }
}

// Predefined colors
impl Color {
    pub const BLACK: Color = Color::hex("000000");
    pub const WHITE: Color = Color::hex("FFFFFF");
    pub const RED: Color = Color::hex("FF0000");
    pub const GREEN: Color = Color::hex("00FF00");
    pub const BLUE: Color = Color::hex("0000FF");
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
