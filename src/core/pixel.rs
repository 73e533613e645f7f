use crate::core::color::Color;

/// Glyph used for lit cells in terminal mode
pub const FULL_BLOCK: char = '█';

/// One terminal cell: a glyph drawn in a foreground color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixel {
    pub ch: char,
    pub color: Color,
}

impl Pixel {
    pub fn new(ch: char, color: Color) -> Self {
        Self { ch, color }
    }

    /// An empty cell showing the background color.
    pub fn blank(background: Color) -> Self {
        Self::new(' ', background)
    }

    pub fn full(color: Color) -> Self {
        Self::new(FULL_BLOCK, color)
    }

    pub fn reset(&mut self, clear_color: Color) {
        self.ch = ' ';
        self.color = clear_color;
    }
}
