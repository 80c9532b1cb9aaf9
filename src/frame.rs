//! Ring frame buffer.

use smart_leds::RGB8;

use crate::config::{FRAME_BYTES, NUM_LEDS};

pub const BLACK: RGB8 = RGB8::new(0, 0, 0);
pub const RED: RGB8 = RGB8::new(255, 0, 0);

/// Blue at the given brightness.
pub const fn blue(level: u8) -> RGB8 {
    RGB8::new(0, 0, level)
}

/// One color per physical LED. Cleared and fully redrawn every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingFrame {
    colors: [RGB8; NUM_LEDS],
}

impl Default for RingFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl RingFrame {
    pub const fn new() -> Self {
        Self {
            colors: [BLACK; NUM_LEDS],
        }
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    pub fn fill(&mut self, color: RGB8) {
        self.colors.fill(color);
    }

    /// Set one LED; ring positions past the strip are ignored.
    pub fn set(&mut self, index: usize, color: RGB8) {
        if let Some(c) = self.colors.get_mut(index) {
            *c = color;
        }
    }

    pub fn get(&self, index: usize) -> RGB8 {
        self.colors.get(index).copied().unwrap_or(BLACK)
    }

    pub fn colors(&self) -> &[RGB8; NUM_LEDS] {
        &self.colors
    }

    pub fn is_dark(&self) -> bool {
        self.colors.iter().all(|c| *c == BLACK)
    }

    /// Flatten to R, G, B bytes per LED.
    pub fn to_bytes(&self) -> [u8; FRAME_BYTES] {
        let mut bytes = [0u8; FRAME_BYTES];
        for (chunk, c) in bytes.chunks_exact_mut(3).zip(self.colors.iter()) {
            chunk[0] = c.r;
            chunk[1] = c.g;
            chunk[2] = c.b;
        }
        bytes
    }
}
