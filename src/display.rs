pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Pixel colour for a lit cell
pub const ON_COLOR: u32 = 0xFFF0EDCC;
/// Pixel colour for a dark cell
pub const OFF_COLOR: u32 = 0xFF02343F;

/// 64x32 monochrome framebuffer
pub struct Display {
    pixels: [[bool; WIDTH]; HEIGHT],
}

impl Default for Display {
    fn default() -> Self {
        Self {
            pixels: [[false; WIDTH]; HEIGHT],
        }
    }
}

impl Display {
    pub fn clear(&mut self) {
        self.pixels = [[false; WIDTH]; HEIGHT];
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.pixels
    }

    /// XOR `sprite` onto the screen with its top-left corner at (`x`, `y`).
    ///
    /// Each byte is one row, most significant bit leftmost. A row that
    /// falls below the bottom edge ends the whole sprite; a column past
    /// the right edge only ends the current row. Returns true when any
    /// lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;

        for (row, &bits) in sprite.iter().enumerate() {
            let py = y + row;
            if py >= HEIGHT {
                break;
            }

            for col in 0..8 {
                let px = x + col;
                if px >= WIDTH {
                    break;
                }

                let bit = (bits >> (7 - col)) & 1 == 1;
                let pixel = &mut self.pixels[py][px];
                if bit && *pixel {
                    collision = true;
                }
                *pixel ^= bit;
            }
        }

        collision
    }

    /// One `u32` per cell, row-major, ready for `Window::update_with_buffer`
    pub fn to_rgb(&self, on: u32, off: u32) -> Vec<u32> {
        let mut pixels = Vec::with_capacity(WIDTH * HEIGHT);
        for row in &self.pixels {
            for &lit in row {
                pixels.push(if lit { on } else { off });
            }
        }
        pixels
    }
}
