use crate::bit_grid::BitGrid;
use crate::scroll::ScrollBuffer;
use crate::session::Agent;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Renders a pixel buffer as braille text, 2x4 pixels per character.
pub struct Camera {
    /// The pixel buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the pixel buffer
    w: usize,

    /// Height of the pixel buffer
    h: usize,
}

impl Camera {
    pub fn new(w: usize, h: usize) -> Self {
        let cb = vec![false; w * h];

        // Let `w` and `h` refer to width and height of the pixel buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our framebuffer
        // (that is, not accounting for the trailing newlines expected at the end of each line).
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));
        let cp = vec![BRAILLE_EMPTY; bw * bh];

        // Each braille character is 3 bytes in UTF-8, and newlines one byte.
        let fb = String::with_capacity(3 * (bw * bh) + bh);

        Self { cb, fb, cp, w, h }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Turns on a single pixel. Pixels outside the buffer are ignored.
    pub fn draw_pixel(&mut self, x: usize, y: usize) {
        if x < self.w && y < self.h {
            let i = self.xy_from(x, y);
            self.cb[i] = true;
        }
    }

    /// Turns on the `s` by `s` square whose top left corner is `(x, y)`, clipped to the buffer.
    pub fn draw_square(&mut self, x: usize, y: usize, s: usize) {
        for dy in 0..s {
            for dx in 0..s {
                self.draw_pixel(x + dx, y + dy);
            }
        }
    }

    /// Reset the pixel buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Draw every live cell of `grid`, one pixel per cell.
    pub fn draw_grid(&mut self, grid: &BitGrid) {
        for (x, y) in grid.live_cells() {
            self.draw_pixel(x, y);
        }
    }

    /// Draw every non-water pixel of the visible terrain.
    pub fn draw_terrain(&mut self, scroll: &ScrollBuffer) {
        let w = scroll.viewport_width().min(self.w);
        let h = scroll.viewport_height().min(self.h);

        for y in 0..h {
            for x in 0..w {
                if !scroll.material_at(x, y).is_water() {
                    self.draw_pixel(x, y);
                }
            }
        }
    }

    /// Draw the agent's collision box. While blinking it only shows on even frames.
    pub fn draw_agent(&mut self, agent: &Agent, radius: i32, frame: u64) {
        if agent.is_blinking() && frame % 2 == 1 {
            return;
        }

        let x = (agent.pos.x - radius).max(0) as usize;
        let y = (agent.pos.y - radius).max(0) as usize;

        self.draw_square(x, y, 2 * radius as usize + 1);
    }

    /// Fundamentally, we have a buffer of every pixel on our screen, and we ask ourselves "Is
    /// this pixel on or off?".
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            let (x, y) = self.xy_to(n);
            let hex = Self::get_hex_value(x, y);

            if px {
                self.cp[(y / 4) * bw + (x / 2)] += hex;
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            // Every codepoint is in U+2800..=U+28FF, all valid chars
            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

/// Camera sized to show all of `grid`.
pub fn for_grid(grid: &BitGrid) -> Camera {
    Camera::new(grid.width(), grid.height())
}
