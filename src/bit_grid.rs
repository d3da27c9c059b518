use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::GridOffset;
use crate::config::ConfigError;

const WORD_BITS: usize = u64::BITS as usize;

/// The 8 cells surrounding a cell, excluding the cell itself.
pub const MOORE_OFFSETS: [(GridOffset, GridOffset); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A fixed size grid of cells, one bit each, whose edges wrap around.
///
/// Cell `(x, y)` lives at bit `i = y * width + x`, packed into `u64` words with cell `i` at bit
/// `i % 64` of word `i / 64`.
///
/// Every coordinate is valid: `x` and `y` are first reduced modulo the width and height
/// (euclidean remainder, so `-1` is the last column), which makes the grid a torus.
#[derive(Clone, PartialEq, Eq)]
pub struct BitGrid {
    words: Vec<u64>,
    w: usize,
    h: usize,
}

impl BitGrid {
    /// Create an all-dead grid.
    pub fn new(w: usize, h: usize) -> Result<Self, ConfigError> {
        if w == 0 {
            return Err(ConfigError::ZeroWidth);
        }

        if h == 0 {
            return Err(ConfigError::ZeroHeight);
        }

        let words = vec![0; (w * h).div_ceil(WORD_BITS)];

        Ok(Self { words, w, h })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn get(&self, x: GridOffset, y: GridOffset) -> bool {
        let i = self.index(x, y);

        (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    pub fn set(&mut self, x: GridOffset, y: GridOffset, value: bool) {
        let i = self.index(x, y);
        let mask = 1 << (i % WORD_BITS);

        if value {
            self.words[i / WORD_BITS] |= mask;
        } else {
            self.words[i / WORD_BITS] &= !mask;
        }
    }

    /// Number of live cells among the 8 surrounding `(x, y)`.
    ///
    /// Each offset is wrapped on its own, so on grids narrower than 3 cells the same cell may be
    /// counted more than once.
    pub fn count_live_neighbors(&self, x: GridOffset, y: GridOffset) -> u8 {
        // Wrap first so adding an offset can't overflow
        let x = x.rem_euclid(self.w as GridOffset);
        let y = y.rem_euclid(self.h as GridOffset);

        MOORE_OFFSETS
            .iter()
            .filter(|&&(dx, dy)| self.get(x + dx, y + dy))
            .count() as u8
    }

    /// Fill every cell from a [`Pcg32`] stream seeded with `seed`.
    ///
    /// Cell `i` (row major) takes the `i`-th draw, so the same seed always yields the same grid.
    pub fn randomize(&mut self, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);

        self.clear();

        for i in 0..self.w * self.h {
            if rng.random::<bool>() {
                self.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Coordinates of every live cell, row major.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.w * self.h)
            .filter(|&i| (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1)
            .map(|i| (i % self.w, i / self.w))
    }

    /// Linear index of `(x, y)` after wrapping.
    fn index(&self, x: GridOffset, y: GridOffset) -> usize {
        let x = x.rem_euclid(self.w as GridOffset) as usize;
        let y = y.rem_euclid(self.h as GridOffset) as usize;

        y * self.w + x
    }
}

impl std::fmt::Debug for BitGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "BitGrid {}x{}", self.w, self.h)?;

        for y in 0..self.h as GridOffset {
            for x in 0..self.w as GridOffset {
                let c = if self.get(x, y) { '#' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
