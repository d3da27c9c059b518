use tracing::debug;

use crate::config::Config;
use crate::config::ConfigError;
use crate::point::Point;
use crate::terrain::Material;
use crate::terrain::TerrainGenerator;
use crate::terrain::TerrainGrid;

/// Two terrain grids stitched into one surface that scrolls forever.
///
/// The viewport shows `height * scale` pixel rows. Viewport row `y` maps to terrain row
/// `r = (y + offset) / scale`: rows of `current` first, then rows of `next`. Once the offset has
/// covered all of `current`, `next` is promoted and a fresh `next` is generated.
pub struct ScrollBuffer {
    generator: TerrainGenerator,
    current: TerrainGrid,
    next: TerrainGrid,

    /// Viewport pixel rows scrolled past the top of `current`, always below `wrap_rows`
    offset: usize,

    /// Viewport pixels per terrain cell
    scale: usize,

    seed: u64,

    /// Generation of `current`. `next` is generation `generation + 1`.
    generation: u64,
}

impl ScrollBuffer {
    pub fn new(config: &Config, seed: u64) -> Result<Self, ConfigError> {
        let generator = TerrainGenerator::new(config)?;

        let current = generator.generate(generation_seed(seed, 0));
        let next = generator.generate(generation_seed(seed, 1));

        Ok(Self {
            generator,
            current,
            next,
            offset: 0,
            scale: config.display_scale,
            seed,
            generation: 0,
        })
    }

    /// Start from prebuilt grids instead of generating the first two. Later grids are still
    /// generated from `seed`.
    pub fn with_grids(
        config: &Config,
        seed: u64,
        current: TerrainGrid,
        next: TerrainGrid,
    ) -> Result<Self, ConfigError> {
        let generator = TerrainGenerator::new(config)?;

        for grid in [&current, &next] {
            if grid.width() != config.width || grid.height() != config.height {
                return Err(ConfigError::GridMismatch {
                    expected: (config.width, config.height),
                    got: (grid.width(), grid.height()),
                });
            }
        }

        Ok(Self {
            generator,
            current,
            next,
            offset: 0,
            scale: config.display_scale,
            seed,
            generation: 0,
        })
    }

    /// Throw away both grids and start over from `seed`.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.generation = 0;
        self.offset = 0;
        self.current = self.generator.generate(generation_seed(seed, 0));
        self.next = self.generator.generate(generation_seed(seed, 1));
    }

    /// Advance the scroll by one viewport row.
    ///
    /// Returns `true` when this tick promoted `next` to `current`.
    pub fn tick(&mut self) -> bool {
        self.offset += 1;

        if self.offset < self.wrap_rows() {
            return false;
        }

        self.offset = 0;
        self.generation += 1;

        let fresh = self
            .generator
            .generate(generation_seed(self.seed, self.generation + 1));
        self.current = std::mem::replace(&mut self.next, fresh);

        debug!(generation = self.generation, "Promoted next terrain");

        true
    }

    /// Ticks between promotions.
    pub fn wrap_rows(&self) -> usize {
        self.current.height() * self.scale
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn current(&self) -> &TerrainGrid {
        &self.current
    }

    pub fn next(&self) -> &TerrainGrid {
        &self.next
    }

    pub fn viewport_width(&self) -> usize {
        self.current.width() * self.scale
    }

    pub fn viewport_height(&self) -> usize {
        self.current.height() * self.scale
    }

    /// Terrain row shown on viewport row `viewport_y`.
    ///
    /// Rows past the end of `current` come from `next`, modulo its height.
    pub fn row_at(&self, viewport_y: usize) -> &[Material] {
        let h = self.current.height();
        let r = (viewport_y + self.offset) / self.scale;

        if r < h {
            self.current.row(r)
        } else {
            self.next.row((r - h) % h)
        }
    }

    /// Material shown at viewport pixel `(viewport_x, viewport_y)`. Columns wrap.
    pub fn material_at(&self, viewport_x: usize, viewport_y: usize) -> Material {
        let row = self.row_at(viewport_y);

        row[(viewport_x / self.scale) % row.len()]
    }

    /// Whether the box of half-size `radius` around `pos` touches anything but water.
    ///
    /// The box is clipped to the viewport first, so only visible terrain counts.
    pub fn collide(&self, pos: Point, radius: i32) -> bool {
        let radius = radius.max(0);
        let max_x = i32::try_from(self.viewport_width()).unwrap_or(i32::MAX) - 1;
        let max_y = i32::try_from(self.viewport_height()).unwrap_or(i32::MAX) - 1;

        let x0 = pos.x.saturating_sub(radius).max(0);
        let x1 = pos.x.saturating_add(radius).min(max_x);
        let y0 = pos.y.saturating_sub(radius).max(0);
        let y1 = pos.y.saturating_add(radius).min(max_y);

        if x0 > x1 || y0 > y1 {
            return false;
        }

        let c0 = x0 as usize / self.scale;
        let c1 = x1 as usize / self.scale;

        (y0..=y1).any(|y| {
            self.row_at(y as usize)[c0..=c1]
                .iter()
                .any(|m| !m.is_water())
        })
    }
}

/// Seed for the `n`-th terrain grid of a run seeded with `seed`.
pub fn generation_seed(seed: u64, n: u64) -> u64 {
    let mut z = seed.wrapping_add(n.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generation_seeds_differ() {
        assert_ne!(generation_seed(1, 0), generation_seed(1, 1));
        assert_ne!(generation_seed(1, 0), generation_seed(2, 0));
        assert_eq!(generation_seed(1, 5), generation_seed(1, 5));
    }

    #[test]
    fn viewport_is_scaled() {
        let config = Config::default().with_size(10, 6).with_display_scale(4);
        let scroll = ScrollBuffer::new(&config, 0).unwrap();

        assert_eq!(scroll.viewport_width(), 40);
        assert_eq!(scroll.viewport_height(), 24);
        assert_eq!(scroll.wrap_rows(), 24);
    }

    #[test]
    fn rows_map_through_scale_and_offset() {
        let config = Config::default().with_size(6, 5).with_display_scale(2);
        let mut scroll = ScrollBuffer::new(&config, 3).unwrap();

        assert_eq!(scroll.row_at(0), scroll.current().row(0));
        assert_eq!(scroll.row_at(1), scroll.current().row(0));
        assert_eq!(scroll.row_at(9), scroll.current().row(4));

        scroll.tick();
        scroll.tick();
        scroll.tick();

        // offset 3: viewport row 7 is scaled row 5, the first row of `next`
        assert_eq!(scroll.row_at(0), scroll.current().row(1));
        assert_eq!(scroll.row_at(6), scroll.current().row(4));
        assert_eq!(scroll.row_at(7), scroll.next().row(0));
        assert_eq!(scroll.row_at(9), scroll.next().row(1));
    }

    #[test]
    fn material_at_reads_columns() {
        let config = Config::default().with_size(8, 4).with_display_scale(2);
        let scroll = ScrollBuffer::new(&config, 21).unwrap();

        for x in 0..16 {
            assert_eq!(
                scroll.material_at(x, 0),
                scroll.current().get(x / 2, 0).unwrap()
            );
        }
    }

    #[test]
    fn collide_outside_viewport_is_clear() {
        let config = Config::default().with_size(8, 8).with_display_scale(1);
        let scroll = ScrollBuffer::new(&config, 1).unwrap();

        assert!(!scroll.collide(Point::new(-10, -10), 2));
        assert!(!scroll.collide(Point::new(100, 4), 2));
    }
}
