use tracing::debug;

use crate::GridOffset;
use crate::bit_grid::MOORE_OFFSETS;
use crate::config::Config;
use crate::config::ConfigError;
use crate::noise::NoiseField;

/// Noise at or above this becomes rock.
pub const ROCK_THRESHOLD: f32 = 0.62;

/// Noise at or above this (and below [`ROCK_THRESHOLD`]) becomes ice.
pub const ICE_THRESHOLD: f32 = 0.48;

/// What a terrain cell is made of. Only water is safe to cross.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Water = 0,
    Rock = 1,
    Ice = 2,
}

impl Material {
    /// Classify a noise sample.
    pub fn from_noise(v: f32) -> Self {
        if v >= ROCK_THRESHOLD {
            Material::Rock
        } else if v >= ICE_THRESHOLD {
            Material::Ice
        } else {
            Material::Water
        }
    }

    pub fn is_water(self) -> bool {
        self == Material::Water
    }
}

/// A `w` by `h` grid of [`Material`]s. Unlike [`crate::bit_grid::BitGrid`] it does not wrap.
#[derive(Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    cells: Vec<Material>,
    w: usize,
    h: usize,
}

impl TerrainGrid {
    /// A grid made entirely of `material`.
    pub fn filled(w: usize, h: usize, material: Material) -> Result<Self, ConfigError> {
        if w == 0 {
            return Err(ConfigError::ZeroWidth);
        }

        if h == 0 {
            return Err(ConfigError::ZeroHeight);
        }

        Ok(Self {
            cells: vec![material; w * h],
            w,
            h,
        })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Material at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Material> {
        if x >= self.w || y >= self.h {
            return None;
        }

        Some(self.cells[y * self.w + x])
    }

    /// Write `material` at `(x, y)`. Writes outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, material: Material) {
        if x < self.w && y < self.h {
            self.cells[y * self.w + x] = material;
        }
    }

    /// Row `y`. Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[Material] {
        &self.cells[y * self.w..(y + 1) * self.w]
    }

    /// Number of cells among the (up to) 8 around `(x, y)` that hold `material`. Cells past the
    /// edge are not counted, so edge cells have fewer candidates.
    pub fn count_neighbors(&self, x: usize, y: usize, material: Material) -> u8 {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                let nx = x.checked_add_signed(dx as isize)?;
                let ny = y.checked_add_signed(dy as isize)?;
                self.get(nx, ny)
            })
            .filter(|&m| m == material)
            .count() as u8
    }

    pub fn count(&self, material: Material) -> usize {
        self.cells.iter().filter(|&&m| m == material).count()
    }
}

impl std::fmt::Debug for TerrainGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "TerrainGrid {}x{}", self.w, self.h)?;

        for y in 0..self.h {
            for &m in self.row(y) {
                let c = match m {
                    Material::Water => '~',
                    Material::Rock => '#',
                    Material::Ice => '*',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Builds terrain from a seed: noise classification, majority smoothing, then a connectivity
/// pass over water.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainGenerator {
    w: usize,
    h: usize,
    smoothing_passes: u32,
    majority_threshold: u8,
    connectivity_threshold: u8,
}

impl TerrainGenerator {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            w: config.width,
            h: config.height,
            smoothing_passes: config.smoothing_passes,
            majority_threshold: config.majority_threshold,
            connectivity_threshold: config.connectivity_threshold,
        })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Generate a terrain grid. The result depends only on `seed` and the generator settings.
    pub fn generate(&self, seed: u64) -> TerrainGrid {
        let mut grid = self.classify(seed);
        debug!(seed, water = grid.count(Material::Water), "Classified terrain");

        for pass in 0..self.smoothing_passes {
            let flipped = smooth_pass(&mut grid, self.majority_threshold);
            debug!(seed, pass, flipped, "Smoothing pass");
        }

        let anchored = connectivity_pass(&mut grid, self.connectivity_threshold);
        debug!(seed, anchored, "Connectivity pass");

        grid
    }

    /// Assign each cell a material straight from the noise field.
    pub fn classify(&self, seed: u64) -> TerrainGrid {
        let field = NoiseField::new(seed);
        let mut cells = Vec::with_capacity(self.w * self.h);

        for y in 0..self.h {
            for x in 0..self.w {
                let v = field.sample(x as GridOffset, y as GridOffset);
                cells.push(Material::from_noise(v));
            }
        }

        TerrainGrid {
            cells,
            w: self.w,
            h: self.h,
        }
    }
}

/// One majority pass: every cell with more than `threshold` water neighbors becomes water.
///
/// Cells are updated in place in row major order, so a cell sees the updates already made to the
/// cells before it in the same pass. Returns the number of cells turned to water.
pub fn smooth_pass(grid: &mut TerrainGrid, threshold: u8) -> usize {
    let mut flipped = 0;

    for y in 0..grid.h {
        for x in 0..grid.w {
            let i = y * grid.w + x;

            if grid.cells[i].is_water() {
                continue;
            }

            if grid.count_neighbors(x, y, Material::Water) > threshold {
                grid.cells[i] = Material::Water;
                flipped += 1;
            }
        }
    }

    flipped
}

/// Keep water cells that have more than `threshold` water neighbors as water. Rock and ice are
/// left alone. Returns the number of water cells anchored this way.
pub fn connectivity_pass(grid: &mut TerrainGrid, threshold: u8) -> usize {
    let mut anchored = 0;

    for y in 0..grid.h {
        for x in 0..grid.w {
            let i = y * grid.w + x;

            if !grid.cells[i].is_water() {
                continue;
            }

            if grid.count_neighbors(x, y, Material::Water) > threshold {
                grid.cells[i] = Material::Water;
                anchored += 1;
            }
        }
    }

    anchored
}

#[cfg(test)]
mod test {
    use super::*;

    fn generator(w: usize, h: usize) -> TerrainGenerator {
        TerrainGenerator::new(&Config::default().with_size(w, h)).unwrap()
    }

    #[test]
    fn thresholds() {
        assert_eq!(Material::from_noise(0.0), Material::Water);
        assert_eq!(Material::from_noise(ICE_THRESHOLD), Material::Ice);
        assert_eq!(Material::from_noise(0.55), Material::Ice);
        assert_eq!(Material::from_noise(ROCK_THRESHOLD), Material::Rock);
        assert_eq!(Material::from_noise(1.0), Material::Rock);
    }

    #[test]
    fn bounded_neighbors() {
        let grid = TerrainGrid::filled(4, 4, Material::Water).unwrap();

        assert_eq!(grid.count_neighbors(0, 0, Material::Water), 3);
        assert_eq!(grid.count_neighbors(1, 0, Material::Water), 5);
        assert_eq!(grid.count_neighbors(1, 1, Material::Water), 8);
        assert_eq!(grid.count_neighbors(3, 3, Material::Water), 3);
    }

    #[test]
    fn out_of_bounds_access() {
        let mut grid = TerrainGrid::filled(2, 2, Material::Rock).unwrap();

        assert_eq!(grid.get(2, 0), None);
        grid.set(5, 5, Material::Water);
        assert_eq!(grid.count(Material::Water), 0);
    }

    #[test]
    fn rock_in_a_lake_is_flooded() {
        let mut grid = TerrainGrid::filled(3, 3, Material::Water).unwrap();
        grid.set(1, 1, Material::Rock);

        assert_eq!(smooth_pass(&mut grid, 5), 1);
        assert_eq!(grid.get(1, 1), Some(Material::Water));
    }

    #[test]
    fn corner_rock_survives_smoothing() {
        // Corner cells have only 3 neighbors, never more than the threshold
        let mut grid = TerrainGrid::filled(3, 3, Material::Water).unwrap();
        grid.set(0, 0, Material::Ice);

        assert_eq!(smooth_pass(&mut grid, 5), 0);
        assert_eq!(grid.get(0, 0), Some(Material::Ice));
    }

    #[test]
    fn smoothing_sees_earlier_updates() {
        // Row major order: (1, 1) floods first, which gives (2, 1) its sixth water neighbor.
        let mut grid = TerrainGrid::filled(4, 3, Material::Water).unwrap();
        for (x, y) in [(1, 1), (2, 1), (3, 0), (3, 2)] {
            grid.set(x, y, Material::Rock);
        }

        assert_eq!(grid.count_neighbors(2, 1, Material::Water), 5);
        assert_eq!(smooth_pass(&mut grid, 5), 2);
        assert_eq!(grid.get(2, 1), Some(Material::Water));
        assert_eq!(grid.count(Material::Rock), 2);
    }

    #[test]
    fn connectivity_pass_leaves_grid_unchanged() {
        let grid = generator(24, 24).classify(11);
        let mut after = grid.clone();

        let anchored = connectivity_pass(&mut after, 4);
        assert_eq!(after, grid);
        assert!(anchored <= grid.count(Material::Water));

        let mut lake = TerrainGrid::filled(3, 3, Material::Water).unwrap();
        // Center and edge cells have more than 4 water neighbors, corners only 3
        assert_eq!(connectivity_pass(&mut lake, 4), 5);
    }

    #[test]
    fn generate_matches_its_phases() {
        let generator = generator(20, 16);
        let mut grid = generator.classify(5);

        for _ in 0..5 {
            smooth_pass(&mut grid, 5);
        }

        assert_eq!(generator.generate(5), grid);
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 16);
    }

    #[test]
    fn zero_passes_is_classification() {
        let config = Config::default().with_size(12, 12).with_smoothing_passes(0);
        let generator = TerrainGenerator::new(&config).unwrap();

        assert_eq!(generator.generate(9), generator.classify(9));
    }
}
