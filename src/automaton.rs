use tracing::trace;

use crate::GridOffset;
use crate::bit_grid::BitGrid;
use crate::config::ConfigError;
use crate::rule_set::RuleSet;

/// Steps a [`BitGrid`] one generation at a time under a [`RuleSet`].
///
/// Every cell of the next generation is computed from the neighbor counts of the previous one:
/// the source grid is only read, and results go to a separate buffer.
pub struct Automaton {
    rules: RuleSet,

    /// Destination of [`Automaton::advance`], swapped with the caller's grid afterwards
    scratch: BitGrid,

    generation: u64,
}

impl Automaton {
    pub fn new(rules: RuleSet, w: usize, h: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            rules,
            scratch: BitGrid::new(w, h)?,
            generation: 0,
        })
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Number of generations computed through [`Automaton::advance`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start counting generations from zero again.
    pub fn reset(&mut self) {
        self.generation = 0;
    }

    /// Compute the generation after `src`.
    pub fn step(&self, src: &BitGrid) -> BitGrid {
        let mut dst = src.clone();
        step_into(self.rules, src, &mut dst);
        dst
    }

    /// Advance `grid` by one generation in place.
    pub fn advance(&mut self, grid: &mut BitGrid) {
        if self.scratch.width() != grid.width() || self.scratch.height() != grid.height() {
            self.scratch = grid.clone();
        }

        step_into(self.rules, grid, &mut self.scratch);
        std::mem::swap(grid, &mut self.scratch);

        self.generation += 1;
        trace!(
            generation = self.generation,
            population = grid.population(),
            "Advanced automaton"
        );
    }
}

/// Write the generation after `src` into `dst`. Both grids must have the same dimensions.
pub fn step_into(rules: RuleSet, src: &BitGrid, dst: &mut BitGrid) {
    debug_assert_eq!(src.width(), dst.width());
    debug_assert_eq!(src.height(), dst.height());

    for y in 0..src.height() as GridOffset {
        for x in 0..src.width() as GridOffset {
            let alive = src.get(x, y);
            let neighbors = src.count_live_neighbors(x, y);

            dst.set(x, y, rules.next_state(alive, neighbors));
        }
    }
}
