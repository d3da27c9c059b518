use cellscape::automaton::Automaton;
use cellscape::bit_grid::BitGrid;
use cellscape::rule_set::B3S23;
use cellscape::rule_set::RuleSet;
use proptest::prelude::*;

fn grid_with(w: usize, h: usize, cells: &[(i64, i64)]) -> anyhow::Result<BitGrid> {
    let mut grid = BitGrid::new(w, h)?;
    for &(x, y) in cells {
        grid.set(x, y, true);
    }
    Ok(grid)
}

#[test]
fn lone_center_cell_dies() -> anyhow::Result<()> {
    let grid = grid_with(3, 3, &[(1, 1)])?;
    let automaton = Automaton::new(B3S23, 3, 3)?;

    let next = automaton.step(&grid);

    assert_eq!(next.population(), 0);
    Ok(())
}

#[test]
fn block_is_still() -> anyhow::Result<()> {
    let block = [(1, 1), (2, 1), (1, 2), (2, 2)];
    let grid = grid_with(4, 4, &block)?;
    let automaton = Automaton::new(B3S23, 4, 4)?;

    assert_eq!(automaton.step(&grid), grid);

    let grid = grid_with(6, 6, &block)?;
    let automaton = Automaton::new(B3S23, 6, 6)?;

    assert_eq!(automaton.step(&grid), grid);
    Ok(())
}

#[test]
fn glider_crosses_the_seam() -> anyhow::Result<()> {
    let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
    let mut grid = grid_with(8, 8, &glider)?;
    let mut automaton = Automaton::new(B3S23, 8, 8)?;

    // Every 4 generations the glider moves one cell down and right. After 32 it has gone all
    // the way around the torus.
    for n in 1..=32 {
        automaton.advance(&mut grid);

        if n % 4 == 0 {
            let shift = n / 4;
            let moved: Vec<_> = glider.iter().map(|&(x, y)| (x + shift, y + shift)).collect();

            assert_eq!(grid, grid_with(8, 8, &moved)?, "generation {n}");
        }
    }

    assert_eq!(automaton.generation(), 32);
    assert_eq!(grid, grid_with(8, 8, &glider)?);
    Ok(())
}

#[test]
fn other_rules() -> anyhow::Result<()> {
    // Seeds: every live cell dies, cells with exactly two neighbors are born
    let seeds: RuleSet = "B2/S".parse()?;
    let grid = grid_with(6, 6, &[(2, 2), (3, 2)])?;
    let automaton = Automaton::new(seeds, 6, 6)?;

    let next = automaton.step(&grid);

    assert_eq!(next, grid_with(6, 6, &[(2, 1), (3, 1), (2, 3), (3, 3)])?);
    Ok(())
}

#[test]
fn tiny_torus_counts_aliased_neighbors() -> anyhow::Result<()> {
    // A lone 1x1 cell is its own neighbor 8 times over
    let one = grid_with(1, 1, &[(0, 0)])?;
    assert_eq!(one.count_live_neighbors(0, 0), 8);
    assert_eq!(Automaton::new(B3S23, 1, 1)?.step(&one).population(), 0);

    let survives_on_eight: RuleSet = "B3/S8".parse()?;
    assert_eq!(Automaton::new(survives_on_eight, 1, 1)?.step(&one), one);

    // On 2x2 the live cell is seen 2 times from its row and column, 4 times diagonally
    let two = grid_with(2, 2, &[(0, 0)])?;
    assert_eq!(two.count_live_neighbors(1, 0), 2);
    assert_eq!(two.count_live_neighbors(0, 1), 2);
    assert_eq!(two.count_live_neighbors(1, 1), 4);

    let births_on_two: RuleSet = "B2/S".parse()?;
    let next = Automaton::new(births_on_two, 2, 2)?.step(&two);
    assert_eq!(next, grid_with(2, 2, &[(1, 0), (0, 1)])?);

    Ok(())
}

proptest! {
    #[test]
    fn step_leaves_source_untouched(seed in any::<u64>(), w in 1usize..24, h in 1usize..24) {
        let mut grid = BitGrid::new(w, h).unwrap();
        grid.randomize(seed);
        let before = grid.clone();

        let automaton = Automaton::new(B3S23, w, h).unwrap();
        let next = automaton.step(&grid);

        prop_assert_eq!(&grid, &before);
        prop_assert_eq!(next.width(), w);
        prop_assert_eq!(next.height(), h);
    }

    #[test]
    fn step_matches_rule_per_cell(seed in any::<u64>()) {
        let mut grid = BitGrid::new(12, 9).unwrap();
        grid.randomize(seed);

        let next = Automaton::new(B3S23, 12, 9).unwrap().step(&grid);

        for y in 0..9 {
            for x in 0..12 {
                let n = grid.count_live_neighbors(x, y);
                let expected = matches!((grid.get(x, y), n), (true, 2 | 3) | (false, 3));
                prop_assert_eq!(next.get(x, y), expected, "cell ({}, {})", x, y);
            }
        }
    }
}
