/// Property-based tests for grid invariants
///
/// Uses proptest to verify invariants that must hold for every sequence of
/// open operations, whatever the order or repetition.
use proptest::prelude::*;

use percolate::Percolation;
use std::collections::HashSet;

/// Property: the open count equals the number of distinct opened sites, never
/// decreases, and never exceeds n^2
#[test]
fn prop_open_count_tracks_distinct_sites() {
    proptest!(|(
        n in 1usize..9,
        ops in prop::collection::vec((0usize..16, 0usize..16), 0..64)
    )| {
        let mut grid = Percolation::new(n).unwrap();
        let mut seen = HashSet::new();
        let mut last = 0;

        for (row, col) in ops {
            let (row, col) = (row % n, col % n);
            grid.open(row, col).unwrap();
            seen.insert((row, col));

            let count = grid.open_sites();
            prop_assert!(count >= last, "count decreased: {} -> {}", last, count);
            prop_assert_eq!(count, seen.len());
            prop_assert!(count <= n * n);
            last = count;
        }
    });
}

/// Property: a full site is always open
#[test]
fn prop_full_implies_open() {
    proptest!(|(
        n in 1usize..8,
        ops in prop::collection::vec((0usize..16, 0usize..16), 0..48)
    )| {
        let mut grid = Percolation::new(n).unwrap();
        for (row, col) in ops {
            grid.open(row % n, col % n).unwrap();
        }

        for row in 0..n {
            for col in 0..n {
                if grid.is_full(row, col).unwrap() {
                    prop_assert!(grid.is_open(row, col).unwrap(),
                        "({}, {}) full but blocked", row, col);
                }
            }
        }
    });
}

/// Property: once the grid percolates, further opens never unpercolate it
#[test]
fn prop_percolation_is_monotonic() {
    proptest!(|(
        n in 1usize..8,
        ops in prop::collection::vec((0usize..16, 0usize..16), 1..64)
    )| {
        let mut grid = Percolation::new(n).unwrap();
        let mut percolated = false;

        for (row, col) in ops {
            grid.open(row % n, col % n).unwrap();
            let now = grid.percolates();
            prop_assert!(!percolated || now, "grid stopped percolating");
            percolated = now;
        }
    });
}

/// Property: rejected coordinates leave the grid untouched
#[test]
fn prop_out_of_bounds_has_no_effect() {
    proptest!(|(
        n in 1usize..8,
        valid in prop::collection::vec((0usize..16, 0usize..16), 0..16),
        row in 0usize..32,
        col in 0usize..32
    )| {
        prop_assume!(row >= n || col >= n);

        let mut grid = Percolation::new(n).unwrap();
        for (r, c) in valid {
            grid.open(r % n, c % n).unwrap();
        }
        let count = grid.open_sites();

        prop_assert!(grid.open(row, col).is_err());
        prop_assert!(grid.is_open(row, col).is_err());
        prop_assert!(grid.is_full(row, col).is_err());
        prop_assert_eq!(grid.open_sites(), count);
    });
}
