#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::HashSet;

use gol_hashlife::Point;
use gol_hashlife::WorldOffset;

/// Advance `cells` by `t` generations of Conway's Game of Life on an unbounded plane.
pub fn advance(cells: impl IntoIterator<Item = Point>, t: u64) -> HashSet<Point> {
    let mut cells: HashSet<Point> = cells.into_iter().collect();

    for _ in 0..t {
        let mut counts: HashMap<Point, u32> = HashMap::new();

        for p in &cells {
            for dx in -1..=1 {
                for dy in -1..=1 {
                    if dx != 0 || dy != 0 {
                        *counts.entry(p.offset(dx, dy)).or_default() += 1;
                    }
                }
            }
        }

        cells = counts
            .into_iter()
            .filter(|(p, n)| *n == 3 || (*n == 2 && cells.contains(p)))
            .map(|(p, _)| p)
            .collect();
    }

    cells
}

/// Keep the cells inside the centred square `[-half, half)^2`.
pub fn within(cells: HashSet<Point>, half: WorldOffset) -> HashSet<Point> {
    cells
        .into_iter()
        .filter(|p| (-half..half).contains(&p.x) && (-half..half).contains(&p.y))
        .collect()
}

/// Draw the centred square `[-half, half)^2`, northern row first.
pub fn render(cells: &[Point], half: WorldOffset) -> String {
    let cells: HashSet<Point> = cells.iter().copied().collect();
    let mut s = String::new();

    for y in (-half..half).rev() {
        for x in -half..half {
            s.push(if cells.contains(&Point::new(x, y)) { 'O' } else { '.' });
        }
        s.push('\n');
    }

    s
}

/// Map a row-major `side x side` square of cells, northern row first, to centred coordinates.
pub fn array_points(cells: &[u8], side: usize) -> Vec<Point> {
    let half = (side / 2) as WorldOffset;

    cells
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c != 0)
        .map(|(i, _)| {
            let (row, col) = ((i / side) as WorldOffset, (i % side) as WorldOffset);
            Point::new(col - half, half - 1 - row)
        })
        .collect()
}
