use rand::Rng;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
}

/// Square occupancy grid. Everything outside `[0, size)` reads as a wall, so
/// the grid behaves as if it were surrounded by solid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>, // row-major, `size * size`
}

impl Grid {
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Build a grid from explicit rows, `rows[row][col]`.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, cols) in rows.iter().enumerate() {
            if cols.len() != size {
                return Err(ConfigError::RaggedGrid {
                    row,
                    len: cols.len(),
                    expected: size,
                });
            }
            cells.extend_from_slice(cols);
        }
        Ok(Self { size, cells })
    }

    /// Parse a square ASCII map: `#` is a wall, anything else is open.
    pub fn from_ascii(map: &str) -> Result<Self, ConfigError> {
        let rows: Vec<Vec<Cell>> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|ch| if ch == '#' { Cell::Wall } else { Cell::Empty })
                    .collect()
            })
            .collect();
        Self::from_rows(&rows)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, col: i64, row: i64) -> Option<usize> {
        let size = self.size as i64;
        if col < 0 || row < 0 || col >= size || row >= size {
            return None;
        }
        Some(row as usize * self.size + col as usize)
    }

    #[inline]
    pub fn get(&self, col: i64, row: i64) -> Cell {
        match self.index(col, row) {
            Some(i) => self.cells[i],
            None => Cell::Wall,
        }
    }

    #[inline]
    pub fn is_wall(&self, col: i64, row: i64) -> bool {
        self.get(col, row) == Cell::Wall
    }

    /// Returns false when `(col, row)` is outside the grid and nothing was written.
    pub fn set(&mut self, col: i64, row: i64, cell: Cell) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Each cell independently becomes a wall with `probability`.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R, probability: f64) {
        let p = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        for cell in &mut self.cells {
            *cell = if rng.gen_bool(p) { Cell::Wall } else { Cell::Empty };
        }
    }

    pub fn randomize(&mut self, probability: f64) {
        self.randomize_with(&mut rand::thread_rng(), probability);
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Wall).count()
    }

    /// In-bounds wall cells as `(col, row)`, row-major.
    pub fn walls(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Wall)
            .map(|(i, _)| (i % self.size, i / self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(Grid::new(0), Err(ConfigError::EmptyGrid)));
        assert!(matches!(Grid::from_rows(&[]), Err(ConfigError::EmptyGrid)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![Cell::Empty; 2], vec![Cell::Empty; 3]];
        assert!(matches!(
            Grid::from_rows(&rows),
            Err(ConfigError::RaggedGrid { row: 1, len: 3, expected: 2 })
        ));
    }

    #[test]
    fn outside_reads_as_wall_for_every_size() {
        for size in 1..=9usize {
            let grid = Grid::new(size).unwrap();
            let s = size as i64;
            for k in -2..s + 2 {
                for out in [-1, -5, s, s + 3] {
                    assert_eq!(grid.get(out, k), Cell::Wall, "size {size} col {out} row {k}");
                    assert_eq!(grid.get(k, out), Cell::Wall, "size {size} col {k} row {out}");
                }
            }
            for c in 0..s {
                for r in 0..s {
                    assert_eq!(grid.get(c, r), Cell::Empty);
                }
            }
        }
    }

    #[test]
    fn set_ignores_out_of_range() {
        let mut grid = Grid::new(3).unwrap();
        assert!(grid.set(2, 1, Cell::Wall));
        assert!(!grid.set(3, 1, Cell::Wall));
        assert!(!grid.set(-1, 0, Cell::Wall));
        assert_eq!(grid.wall_count(), 1);
        assert!(grid.is_wall(2, 1));
        assert_eq!(grid.walls().collect::<Vec<_>>(), vec![(2, 1)]);
    }

    #[test]
    fn ascii_maps_index_by_col_then_row() {
        let grid = Grid::from_ascii(
            "
            ..#
            ...
            #..
            ",
        )
        .unwrap();
        assert_eq!(grid.size(), 3);
        assert!(grid.is_wall(2, 0));
        assert!(grid.is_wall(0, 2));
        assert!(!grid.is_wall(0, 0));
    }

    #[test]
    fn seeded_randomize_is_reproducible() {
        let mut a = Grid::new(16).unwrap();
        let mut b = Grid::new(16).unwrap();
        a.randomize_with(&mut StdRng::seed_from_u64(7), 0.3);
        b.randomize_with(&mut StdRng::seed_from_u64(7), 0.3);
        assert_eq!(a, b);
        // 256 cells at 0.3 should land well inside this band.
        let walls = a.wall_count();
        assert!((30..130).contains(&walls), "{walls} walls");
    }

    #[test]
    fn randomize_probability_extremes() {
        let mut grid = Grid::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        grid.randomize_with(&mut rng, 1.0);
        assert_eq!(grid.wall_count(), 25);
        grid.randomize_with(&mut rng, 0.0);
        assert_eq!(grid.wall_count(), 0);
        grid.randomize(1.0);
        assert_eq!(grid.wall_count(), 25);
    }
}
