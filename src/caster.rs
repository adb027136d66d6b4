use std::f32::consts::{FRAC_PI_2, PI};

use crate::grid::{Cell, Grid};

// Slopes are kept inside these bounds so a ray parallel to a line family
// produces a huge but finite step instead of inf/NaN arithmetic.
const MIN_SLOPE: f32 = 1e-6;
const MAX_SLOPE: f32 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeAxis {
    /// Hit found while stepping across constant-y grid lines.
    HorizontalLine,
    /// Hit found while stepping across constant-x grid lines.
    VerticalLine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastResult {
    pub distance: f32,
    pub angle: f32, // absolute world angle of the ray
    pub axis: StrikeAxis,
}

/// Grid-line stepping caster. Holds no state of its own beyond the borrowed
/// grid, so identical inputs always produce identical results.
#[derive(Clone, Copy)]
pub struct RayCaster<'a> {
    grid: &'a Grid,
    cell_size: f32,
}

impl<'a> RayCaster<'a> {
    pub fn new(grid: &'a Grid, cell_size: f32) -> Self {
        Self { grid, cell_size }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Nearest wall along `angle`, whichever line family reaches it first.
    pub fn cast(&self, origin: [f32; 2], angle: f32) -> CastResult {
        let h = self.cast_horizontal(origin, angle);
        let v = self.cast_vertical(origin, angle);
        if h.distance < v.distance { h } else { v }
    }

    /// Step across horizontal grid lines only.
    pub fn cast_horizontal(&self, origin: [f32; 2], angle: f32) -> CastResult {
        let t = self.cell_size;
        let [ox, oy] = origin;
        let up = faces_up(angle);
        let inv_slope = cot_clamped(angle);

        // line `n` sits at y = n * T; the first one in front of the origin
        let first = if up {
            cell_coord(oy, t)
        } else {
            cell_coord(oy, t).saturating_add(1)
        };
        let dir = if up { -1 } else { 1 };
        // the cell in front of a horizontal line is above it when facing up
        let row_offset = if up { 1 } else { 0 };

        let hit = self.march(first, dir, |line| {
            let y = line as f32 * t;
            let x = ox + (y - oy) * inv_slope;
            ([x, y], (cell_coord(x, t), line.saturating_sub(row_offset)))
        });

        CastResult {
            distance: (hit[0] - ox).hypot(hit[1] - oy),
            angle,
            axis: StrikeAxis::HorizontalLine,
        }
    }

    /// Step across vertical grid lines only.
    pub fn cast_vertical(&self, origin: [f32; 2], angle: f32) -> CastResult {
        let t = self.cell_size;
        let [ox, oy] = origin;
        let right = faces_right(angle);
        let slope = tan_clamped(angle);

        let first = if right {
            cell_coord(ox, t).saturating_add(1)
        } else {
            cell_coord(ox, t)
        };
        let dir = if right { 1 } else { -1 };
        let col_offset = if right { 0 } else { 1 };

        let hit = self.march(first, dir, |line| {
            let x = line as f32 * t;
            let y = oy + (x - ox) * slope;
            ([x, y], (line.saturating_sub(col_offset), cell_coord(y, t)))
        });

        CastResult {
            distance: (hit[0] - ox).hypot(hit[1] - oy),
            angle,
            axis: StrikeAxis::VerticalLine,
        }
    }

    /// World point where the uncorrected ray stops.
    pub fn endpoint(&self, origin: [f32; 2], angle: f32) -> [f32; 2] {
        let hit = self.cast(origin, angle);
        [
            origin[0] + hit.distance * angle.cos(),
            origin[1] + hit.distance * angle.sin(),
        ]
    }

    // Walk grid line indices from `first` in steps of `dir` until the cell in
    // front of the line is solid. `at` maps a line index to its crossing point
    // and that cell. Points come from the integer index, never from summed
    // steps. The boundary is reached within `size + 1` lines; the cap only
    // matters for non-finite input.
    fn march<F>(&self, first: i64, dir: i64, at: F) -> [f32; 2]
    where
        F: Fn(i64) -> ([f32; 2], (i64, i64)),
    {
        let limit = self.grid.size() as i64 + 1;
        let mut line = first;
        let mut steps = 0;
        loop {
            let (point, (col, row)) = at(line);
            if steps >= limit || self.grid.get(col, row) != Cell::Empty {
                return point;
            }
            line = line.saturating_add(dir);
            steps += 1;
        }
    }
}

/// Whether the ray travels toward decreasing y.
#[inline]
fn faces_up(angle: f32) -> bool {
    (angle / PI).floor().rem_euclid(2.0) != 0.0
}

/// Whether the ray travels toward increasing x.
#[inline]
fn faces_right(angle: f32) -> bool {
    ((angle - FRAC_PI_2) / PI).floor().rem_euclid(2.0) != 0.0
}

#[inline]
fn cell_coord(v: f32, cell_size: f32) -> i64 {
    // saturating cast: +-inf land far outside any grid, NaN lands on 0
    (v / cell_size).floor() as i64
}

#[inline]
fn tan_clamped(angle: f32) -> f32 {
    let t = angle.tan();
    if t.is_nan() {
        return MAX_SLOPE;
    }
    t.clamp(-MAX_SLOPE, MAX_SLOPE)
}

#[inline]
fn cot_clamped(angle: f32) -> f32 {
    let t = angle.tan();
    if t.is_nan() {
        return MAX_SLOPE;
    }
    if t.abs() < MIN_SLOPE {
        return MIN_SLOPE.copysign(t).recip();
    }
    t.recip()
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: f32 = 32.0;

    fn only_open(size: usize, col: i64, row: i64) -> Grid {
        let mut grid = Grid::new(size).unwrap();
        grid.fill(Cell::Wall);
        grid.set(col, row, Cell::Empty);
        grid
    }

    #[test]
    fn direction_folding() {
        assert!(!faces_up(0.1));
        assert!(!faces_up(PI - 0.1));
        assert!(faces_up(PI + 0.1));
        assert!(faces_up(-0.1));
        assert!(!faces_up(-PI - 0.1));
        assert!(faces_right(0.0));
        assert!(faces_right(-0.3));
        assert!(!faces_right(PI));
        assert!(!faces_right(FRAC_PI_2 + 0.1));
        assert!(faces_right(2.0 * PI + 0.1));
    }

    #[test]
    fn single_open_cell_axis_aligned() {
        let grid = only_open(3, 1, 1);
        let caster = RayCaster::new(&grid, T);
        let center = [1.5 * T, 1.5 * T];
        for angle in [0.0, FRAC_PI_2, PI, -FRAC_PI_2, 1.5 * PI] {
            let hit = caster.cast(center, angle);
            assert!(
                (hit.distance - T / 2.0).abs() < 1e-3,
                "angle {angle}: {}",
                hit.distance
            );
            assert_eq!(hit.angle, angle);
        }
        assert_eq!(caster.cast(center, 0.0).distance, T / 2.0);
        assert_eq!(caster.cast(center, 0.0).axis, StrikeAxis::VerticalLine);
        assert_eq!(caster.cast(center, FRAC_PI_2).axis, StrikeAxis::HorizontalLine);
    }

    #[test]
    fn diagonal_hits_the_nearer_family() {
        let grid = only_open(3, 1, 1);
        let caster = RayCaster::new(&grid, T);
        // From (40, 48) at 45 degrees down-right: x line at 64 is 24 away,
        // y line at 64 is 16 away, so the horizontal family wins.
        let hit = caster.cast([40.0, 48.0], PI / 4.0);
        assert_eq!(hit.axis, StrikeAxis::HorizontalLine);
        assert!((hit.distance - 16.0 * 2f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn singular_angles_stay_finite() {
        let grid = Grid::new(4).unwrap();
        let caster = RayCaster::new(&grid, T);
        let origin = [2.0 * T, 2.0 * T]; // exactly on grid lines
        for angle in [0.0, PI, -PI, FRAC_PI_2, -FRAC_PI_2, 3.0 * FRAC_PI_2, 2.0 * PI] {
            let h = caster.cast_horizontal(origin, angle);
            let v = caster.cast_vertical(origin, angle);
            assert!(!h.distance.is_nan() && !v.distance.is_nan(), "angle {angle}");
            assert!(caster.cast(origin, angle).distance.is_finite(), "angle {angle}");
        }
    }

    #[test]
    fn non_finite_origin_terminates() {
        let grid = Grid::new(4).unwrap();
        let caster = RayCaster::new(&grid, T);
        let _ = caster.cast([f32::NAN, f32::NAN], 0.3);
        let _ = caster.cast([f32::INFINITY, 10.0], f32::NAN);
    }

    #[test]
    fn fractional_cell_sizes_stop_at_the_first_wall() {
        for t in [30.7_f32, 3.3, 0.7, 0.1] {
            let grid = Grid::new(8).unwrap();
            let caster = RayCaster::new(&grid, t);
            let origin = [0.5 * t, 0.5 * t];
            for angle in [0.0, FRAC_PI_2] {
                let got = caster.cast(origin, angle).distance;
                let want = 7.5 * t;
                assert!((got - want).abs() < 1e-3 * t, "T {t} @ {angle}: {got} vs {want}");
            }
        }
    }

    #[test]
    fn endpoint_lies_on_the_ray() {
        let grid = Grid::new(3).unwrap();
        let caster = RayCaster::new(&grid, T);
        let [x, y] = caster.endpoint([48.0, 48.0], 0.0);
        assert!((x - 96.0).abs() < 1e-3);
        assert!((y - 48.0).abs() < 1e-3);
    }
}
