use crate::caster::{CastResult, StrikeAxis};

/// Empirical wall-height constant tuned for an 800px tall view at 60 degrees.
pub const DEFAULT_HEIGHT_SCALE: f32 = 5.0 * 277.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Lit,
    Dark,
}

impl From<StrikeAxis> for Shade {
    fn from(axis: StrikeAxis) -> Self {
        match axis {
            StrikeAxis::HorizontalLine => Shade::Lit,
            StrikeAxis::VerticalLine => Shade::Dark,
        }
    }
}

/// One screen column of the first-person view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub column: u32,
    pub height: f32,
    pub shade: Shade,
}

/// Remove fisheye distortion: radial distance -> distance along the view axis.
#[inline]
pub fn corrected_distance(raw: f32, ray_angle: f32, view_angle: f32) -> f32 {
    raw * (ray_angle - view_angle).cos()
}

#[derive(Debug, Clone, Copy)]
pub struct Projector {
    cell_size: f32,
    height_scale: f32,
}

impl Projector {
    pub fn new(cell_size: f32, height_scale: f32) -> Self {
        Self {
            cell_size,
            height_scale,
        }
    }

    /// Screen height of a wall at `corrected` distance. Zero or negative
    /// distances (viewpoint on or past the wall face) map to infinity and are
    /// left for the renderer to clip.
    #[inline]
    pub fn slice_height(&self, corrected: f32) -> f32 {
        if corrected > 0.0 {
            self.cell_size * self.height_scale / corrected
        } else {
            f32::INFINITY
        }
    }

    pub fn project(&self, column: u32, hit: &CastResult, view_angle: f32) -> Slice {
        let distance = corrected_distance(hit.distance, hit.angle, view_angle);
        Slice {
            column,
            height: self.slice_height(distance),
            shade: hit.axis.into(),
        }
    }
}
