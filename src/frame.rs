use rayon::prelude::*;

use crate::caster::RayCaster;
use crate::config::Config;
use crate::grid::Grid;
use crate::projector::{Projector, Slice};
use crate::viewpoint::Viewpoint;

/// Everything the drawing side needs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub slices: Vec<Slice>,   // one per screen column, in column order
    pub rays: Vec<[f32; 2]>,  // uncorrected hit points for the overhead map
}

impl Frame {
    /// Cast every column in parallel. Columns only read the grid and the
    /// viewpoint, so the result matches a sequential pass exactly.
    pub fn compute(grid: &Grid, viewpoint: &Viewpoint, config: &Config) -> Self {
        let width = config.screen_width;
        let fov = config.fov();
        let caster = RayCaster::new(grid, config.cell_size);
        let projector = Projector::new(config.cell_size, config.height_scale);
        let origin = viewpoint.origin();

        let (slices, rays) = (0..width)
            .into_par_iter()
            .map(|column| {
                let angle = viewpoint.column_angle(column, width, fov);
                let hit = caster.cast(origin, angle);
                let slice = projector.project(column, &hit, viewpoint.angle);
                let end = [
                    origin[0] + hit.distance * angle.cos(),
                    origin[1] + hit.distance * angle.sin(),
                ];
                (slice, end)
            })
            .unzip();

        Self { slices, rays }
    }

    /// Single-threaded reference pass.
    pub fn compute_sequential(grid: &Grid, viewpoint: &Viewpoint, config: &Config) -> Self {
        let width = config.screen_width;
        let fov = config.fov();
        let caster = RayCaster::new(grid, config.cell_size);
        let projector = Projector::new(config.cell_size, config.height_scale);

        let mut frame = Self {
            slices: Vec::with_capacity(width as usize),
            rays: Vec::with_capacity(width as usize),
        };
        for column in 0..width {
            let angle = viewpoint.column_angle(column, width, fov);
            let hit = caster.cast(viewpoint.origin(), angle);
            frame.slices.push(projector.project(column, &hit, viewpoint.angle));
            frame.rays.push(caster.endpoint(viewpoint.origin(), angle));
        }
        frame
    }
}
