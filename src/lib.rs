//! First-person raycaster over a square occupancy grid.
//!
//! [`RayCaster`] walks a ray across grid lines to the nearest wall,
//! [`Projector`] turns the hit distance into a screen column, and [`Frame`]
//! runs both for every column of the view.

pub mod caster;
pub mod config;
pub mod error;
pub mod frame;
pub mod grid;
pub mod input;
pub mod projector;
pub mod renderer;
pub mod scaler;
pub mod viewpoint;

pub use caster::{CastResult, RayCaster, StrikeAxis};
pub use config::Config;
pub use error::ConfigError;
pub use frame::Frame;
pub use grid::{Cell, Grid};
pub use projector::{Projector, Shade, Slice, corrected_distance};
pub use viewpoint::Viewpoint;
