use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::projector::DEFAULT_HEIGHT_SCALE;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "GRIDCASTER_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cell_size: f32,
    pub fov_degrees: f32,
    pub screen_width: u32, // one ray per column
    pub screen_height: u32,
    pub grid_size: usize,
    pub wall_probability: f64,
    pub height_scale: f32,
    pub map_scale: f32,
    pub move_speed: f32,
    pub turn_speed_degrees: f32,
    pub mouse_sensitivity: f32,
    pub seed: Option<u64>,
    pub start: Option<[f32; 3]>, // x, y, angle
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: 32.0,
            fov_degrees: 60.0,
            screen_width: 1200,
            screen_height: 800,
            grid_size: 8,
            wall_probability: 0.3,
            height_scale: DEFAULT_HEIGHT_SCALE,
            map_scale: 1.0,
            move_speed: 2.0,
            turn_speed_degrees: 5.0,
            mouse_sensitivity: 0.009,
            seed: None,
            start: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.screen_width == 0 {
            return Err(ConfigError::ZeroScreen("width"));
        }
        if self.screen_height == 0 {
            return Err(ConfigError::ZeroScreen("height"));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(ConfigError::WallProbability(self.wall_probability));
        }
        if !(self.height_scale.is_finite() && self.height_scale > 0.0) {
            return Err(ConfigError::HeightScale(self.height_scale));
        }
        if !(self.map_scale.is_finite() && self.map_scale > 0.0) {
            return Err(ConfigError::MapScale(self.map_scale));
        }
        Ok(())
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Side length of the whole grid in world units.
    #[inline]
    pub fn world_extent(&self) -> f32 {
        self.grid_size as f32 * self.cell_size
    }

    /// Configured start pose, or the grid center facing +x.
    pub fn start_pose(&self) -> [f32; 3] {
        self.start.unwrap_or_else(|| {
            let mid = 0.5 * self.world_extent();
            [mid, mid, 0.0]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.start_pose(), [128.0, 128.0, 0.0]);
        assert!((config.fov() - std::f32::consts::FRAC_PI_3).abs() < 1e-6);
    }

    fn rejects(config: Config, expected: fn(&ConfigError) -> bool) {
        let err = config.validate().unwrap_err();
        assert!(expected(&err), "unexpected error {err}");
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let base = Config::default;
        rejects(Config { grid_size: 0, ..base() }, |e| matches!(e, ConfigError::EmptyGrid));
        rejects(Config { screen_width: 0, ..base() }, |e| {
            matches!(e, ConfigError::ZeroScreen("width"))
        });
        rejects(Config { screen_height: 0, ..base() }, |e| {
            matches!(e, ConfigError::ZeroScreen("height"))
        });
        rejects(Config { cell_size: 0.0, ..base() }, |e| matches!(e, ConfigError::CellSize(_)));
        rejects(Config { cell_size: f32::NAN, ..base() }, |e| {
            matches!(e, ConfigError::CellSize(_))
        });
        rejects(Config { fov_degrees: 180.0, ..base() }, |e| {
            matches!(e, ConfigError::FieldOfView(_))
        });
        rejects(Config { wall_probability: 1.5, ..base() }, |e| {
            matches!(e, ConfigError::WallProbability(_))
        });
        rejects(Config { height_scale: -1.0, ..base() }, |e| {
            matches!(e, ConfigError::HeightScale(_))
        });
        rejects(Config { map_scale: 0.0, ..base() }, |e| matches!(e, ConfigError::MapScale(_)));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "grid_size": 16, "seed": 42 }"#).unwrap();
        assert_eq!(config.grid_size, 16);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.cell_size, 32.0);
    }

    #[test]
    fn unknown_json_fields_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "tile_size": 32 }"#).is_err());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = std::env::temp_dir().join(format!("gridcaster-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("missing.json");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { path, .. }) if path == missing));

        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));

        let invalid = dir.join("invalid.json");
        std::fs::write(&invalid, r#"{ "screen_width": 0 }"#).unwrap();
        assert!(matches!(Config::load(&invalid), Err(ConfigError::ZeroScreen("width"))));

        let good = dir.join("good.json");
        std::fs::write(&good, r#"{ "cell_size": 64.0, "start": [96.0, 96.0, 1.0] }"#).unwrap();
        let config = Config::load(&good).unwrap();
        assert_eq!(config.start_pose(), [96.0, 96.0, 1.0]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
