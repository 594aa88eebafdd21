use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quadrille_scene::Canvas;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything the one-shot render needs, passed explicitly rather than read
/// from ambient globals. Defaults reproduce the reference composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub scene_name: String,
    /// Canvas width in scene units.
    pub frame_width: f64,
    /// Canvas height in scene units.
    pub frame_height: f64,
    pub pixels_per_unit: f64,
    pub background: [f32; 4],
    /// Directory the frame JSON and raster image land in.
    pub output_dir: PathBuf,
    /// Font file, resolved relative to the working directory.
    pub font_path: PathBuf,
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scene_name: "show".to_string(),
            frame_width: 14.0,
            frame_height: 8.0,
            pixels_per_unit: 100.0,
            background: [0.0, 0.0, 0.0, 1.0],
            output_dir: PathBuf::from("media/images"),
            font_path: PathBuf::from("./yahei-consolas-hybrid.ttf"),
            font_family: "YaHei Consolas Hybrid".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.frame_width, self.frame_height)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("loaded render config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_frame() {
        let config = RenderConfig::default();
        assert!((config.frame_width - 14.0).abs() < 1e-10);
        assert!((config.frame_height - 8.0).abs() < 1e-10);
        let canvas = config.canvas();
        assert!((canvas.half_width() - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_config_round_trip() {
        let path = std::env::temp_dir().join("quadrille_config_rt.json");
        let mut config = RenderConfig::default();
        config.pixels_per_unit = 50.0;
        config.scene_name = "panes".to_string();
        config.save(&path).unwrap();
        let back = RenderConfig::load(&path).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let path = std::env::temp_dir().join("quadrille_config_partial.json");
        std::fs::write(&path, r#"{ "pixels_per_unit": 25.0 }"#).unwrap();
        let config = RenderConfig::load(&path).unwrap();
        assert!((config.pixels_per_unit - 25.0).abs() < 1e-10);
        assert_eq!(config.scene_name, "show");
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let err = RenderConfig::load(Path::new("./no-such-config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
