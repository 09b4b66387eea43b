//! Engine configuration

pub use serde::{Deserialize, Serialize};

use crate::spatial::BroadphaseConfig;

/// Configuration trait: TOML or RON on disk, chosen by extension
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Camera window dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Viewport width in world units
    pub width: f32,
    /// Viewport height in world units
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Debug toggles
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log every collision response at debug level
    pub log_collisions: bool,
    /// Draw body bounds through the renderer
    pub draw_bounds: bool,
}

/// Top-level engine configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Camera window
    pub viewport: ViewportConfig,
    /// Broad-phase grid settings
    pub broadphase: BroadphaseConfig,
    /// Debug toggles
    pub debug: DebugConfig,
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.broadphase.cell_shift, 5);
        assert!(!config.debug.log_collisions);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = r#"
            [viewport]
            width = 1280.0
            height = 720.0

            [broadphase]
            cell_shift = 6

            [debug]
            log_collisions = true
            draw_bounds = false
        "#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.viewport.width, 1280.0);
        assert_eq!(config.broadphase.cell_shift, 6);
        assert!(config.debug.log_collisions);
        let back = toml::to_string_pretty(&config).unwrap();
        let again: EngineConfig = toml::from_str(&back).unwrap();
        assert_eq!(again.viewport.height, 720.0);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join("stage2d_engine_test.toml");
        let path = path.to_str().unwrap();
        let mut config = EngineConfig::default();
        config.broadphase.cell_shift = 7;
        config.save_to_file(path).unwrap();
        let loaded = EngineConfig::load_from_file(path).unwrap();
        assert_eq!(loaded.broadphase.cell_shift, 7);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("stage2d_engine_test.yaml");
        std::fs::write(&path, "viewport: {}").unwrap();
        let err = EngineConfig::load_from_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
        let _ = std::fs::remove_file(path);
    }
}
