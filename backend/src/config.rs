use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub image: ImageConfig,
    pub model: ModelConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl ImageConfig {
    /// Length of the flattened model input row.
    pub fn element_count(&self) -> usize {
        (self.width * self.height * self.channels) as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
    pub classes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub upload_dir: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            format!("{}/../config/inference.yaml", manifest_dir)
        } else {
            "/usr/src/app/config/inference.yaml".to_string()
        };
        let config_str = std::fs::read_to_string(&config_path)?;
        let config: AppConfig =
            serde_yaml::from_str(&config_str).map_err(|e| InferenceError::Config(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_repo_config() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.image.width, 100);
        assert_eq!(config.image.height, 100);
        assert_eq!(config.image.channels, 1);
        assert_eq!(config.image.element_count(), 10_000);
        assert_eq!(config.model.classes, 6);
    }
}
