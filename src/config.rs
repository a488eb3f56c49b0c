//! City configuration loaded from YAML

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::archetype::{ArchetypeRegistry, BuildingArchetype};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub roads: RoadConfig,
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default = "default_archetypes")]
    pub archetypes: Vec<BuildingArchetype>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadConfig {
    pub width: f64,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self { width: 24.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub min_size: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { min_size: 70.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    #[serde(default = "default_lane_width")]
    pub lane_width: f64,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_true")]
    pub draw_lane_dividers: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            lane_width: default_lane_width(),
            background: default_background(),
            draw_lane_dividers: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_lane_width() -> f64 {
    80.0
}

fn default_background() -> String {
    "background-image".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_archetypes() -> Vec<BuildingArchetype> {
    ArchetypeRegistry::ikn_city().as_slice().to_vec()
}

impl CityConfig {
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CityConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// The 1200x1200 city with the stock building set
    pub fn ikn_city() -> Self {
        Self {
            name: "ikn_city".to_string(),
            seed: default_seed(),
            canvas: CanvasConfig::default(),
            roads: RoadConfig::default(),
            partition: PartitionConfig::default(),
            fill: FillConfig::default(),
            assets: AssetConfig::default(),
            archetypes: default_archetypes(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn registry(&self) -> ArchetypeRegistry {
        ArchetypeRegistry::new(self.archetypes.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(invalid("city must have a name"));
        }
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(invalid(format!(
                "canvas must have a positive size, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !(self.roads.width >= 0.0) {
            return Err(invalid("road width cannot be negative"));
        }
        if !(self.partition.min_size > 0.0) {
            return Err(invalid("partition min_size must be greater than zero"));
        }
        if !(self.fill.lane_width > 0.0) {
            return Err(invalid("lane_width must be greater than zero"));
        }
        if self.archetypes.is_empty() {
            return Err(invalid("at least one building archetype is required"));
        }

        let mut names = HashSet::new();
        for archetype in &self.archetypes {
            if !names.insert(archetype.name.as_str()) {
                return Err(invalid(format!(
                    "archetype '{}' defined more than once",
                    archetype.name
                )));
            }
            if !(archetype.width > 0.0 && archetype.height > 0.0) {
                return Err(invalid(format!(
                    "archetype '{}' must have a positive size",
                    archetype.name
                )));
            }
            if archetype.sprites.is_empty() {
                return Err(invalid(format!(
                    "archetype '{}' needs at least one sprite",
                    archetype.name
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}
