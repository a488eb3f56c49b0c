//! JSON export of a generated city layout

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::archetype::BuildingArchetype;
use crate::generator::{CityPlan, GenerationSummary, GeneratorSettings};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutMetadata {
    pub name: String,
    pub seed: u64,
    pub generated_at: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub summary: GenerationSummary,
}

#[derive(Serialize)]
struct LayoutDocument<'a> {
    metadata: LayoutMetadata,
    archetypes: &'a [BuildingArchetype],
    plan: &'a CityPlan,
}

#[derive(Deserialize)]
struct MetadataOnly {
    metadata: LayoutMetadata,
}

pub struct LayoutWriter<'a> {
    settings: &'a GeneratorSettings,
    archetypes: &'a [BuildingArchetype],
}

impl<'a> LayoutWriter<'a> {
    pub fn new(settings: &'a GeneratorSettings, archetypes: &'a [BuildingArchetype]) -> Self {
        Self {
            settings,
            archetypes,
        }
    }

    pub fn to_json(&self, plan: &CityPlan) -> Result<String, LayoutError> {
        let document = LayoutDocument {
            metadata: LayoutMetadata {
                name: self.settings.name.clone(),
                seed: self.settings.seed,
                generated_at: chrono::Local::now().to_rfc3339(),
                canvas_width: self.settings.canvas_width,
                canvas_height: self.settings.canvas_height,
                summary: plan.summary(),
            },
            archetypes: self.archetypes,
            plan,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Write the layout, creating parent directories as needed
    pub fn write(&self, plan: &CityPlan, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json(plan)?)?;
        log::info!("wrote layout to {}", path.display());
        Ok(())
    }
}

pub fn read_metadata(path: impl AsRef<Path>) -> Result<LayoutMetadata, LayoutError> {
    let text = fs::read_to_string(path)?;
    let document: MetadataOnly = serde_json::from_str(&text)?;
    Ok(document.metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorBuilder;

    #[test]
    fn test_layout_written_and_metadata_read_back() {
        let settings = GeneratorSettings::default();
        let mut generator = GeneratorBuilder::new(settings.clone()).build();
        let plan = generator.plan();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("city.json");

        let writer = LayoutWriter::new(&settings, generator.registry().as_slice());
        writer.write(&plan, &path).unwrap();

        let metadata = read_metadata(&path).unwrap();
        assert_eq!(metadata.name, "ikn_city");
        assert_eq!(metadata.seed, settings.seed);
        assert_eq!(metadata.summary, plan.summary());

        let data = fs::read_to_string(&path).unwrap();
        assert!(data.contains("\"buildings\""));
        assert!(data.contains("\"big-building\""));
    }
}
