use serde::{Deserialize, Serialize};

use crate::{
    archetype::ArchetypeRegistry,
    config::CityConfig,
    filler::{self, Placement},
    geometry::Block,
    partition::PartitionTree,
    render::Renderer,
    rng::{RngManager, FILL_STREAM, PARTITION_STREAM, SPRITE_STREAM},
};

#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    pub name: String,
    pub seed: u64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub road_width: f64,
    pub min_size: f64,
    pub lane_width: f64,
    pub background: String,
    pub draw_lane_dividers: bool,
}

impl GeneratorSettings {
    pub fn from_config(config: &CityConfig) -> Self {
        Self {
            name: config.name.clone(),
            seed: config.seed,
            canvas_width: config.canvas.width,
            canvas_height: config.canvas.height,
            road_width: config.roads.width,
            min_size: config.partition.min_size,
            lane_width: config.fill.lane_width,
            background: config.fill.background.clone(),
            draw_lane_dividers: config.fill.draw_lane_dividers,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from_config(&CityConfig::ikn_city())
    }
}

pub struct GeneratorBuilder {
    settings: GeneratorSettings,
    registry: ArchetypeRegistry,
}

impl GeneratorBuilder {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            registry: ArchetypeRegistry::ikn_city(),
        }
    }

    pub fn from_config(config: &CityConfig) -> Self {
        Self::new(GeneratorSettings::from_config(config)).with_archetypes(config.registry())
    }

    pub fn with_archetypes(mut self, registry: ArchetypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = seed;
        self
    }

    pub fn build(self) -> Generator {
        Generator {
            rng: RngManager::new(self.settings.seed),
            registry: self.registry,
            settings: self.settings,
        }
    }
}

/// A building ready to draw, with its sprite variant already picked
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedBuilding {
    #[serde(flatten)]
    pub placement: Placement,
    pub sprite: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlannedBlock {
    pub block: Block,
    pub lanes: Vec<f64>,
    pub buildings: Vec<PlacedBuilding>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CityPlan {
    pub root: Block,
    pub depth: u32,
    pub blocks: Vec<PlannedBlock>,
}

impl CityPlan {
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            block_count: self.blocks.len(),
            lane_count: self.blocks.iter().map(|b| b.lanes.len()).sum(),
            building_count: self.blocks.iter().map(|b| b.buildings.len()).sum(),
            depth: self.depth,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub block_count: usize,
    pub lane_count: usize,
    pub building_count: usize,
    pub depth: u32,
}

pub struct Generator {
    rng: RngManager,
    registry: ArchetypeRegistry,
    settings: GeneratorSettings,
}

impl Generator {
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn registry(&self) -> &ArchetypeRegistry {
        &self.registry
    }

    /// Partition the canvas and fill every block. Each call continues the
    /// random streams, so a second plan from the same generator differs.
    pub fn plan(&mut self) -> CityPlan {
        let settings = &self.settings;
        let root = Block::new(
            0.0,
            0.0,
            settings.canvas_width,
            settings.canvas_height,
            0,
            settings.road_width,
        );
        let mut tree = PartitionTree::new(root, settings.min_size);
        tree.expand(&mut self.rng.stream(PARTITION_STREAM));

        let mut blocks = Vec::new();
        for leaf in tree.leaves() {
            let block = leaf.block;
            let lanes = filler::lanes(&block.inner(), settings.lane_width);
            let placements = filler::fill_block(
                &block,
                &self.registry,
                settings.lane_width,
                &mut self.rng.stream(FILL_STREAM),
            );

            let mut sprite_rng = self.rng.stream(SPRITE_STREAM);
            let buildings = placements
                .into_iter()
                .map(|placement| PlacedBuilding {
                    sprite: self
                        .registry
                        .get(placement.archetype)
                        .and_then(|archetype| archetype.choose_sprite(&mut sprite_rng))
                        .map(str::to_string),
                    placement,
                })
                .collect();

            blocks.push(PlannedBlock {
                block,
                lanes,
                buildings,
            });
        }

        let plan = CityPlan {
            root,
            depth: tree.depth(),
            blocks,
        };
        let summary = plan.summary();
        log::info!(
            "planned '{}' (seed {}): {} blocks, {} lanes, {} buildings, depth {}",
            settings.name,
            settings.seed,
            summary.block_count,
            summary.lane_count,
            summary.building_count,
            summary.depth
        );
        plan
    }

    /// Issue the plan's draw calls: the root outline first, then per block
    /// roads, corners, background, lane dividers and buildings.
    pub fn render(&self, plan: &CityPlan, renderer: &mut dyn Renderer) {
        renderer.draw_boundary(&plan.root);
        renderer.draw_corners(&plan.root);

        for planned in &plan.blocks {
            let block = &planned.block;
            let inner = block.inner();
            renderer.draw_boundary(block);
            renderer.draw_corners(block);
            renderer.fill_with_image(&inner, &self.settings.background);

            if self.settings.draw_lane_dividers {
                for &x in &planned.lanes {
                    renderer.draw_lane_divider(x, inner.y, inner.height);
                }
            }

            for building in &planned.buildings {
                let placement = &building.placement;
                match &building.sprite {
                    Some(sprite) => renderer.draw_sprite(placement.x, placement.y, sprite),
                    None => log::warn!(
                        "archetype {} has no sprite; skipping building at ({}, {})",
                        placement.archetype,
                        placement.x,
                        placement.y
                    ),
                }
            }
        }
    }

    /// Plan the city and draw it in one pass
    pub fn generate(&mut self, renderer: &mut dyn Renderer) -> CityPlan {
        let plan = self.plan();
        self.render(&plan, renderer);
        plan
    }
}
