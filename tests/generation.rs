use std::path::PathBuf;

use ikn_city::{
    config::CityConfig,
    generator::GeneratorBuilder,
    layout::{self, LayoutWriter},
    raster::{AssetStore, RasterRenderer},
    render::{DrawCommand, RecordingRenderer},
};
use image::{Rgba, RgbaImage};

fn config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs/ikn_city.yaml")
}

fn load_config() -> CityConfig {
    CityConfig::from_yaml(config_path()).expect("shipped config parses")
}

#[test]
fn shipped_config_matches_builtin_defaults() {
    let config = load_config();
    let builtin = CityConfig::ikn_city();

    assert_eq!(config.name, builtin.name);
    assert_eq!(config.canvas.width, builtin.canvas.width);
    assert_eq!(config.roads.width, builtin.roads.width);
    assert_eq!(config.partition.min_size, builtin.partition.min_size);
    assert_eq!(config.fill.lane_width, builtin.fill.lane_width);
    assert_eq!(config.archetypes, builtin.archetypes);
}

#[test]
fn generation_is_reproducible_from_config() {
    let config = load_config();

    let mut first = RecordingRenderer::new();
    GeneratorBuilder::from_config(&config)
        .build()
        .generate(&mut first);
    let mut second = RecordingRenderer::new();
    GeneratorBuilder::from_config(&config)
        .build()
        .generate(&mut second);

    assert!(!first.commands().is_empty());
    assert_eq!(first.commands(), second.commands());
}

#[test]
fn every_sprite_lands_inside_a_block() {
    let config = load_config();
    let mut generator = GeneratorBuilder::from_config(&config).build();
    let plan = generator.plan();
    let registry = generator.registry();

    for planned in &plan.blocks {
        let inner = planned.block.inner();
        for building in &planned.buildings {
            let p = building.placement;
            let archetype = registry.get(p.archetype).unwrap();
            assert!(p.x >= inner.x && p.x + archetype.width <= inner.right());
            assert!(p.y >= inner.y && p.y + archetype.height <= inner.bottom());
        }
    }
}

#[test]
fn blocks_are_drawn_once_each_plus_root() {
    let config = load_config();
    let mut recorder = RecordingRenderer::new();
    let plan = GeneratorBuilder::from_config(&config)
        .build()
        .generate(&mut recorder);

    let boundaries = recorder
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Boundary { .. }))
        .count();
    let fills = recorder
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillImage { .. }))
        .count();

    assert_eq!(boundaries, plan.blocks.len() + 1);
    assert_eq!(fills, plan.blocks.len());
}

#[test]
fn raster_and_layout_outputs_are_written() {
    let mut config = load_config();
    config.canvas.width = 400.0;
    config.canvas.height = 400.0;
    let temp = tempfile::tempdir().unwrap();
    let assets = temp.path().join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    RgbaImage::from_pixel(16, 16, Rgba([180, 40, 40, 255]))
        .save(assets.join("house.png"))
        .unwrap();

    let mut generator = GeneratorBuilder::from_config(&config).build();
    let mut renderer = RasterRenderer::new(400, 400, AssetStore::new(&assets));
    let plan = generator.generate(&mut renderer);

    let png = temp.path().join("city.png");
    renderer.save(&png).unwrap();
    let json = temp.path().join("layouts").join("city.json");
    LayoutWriter::new(generator.settings(), generator.registry().as_slice())
        .write(&plan, &json)
        .unwrap();

    assert_eq!(image::open(&png).unwrap().to_rgba8().dimensions(), (400, 400));
    let metadata = layout::read_metadata(&json).unwrap();
    assert_eq!(metadata.seed, 7);
    assert_eq!(metadata.summary.block_count, plan.blocks.len());

    let missing = renderer.assets().missing();
    assert!(!missing.contains(&"house"));
    assert!(missing.contains(&"background-image"));
}
