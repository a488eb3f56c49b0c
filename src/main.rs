use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ikn_city::{
    config::CityConfig,
    generator::GeneratorBuilder,
    layout::LayoutWriter,
    raster::{AssetStore, RasterRenderer},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Procedural city block generator")]
struct Cli {
    /// Path to a city YAML file (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the rendered PNG
    #[arg(long, default_value = "city.png")]
    output: PathBuf,

    /// Also write the generated layout as JSON
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Override the directory sprites and background images are read from
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => CityConfig::from_yaml(path)
            .with_context(|| format!("loading city config {}", path.display()))?,
        None => CityConfig::ikn_city(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(dir) = cli.assets {
        config.assets.dir = dir;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let mut generator = GeneratorBuilder::from_config(&config).build();
    let mut renderer = RasterRenderer::new(
        config.canvas.width.round() as u32,
        config.canvas.height.round() as u32,
        AssetStore::new(&config.assets.dir),
    );
    let plan = generator.generate(&mut renderer);

    renderer
        .save(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    if let Some(path) = &cli.layout {
        LayoutWriter::new(generator.settings(), generator.registry().as_slice())
            .write(&plan, path)
            .with_context(|| format!("writing layout {}", path.display()))?;
    }

    let missing = renderer.assets().missing();
    if !missing.is_empty() {
        log::warn!(
            "{} asset(s) missing from {}: {}",
            missing.len(),
            config.assets.dir.display(),
            missing.join(", ")
        );
    }

    let summary = plan.summary();
    println!(
        "City '{}' (seed {}) generated: {} blocks, {} buildings -> {}",
        config.name,
        config.seed,
        summary.block_count,
        summary.building_count,
        cli.output.display()
    );
    Ok(())
}
