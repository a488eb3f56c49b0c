//! Pixel renderer backed by an RGBA canvas
//!
//! Sprites and background images are looked up as `<dir>/<handle>.png`.
//! A handle that cannot be resolved is reported once and every draw that
//! needs it is skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::geometry::{Block, Bounds};
use crate::render::Renderer;

const GROUND: Rgba<u8> = Rgba([236, 232, 220, 255]);
const ROAD: Rgba<u8> = Rgba([0, 0, 0, 255]);
const CENTRE_LINE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LANE_DIVIDER: Rgba<u8> = Rgba([128, 128, 128, 255]);
const CENTRE_LINE_WIDTH: f64 = 2.0;
const LANE_DIVIDER_WIDTH: f64 = 2.0;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset '{handle}' not found at {}", .path.display())]
    Missing { handle: String, path: PathBuf },
    #[error("asset '{handle}' could not be decoded: {source}")]
    Decode {
        handle: String,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Lazily loaded images keyed by handle
pub struct AssetStore {
    dir: PathBuf,
    cache: HashMap<String, Option<RgbaImage>>,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    /// Register an image directly, bypassing the asset directory
    pub fn insert(&mut self, handle: &str, image: RgbaImage) {
        self.cache.insert(handle.to_string(), Some(image));
    }

    pub fn get(&mut self, handle: &str) -> Option<&RgbaImage> {
        if !self.cache.contains_key(handle) {
            let loaded = match self.load(handle) {
                Ok(image) => Some(image),
                Err(err) => {
                    log::warn!("{err}; skipping draws that use it");
                    None
                }
            };
            self.cache.insert(handle.to_string(), loaded);
        }
        self.cache.get(handle).and_then(Option::as_ref)
    }

    /// Handles that failed to resolve, sorted
    pub fn missing(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .cache
            .iter()
            .filter(|(_, image)| image.is_none())
            .map(|(handle, _)| handle.as_str())
            .collect();
        missing.sort_unstable();
        missing
    }

    fn load(&self, handle: &str) -> Result<RgbaImage, AssetError> {
        let path = self.dir.join(format!("{handle}.png"));
        if !path.is_file() {
            return Err(AssetError::Missing {
                handle: handle.to_string(),
                path,
            });
        }
        let image = image::open(&path).map_err(|source| AssetError::Decode {
            handle: handle.to_string(),
            source,
        })?;
        Ok(image.to_rgba8())
    }
}

pub struct RasterRenderer {
    canvas: RgbaImage,
    assets: AssetStore,
}

impl RasterRenderer {
    pub fn new(width: u32, height: u32, assets: AssetStore) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, GROUND),
            assets,
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        let path = path.as_ref();
        self.canvas.save(path)?;
        log::info!(
            "wrote {}x{} image to {}",
            self.canvas.width(),
            self.canvas.height(),
            path.display()
        );
        Ok(())
    }

    /// Fill the half-open pixel span [x0, x1) x [y0, y1), clipped to the canvas
    fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba<u8>) {
        let (width, height) = self.canvas.dimensions();
        let clip = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as u32;
        let (xa, xb) = (clip(x0, width), clip(x1, width));
        let (ya, yb) = (clip(y0, height), clip(y1, height));
        for y in ya..yb {
            for x in xa..xb {
                self.canvas.put_pixel(x, y, color);
            }
        }
    }

    fn fill_disc(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
        let (width, height) = self.canvas.dimensions();
        let xa = (cx - radius).floor().max(0.0) as u32;
        let ya = (cy - radius).floor().max(0.0) as u32;
        let xb = ((cx + radius).ceil().max(0.0) as u32).min(width);
        let yb = ((cy + radius).ceil().max(0.0) as u32).min(height);
        for y in ya..yb {
            for x in xa..xb {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.canvas.put_pixel(x, y, color);
                }
            }
        }
    }

    fn stroke_horizontal(&mut self, x0: f64, x1: f64, y: f64, line_width: f64, color: Rgba<u8>) {
        let half = line_width / 2.0;
        self.fill_rect(x0, y - half, x1, y + half, color);
    }

    fn stroke_vertical(&mut self, x: f64, y0: f64, y1: f64, line_width: f64, color: Rgba<u8>) {
        let half = line_width / 2.0;
        self.fill_rect(x - half, y0, x + half, y1, color);
    }
}

impl Renderer for RasterRenderer {
    fn draw_boundary(&mut self, block: &Block) {
        let b = block.bounds;
        let road = block.road_width;
        for y in [b.y, b.bottom()] {
            self.stroke_horizontal(b.x, b.right(), y, road, ROAD);
            self.stroke_horizontal(b.x, b.right(), y, CENTRE_LINE_WIDTH, CENTRE_LINE);
        }
        for x in [b.x, b.right()] {
            self.stroke_vertical(x, b.y, b.bottom(), road, ROAD);
            self.stroke_vertical(x, b.y, b.bottom(), CENTRE_LINE_WIDTH, CENTRE_LINE);
        }
    }

    fn draw_corners(&mut self, block: &Block) {
        let radius = block.road_width / 2.0;
        for (x, y) in block.outer_corners() {
            self.fill_disc(x, y, radius, ROAD);
        }
    }

    fn fill_with_image(&mut self, area: &Bounds, image: &str) {
        let width = area.width.round() as u32;
        let height = area.height.round() as u32;
        if width == 0 || height == 0 {
            return;
        }
        let Some(source) = self.assets.get(image) else {
            return;
        };
        let scaled = imageops::resize(source, width, height, FilterType::Triangle);
        imageops::overlay(
            &mut self.canvas,
            &scaled,
            area.x.round() as i64,
            area.y.round() as i64,
        );
    }

    fn draw_lane_divider(&mut self, x: f64, top: f64, height: f64) {
        self.fill_rect(x, top, x + LANE_DIVIDER_WIDTH, top + height, LANE_DIVIDER);
    }

    fn draw_sprite(&mut self, x: f64, y: f64, sprite: &str) {
        let Some(image) = self.assets.get(sprite) else {
            return;
        };
        imageops::overlay(&mut self.canvas, image, x.round() as i64, y.round() as i64);
    }
}
