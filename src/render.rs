//! Drawing seam between the generator and whatever paints the city

use serde::Serialize;

use crate::geometry::{Block, Bounds};

/// Sink for the generator's draw calls. Implementations deal with missing
/// images themselves; nothing here can fail the generation.
pub trait Renderer {
    /// Road strokes along all four outer edges
    fn draw_boundary(&mut self, block: &Block);

    /// Round joints at the four outer corners
    fn draw_corners(&mut self, block: &Block);

    /// Stretch the image over `area`
    fn fill_with_image(&mut self, area: &Bounds, image: &str);

    fn draw_lane_divider(&mut self, x: f64, top: f64, height: f64);

    /// Blit a sprite with its top-left corner at (x, y)
    fn draw_sprite(&mut self, x: f64, y: f64, sprite: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Boundary { bounds: Bounds },
    Corners { bounds: Bounds },
    FillImage { area: Bounds, image: String },
    LaneDivider { x: f64, top: f64, height: f64 },
    Sprite { x: f64, y: f64, sprite: String },
}

/// Keeps every call in order instead of drawing it
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn sprites(&self) -> impl Iterator<Item = (f64, f64, &str)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Sprite { x, y, sprite } => Some((*x, *y, sprite.as_str())),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn draw_boundary(&mut self, block: &Block) {
        self.commands.push(DrawCommand::Boundary {
            bounds: block.bounds,
        });
    }

    fn draw_corners(&mut self, block: &Block) {
        self.commands.push(DrawCommand::Corners {
            bounds: block.bounds,
        });
    }

    fn fill_with_image(&mut self, area: &Bounds, image: &str) {
        self.commands.push(DrawCommand::FillImage {
            area: *area,
            image: image.to_string(),
        });
    }

    fn draw_lane_divider(&mut self, x: f64, top: f64, height: f64) {
        self.commands
            .push(DrawCommand::LaneDivider { x, top, height });
    }

    fn draw_sprite(&mut self, x: f64, y: f64, sprite: &str) {
        self.commands.push(DrawCommand::Sprite {
            x,
            y,
            sprite: sprite.to_string(),
        });
    }
}
