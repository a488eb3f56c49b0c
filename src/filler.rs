//! Packing buildings into a block's inner rectangle
//!
//! The inner rectangle is cut into fixed-width vertical lanes. Each lane is
//! walked top to bottom, stacking randomly chosen archetypes until one does
//! not fit; the rest of that lane stays empty.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::{ArchetypeId, ArchetypeRegistry};
use crate::geometry::{Block, Bounds};

/// One building to draw: top-left corner plus the archetype that goes there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub archetype: ArchetypeId,
}

/// Left edges of the lanes in `inner`, one every `lane_width` while the
/// edge is left of the right side. The last lane may be partial; nothing is
/// returned when not even one full lane fits.
pub fn lanes(inner: &Bounds, lane_width: f64) -> Vec<f64> {
    if !(lane_width > 0.0) || inner.width < lane_width {
        return Vec::new();
    }
    let right = inner.right();
    (0..)
        .map(|k| inner.x + k as f64 * lane_width)
        .take_while(|&x| x < right)
        .collect()
}

pub fn fill_block<R: Rng + ?Sized>(
    block: &Block,
    registry: &ArchetypeRegistry,
    lane_width: f64,
    rng: &mut R,
) -> Vec<Placement> {
    let inner = block.inner();
    let mut placements = Vec::new();
    for lane_x in lanes(&inner, lane_width) {
        fill_lane(lane_x, &inner, registry, rng, &mut placements);
    }
    placements
}

fn fill_lane<R: Rng + ?Sized>(
    lane_x: f64,
    inner: &Bounds,
    registry: &ArchetypeRegistry,
    rng: &mut R,
    placements: &mut Vec<Placement>,
) {
    let mut y = inner.y;
    while y < inner.bottom() {
        let Some((id, archetype)) = registry.choose(rng) else {
            return;
        };
        // A miss on either edge ends the lane; smaller archetypes are not retried.
        if y + archetype.height > inner.bottom() || lane_x + archetype.width > inner.right() {
            return;
        }
        if archetype.height <= 0.0 {
            return;
        }
        placements.push(Placement {
            x: lane_x,
            y,
            archetype: id,
        });
        y += archetype.height;
    }
}
