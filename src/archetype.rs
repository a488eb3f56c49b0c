//! Building archetypes - the sizes and sprite variants blocks are filled with

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Index of an archetype inside its registry
pub type ArchetypeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingArchetype {
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Interchangeable sprite handles; one is picked per placement
    pub sprites: Vec<String>,
}

impl BuildingArchetype {
    pub fn new(name: &str, width: f64, height: f64, sprites: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            sprites: sprites.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Uniformly pick one sprite variant. `None` when the archetype has no sprites.
    pub fn choose_sprite<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.sprites.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.sprites.len());
        Some(self.sprites[index].as_str())
    }
}

/// Fixed, ordered set of archetypes shared read-only by the filler and renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchetypeRegistry {
    archetypes: Vec<BuildingArchetype>,
}

impl ArchetypeRegistry {
    pub fn new(archetypes: Vec<BuildingArchetype>) -> Self {
        Self { archetypes }
    }

    /// Big and medium buildings, small buildings and houses
    pub fn ikn_city() -> Self {
        Self::new(vec![
            BuildingArchetype::new(
                "big-building",
                80.0,
                40.0,
                &["big-building-1", "big-building-2", "big-building-3"],
            ),
            BuildingArchetype::new("medium-building", 90.0, 24.0, &["medium-building"]),
            BuildingArchetype::new("small-building", 16.0, 16.0, &["small-building"]),
            BuildingArchetype::new("house", 16.0, 16.0, &["house"]),
        ])
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn get(&self, id: ArchetypeId) -> Option<&BuildingArchetype> {
        self.archetypes.get(id)
    }

    pub fn as_slice(&self) -> &[BuildingArchetype] {
        &self.archetypes
    }

    /// Uniformly pick an archetype. `None` for an empty registry.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(ArchetypeId, &BuildingArchetype)> {
        if self.archetypes.is_empty() {
            return None;
        }
        let id = rng.gen_range(0..self.archetypes.len());
        Some((id, &self.archetypes[id]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_registry() {
        let registry = ArchetypeRegistry::ikn_city();

        assert_eq!(registry.len(), 4);
        let big = registry.get(0).unwrap();
        assert_eq!(big.name, "big-building");
        assert_eq!((big.width, big.height), (80.0, 40.0));
        assert_eq!(big.sprites.len(), 3);
    }

    #[test]
    fn test_choose_sprite_covers_every_variant() {
        let registry = ArchetypeRegistry::ikn_city();
        let big = registry.get(0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(big.choose_sprite(&mut rng).unwrap().to_string());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_empty_inputs_choose_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let bare = BuildingArchetype::new("bare", 10.0, 10.0, &[]);

        assert!(bare.choose_sprite(&mut rng).is_none());
        assert!(ArchetypeRegistry::default().choose(&mut rng).is_none());
    }
}
