//! Binary space partitioning of the canvas into city blocks
//!
//! The tree owns its nodes in an arena; internal nodes refer to their two
//! children by index. Expansion is a breadth-first worklist where each node
//! gets exactly one split attempt.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Block;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Cut along x into left and right halves
    Vertical,
    /// Cut along y into top and bottom halves
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub axis: SplitAxis,
    pub coordinate: f64,
}

#[derive(Debug, Clone)]
pub struct PartitionNode {
    pub block: Block,
    split: Option<Split>,
    children: Option<[NodeId; 2]>,
}

impl PartitionNode {
    fn leaf(block: Block) -> Self {
        Self {
            block,
            split: None,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Left-then-right or top-then-bottom
    pub fn children(&self) -> Option<[NodeId; 2]> {
        self.children
    }

    pub fn split(&self) -> Option<Split> {
        self.split
    }
}

pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
    min_size: f64,
}

impl PartitionTree {
    /// `min_size` bounds every accepted child extent. A tree whose `min_size`
    /// is not positive never splits.
    pub fn new(root: Block, min_size: f64) -> Self {
        Self {
            nodes: vec![PartitionNode::leaf(root)],
            min_size,
        }
    }

    pub fn root_id(&self) -> NodeId {
        0
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Try to split a leaf in two. Returns `false` and leaves the node
    /// untouched when it is already internal or no valid split was drawn.
    pub fn split<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if !node.is_leaf() {
            return false;
        }
        let block = node.block;
        let min_size = self.min_size;
        if !(min_size > 0.0) {
            return false;
        }

        let axis = if rng.gen_bool(0.5) {
            SplitAxis::Vertical
        } else {
            SplitAxis::Horizontal
        };
        let (origin, extent, across) = match axis {
            SplitAxis::Vertical => (block.x(), block.width(), block.height()),
            SplitAxis::Horizontal => (block.y(), block.height(), block.width()),
        };

        // The root is always cut down the middle.
        let coordinate = if block.level == 0 {
            origin + extent / 2.0
        } else {
            let span = extent - min_size;
            if span <= 0.0 {
                return false;
            }
            origin + rng.gen_range(0.0..span)
        };

        let first = coordinate - origin;
        let second = extent - first;
        if first < min_size || second < min_size || across < min_size {
            return false;
        }

        let level = block.level + 1;
        let road = block.road_width;
        let (a, b) = match axis {
            SplitAxis::Vertical => (
                Block::new(block.x(), block.y(), first, block.height(), level, road),
                Block::new(coordinate, block.y(), second, block.height(), level, road),
            ),
            SplitAxis::Horizontal => (
                Block::new(block.x(), block.y(), block.width(), first, level, road),
                Block::new(block.x(), coordinate, block.width(), second, level, road),
            ),
        };

        let first_id = self.nodes.len();
        self.nodes.push(PartitionNode::leaf(a));
        self.nodes.push(PartitionNode::leaf(b));
        let node = &mut self.nodes[id];
        node.split = Some(Split { axis, coordinate });
        node.children = Some([first_id, first_id + 1]);
        true
    }

    /// Breadth-first expansion from the root. Returns the number of split
    /// attempts made.
    pub fn expand<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut queue = VecDeque::from([self.root_id()]);
        let mut attempts = 0;
        while let Some(id) = queue.pop_front() {
            attempts += 1;
            self.split(id, rng);
            if let Some(children) = self.nodes[id].children {
                queue.extend(children);
            }
        }
        log::debug!(
            "partition expanded: {} nodes after {} split attempts",
            self.nodes.len(),
            attempts
        );
        attempts
    }

    /// Every leaf, breadth-first. Together they tile the root.
    pub fn leaves(&self) -> Vec<&PartitionNode> {
        let mut leaves = Vec::new();
        let mut queue = VecDeque::from([self.root_id()]);
        while let Some(id) = queue.pop_front() {
            let node = &self.nodes[id];
            match node.children {
                Some(children) => queue.extend(children),
                None => leaves.push(node),
            }
        }
        leaves
    }

    /// Deepest level present in the tree
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.block.level).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPS: f64 = 1e-6;

    fn expanded(width: f64, height: f64, min_size: f64, seed: u64) -> PartitionTree {
        let root = Block::new(0.0, 0.0, width, height, 0, 24.0);
        let mut tree = PartitionTree::new(root, min_size);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        tree.expand(&mut rng);
        tree
    }

    fn shrink(b: &Bounds) -> Bounds {
        Bounds::new(b.x + EPS, b.y + EPS, b.width - 2.0 * EPS, b.height - 2.0 * EPS)
    }

    fn grow(b: &Bounds) -> Bounds {
        Bounds::new(b.x - EPS, b.y - EPS, b.width + 2.0 * EPS, b.height + 2.0 * EPS)
    }

    #[test]
    fn test_leaves_tile_the_root() {
        for seed in 0..20 {
            let tree = expanded(1200.0, 1200.0, 70.0, seed);
            let root = tree.root().block.bounds;
            let leaves: Vec<Bounds> = tree.leaves().iter().map(|n| n.block.bounds).collect();

            let area: f64 = leaves.iter().map(Bounds::area).sum();
            assert!((area - root.area()).abs() < 1e-3, "seed {seed}: area {area}");

            for (i, a) in leaves.iter().enumerate() {
                assert!(grow(&root).contains(a));
                for b in &leaves[i + 1..] {
                    assert!(
                        !shrink(a).overlaps(&shrink(b)),
                        "seed {seed}: {a:?} overlaps {b:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_leaves_respect_min_size() {
        for seed in 0..20 {
            let tree = expanded(1200.0, 1200.0, 70.0, seed);
            for leaf in tree.leaves() {
                assert!(leaf.block.width() >= 70.0, "seed {seed}: {:?}", leaf.block);
                assert!(leaf.block.height() >= 70.0, "seed {seed}: {:?}", leaf.block);
            }
        }
    }

    #[test]
    fn test_root_split_is_centred() {
        for seed in 0..10 {
            let root = Block::new(0.0, 0.0, 1200.0, 1200.0, 0, 24.0);
            let mut tree = PartitionTree::new(root, 70.0);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            assert!(tree.split(tree.root_id(), &mut rng));
            let split = tree.root().split().unwrap();
            assert_eq!(split.coordinate, 600.0);

            let [a, b] = tree.root().children().unwrap();
            let (a, b) = (tree.node(a).unwrap().block, tree.node(b).unwrap().block);
            assert_eq!(a.level, 1);
            assert_eq!(b.level, 1);
            match split.axis {
                SplitAxis::Vertical => {
                    assert_eq!(a.bounds.right(), 600.0);
                    assert_eq!(b.x(), 600.0);
                    assert_eq!(a.height(), 1200.0);
                }
                SplitAxis::Horizontal => {
                    assert_eq!(a.bounds.bottom(), 600.0);
                    assert_eq!(b.y(), 600.0);
                    assert_eq!(a.width(), 1200.0);
                }
            }
        }
    }

    #[test]
    fn test_split_node_is_never_resplit() {
        let root = Block::new(0.0, 0.0, 1200.0, 1200.0, 0, 24.0);
        let mut tree = PartitionTree::new(root, 70.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(tree.split(0, &mut rng));
        let count = tree.node_count();
        assert!(!tree.split(0, &mut rng));
        assert_eq!(tree.node_count(), count);
    }

    #[test]
    fn test_undersized_root_stays_single_leaf() {
        let tree = expanded(60.0, 60.0, 70.0, 1);

        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].block.bounds, Bounds::new(0.0, 0.0, 60.0, 60.0));
    }

    #[test]
    fn test_thin_level_one_block_rejects_split() {
        let block = Block::new(0.0, 0.0, 100.0, 100.0, 1, 24.0);
        let mut tree = PartitionTree::new(block, 70.0);

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert!(!tree.split(0, &mut rng));
        }
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_non_positive_min_size_never_splits() {
        for min_size in [0.0, -10.0, f64::NAN] {
            let tree = expanded(1200.0, 1200.0, min_size, 3);

            assert_eq!(tree.node_count(), 1);
            assert!(tree.root().is_leaf());
            assert_eq!(tree.leaves().len(), 1);
        }
    }

    #[test]
    fn test_expansion_terminates() {
        for seed in 0..20 {
            let tree = expanded(1200.0, 1200.0, 70.0, seed);
            // Each accepted split takes at least MIN_SIZE off one extent.
            assert!(tree.depth() <= 2 * (1200 / 70));
            assert!(tree.leaves().len() >= 2);
            assert_eq!(tree.leaves().len() * 2 - 1, tree.node_count());
        }
    }
}
