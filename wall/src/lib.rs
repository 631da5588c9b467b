pub mod block;
pub mod error;
pub mod traversal;

use crate::block::Block;
use crate::traversal::PreOrder;

/// A structure of building blocks.
/// Owns its top-level blocks; every nested block is owned by its composite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wall {
    /// Top-level blocks, in order.
    blocks: Vec<Block>,
}

impl Wall {
    pub fn new(blocks: Vec<Block>) -> Self {
        Wall { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every block of the structure, in pre-order.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(&self.blocks)
    }
}

impl FromIterator<Block> for Wall {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Wall::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Wall {
    type Item = &'a Block;
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
