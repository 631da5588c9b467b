use wall::Wall;
use wall::block::Block;
use wall::traversal::PreOrder;

/// Read-only queries over a tree of blocks.
///
/// Every query is a fresh pre-order depth-first walk: a block is considered
/// before its children, and a composite is matched on the color and material
/// it takes from its first child.
pub trait Structure {
    /// Every block of the structure, in pre-order.
    fn walk(&self) -> PreOrder<'_>;

    /// The first block in pre-order whose color is `color`.
    fn find_block_by_color(&self, color: &str) -> Option<&Block> {
        let found = self.walk().find(|block| block.color() == color);
        log::trace!(target: "query", "find_block_by_color({:?}) found={}", color, found.is_some());
        found
    }

    /// All blocks whose material is `material`, in pre-order.
    /// Empty when nothing matches.
    fn find_blocks_by_material(&self, material: &str) -> Vec<&Block> {
        let matches: Vec<&Block> = self
            .walk()
            .filter(|block| block.material() == material)
            .collect();
        log::trace!(target: "query", "find_blocks_by_material({:?}) matches={}", material, matches.len());
        matches
    }

    /// Total number of blocks, composites included.
    fn count(&self) -> usize {
        self.walk().count()
    }
}

impl Structure for Wall {
    fn walk(&self) -> PreOrder<'_> {
        self.iter()
    }
}

/// The subtree rooted at this block, the block itself included.
impl Structure for Block {
    fn walk(&self) -> PreOrder<'_> {
        PreOrder::from_block(self)
    }
}

impl Structure for [Block] {
    fn walk(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }
}
