use crate::block::Block;
use crate::error::ConstructionError;

/// A block made of further blocks.
/// Always holds at least one child: its color and material come from the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    blocks: Vec<Block>,
    // taken from the first child when built; children never change
    color: String,
    material: String,
}

impl Composite {
    pub fn new(blocks: Vec<Block>) -> Result<Self, ConstructionError> {
        if blocks.is_empty() {
            log::debug!("rejecting composite block with no children");
            return Err(ConstructionError::EmptyComposite);
        }
        let color = blocks[0].color().to_string();
        let material = blocks[0].material().to_string();
        Ok(Composite {
            blocks,
            color,
            material,
        })
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    /// Children, in order. Never empty.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn first(&self) -> &Block {
        // non-empty since construction
        &self.blocks[0]
    }
}

// Tear nested composites down with a work list so that dropping a
// deeply nested tree does not recurse once per level.
impl Drop for Composite {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.blocks);
        while let Some(block) = pending.pop() {
            if let Block::Composite(mut composite) = block {
                pending.append(&mut composite.blocks);
            }
        }
    }
}
