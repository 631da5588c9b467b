pub mod composite;

pub use composite::Composite;

use crate::error::ConstructionError;

/// A node in a wall: either a leaf with its own color and material,
/// or a composite of further blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Atomic(Atomic),
    Composite(Composite),
}

/// A leaf block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atomic {
    pub color: String,
    pub material: String,
}

impl Block {
    pub fn atomic(color: impl Into<String>, material: impl Into<String>) -> Self {
        Block::Atomic(Atomic {
            color: color.into(),
            material: material.into(),
        })
    }

    /// Build a composite block. Fails if `blocks` is empty.
    pub fn composite(blocks: Vec<Block>) -> Result<Self, ConstructionError> {
        Composite::new(blocks).map(Block::Composite)
    }

    /// The block's color. A composite takes the color of its first child.
    pub fn color(&self) -> &str {
        match self {
            Block::Atomic(atomic) => &atomic.color,
            Block::Composite(composite) => composite.color(),
        }
    }

    /// The block's material. A composite takes the material of its first child.
    pub fn material(&self) -> &str {
        match self {
            Block::Atomic(atomic) => &atomic.material,
            Block::Composite(composite) => composite.material(),
        }
    }

    /// Direct children. Empty for atomic blocks.
    pub fn blocks(&self) -> &[Block] {
        match self {
            Block::Atomic(_) => &[],
            Block::Composite(composite) => composite.blocks(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Block::Composite(_))
    }
}

impl From<Atomic> for Block {
    fn from(atomic: Atomic) -> Self {
        Block::Atomic(atomic)
    }
}

impl From<Composite> for Block {
    fn from(composite: Composite) -> Self {
        Block::Composite(composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_reports_its_own_attributes() {
        let block = Block::atomic("red", "wood");
        assert_eq!(block.color(), "red");
        assert_eq!(block.material(), "wood");
        assert!(block.blocks().is_empty());
        assert!(!block.is_composite());
    }

    #[test]
    fn composite_derives_attributes_from_first_child() {
        let block = Block::composite(vec![
            Block::atomic("red", "wood"),
            Block::atomic("blue", "metal"),
        ])
        .unwrap();
        assert_eq!(block.color(), "red");
        assert_eq!(block.material(), "wood");
        assert_eq!(block.blocks().len(), 2);
        assert!(block.is_composite());
    }

    #[test]
    fn nested_composite_derives_through_first_children() {
        let inner = Block::composite(vec![Block::atomic("green", "glass")]).unwrap();
        let outer = Block::composite(vec![inner, Block::atomic("red", "wood")]).unwrap();
        assert_eq!(outer.color(), "green");
        assert_eq!(outer.material(), "glass");
    }

    #[test]
    fn converts_from_variants() {
        let atomic = Atomic {
            color: "red".to_string(),
            material: "wood".to_string(),
        };
        let block = Block::from(atomic.clone());
        assert_eq!(block, Block::Atomic(atomic));

        let composite = Composite::new(vec![block]).unwrap();
        let block: Block = composite.into();
        assert!(block.is_composite());
        assert_eq!(block.color(), "red");
    }

    #[test]
    fn empty_composite_is_rejected() {
        assert_eq!(
            Block::composite(Vec::new()),
            Err(ConstructionError::EmptyComposite)
        );
    }
}
