use std::slice;

use crate::block::Block;

/// Pre-order depth-first iterator over a forest of blocks.
///
/// A block is yielded before its children, children left to right.
/// Pending siblings are kept on an explicit stack, one entry per open
/// composite, so arbitrarily deep trees are walked without recursion.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<slice::Iter<'a, Block>>,
    depth: usize,
}

impl<'a> PreOrder<'a> {
    /// Walk `roots` and everything nested under them.
    pub fn new(roots: &'a [Block]) -> Self {
        PreOrder {
            stack: vec![roots.iter()],
            depth: 0,
        }
    }

    /// Walk the subtree rooted at `block`, starting with the block itself.
    pub fn from_block(block: &'a Block) -> Self {
        PreOrder::new(slice::from_ref(block))
    }

    /// Nesting depth of the most recently yielded block (0 for a root).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<&'a Block> {
        loop {
            let siblings = self.stack.last_mut()?;
            match siblings.next() {
                Some(block) => {
                    self.depth = self.stack.len() - 1;
                    if let Block::Composite(composite) = block {
                        self.stack.push(composite.blocks().iter());
                    }
                    return Some(block);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
