use proptest::prelude::*;
use query::Structure;
use wall::Wall;
use wall::block::Block;

const COLORS: &[&str] = &["red", "green", "blue", "white"];
const MATERIALS: &[&str] = &["wood", "metal", "glass"];

fn arb_atomic() -> impl Strategy<Value = Block> {
    (prop::sample::select(COLORS), prop::sample::select(MATERIALS))
        .prop_map(|(color, material)| Block::atomic(color, material))
}

fn arb_block() -> impl Strategy<Value = Block> {
    arb_atomic().prop_recursive(4, 48, 4, |inner| {
        prop::collection::vec(inner, 1..4)
            .prop_map(|blocks| Block::composite(blocks).unwrap())
    })
}

fn arb_wall() -> impl Strategy<Value = Wall> {
    prop::collection::vec(arb_block(), 0..5).prop_map(Wall::new)
}

// Straightforward recursive reference walk to compare against.
fn collect_pre_order<'a>(blocks: &'a [Block], out: &mut Vec<&'a Block>) {
    for block in blocks {
        out.push(block);
        collect_pre_order(block.blocks(), out);
    }
}

fn recursive_count(blocks: &[Block]) -> usize {
    blocks.iter().map(|b| 1 + recursive_count(b.blocks())).sum()
}

proptest! {
    // count = sum over blocks of (1 + count of children)
    #[test]
    fn count_matches_recursive_definition(wall in arb_wall()) {
        prop_assert_eq!(wall.count(), recursive_count(wall.blocks()));
    }

    // Found block has the color, and it is the first such block in pre-order
    #[test]
    fn color_lookup_returns_first_match(
        wall in arb_wall(),
        color in prop::sample::select(COLORS),
    ) {
        let mut all = Vec::new();
        collect_pre_order(wall.blocks(), &mut all);
        let expected = all.iter().copied().find(|b| b.color() == color);
        match (wall.find_block_by_color(color), expected) {
            (Some(found), Some(expected)) => {
                prop_assert_eq!(found.color(), color);
                prop_assert!(std::ptr::eq(found, expected));
            }
            (None, None) => {}
            (found, expected) => {
                prop_assert!(false, "found {:?}, expected {:?}", found, expected);
            }
        }
    }

    // Every match has the material; every block with it appears once, in pre-order
    #[test]
    fn material_lookup_is_exact_and_ordered(
        wall in arb_wall(),
        material in prop::sample::select(MATERIALS),
    ) {
        let mut all = Vec::new();
        collect_pre_order(wall.blocks(), &mut all);
        let expected: Vec<&Block> = all.into_iter().filter(|b| b.material() == material).collect();
        let found = wall.find_blocks_by_material(material);
        prop_assert_eq!(found.len(), expected.len());
        for (f, e) in found.iter().zip(expected.iter()) {
            prop_assert_eq!(f.material(), material);
            prop_assert!(std::ptr::eq(*f, *e));
        }
    }

    // A missing color is never found, a missing material never matches
    #[test]
    fn unknown_attributes_never_match(wall in arb_wall()) {
        prop_assert!(wall.find_block_by_color("purple").is_none());
        prop_assert!(wall.find_blocks_by_material("paper").is_empty());
    }

    // Queries over a single block agree with the same block as a one-block wall
    #[test]
    fn block_subtree_agrees_with_wall(block in arb_block()) {
        let count = block.count();
        let wall = Wall::new(vec![block]);
        prop_assert_eq!(count, wall.count());
    }
}
