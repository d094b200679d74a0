use chamber_core::item::{barrier, extent, ExtentType};
use chamber_core::{Chamber, CHANNEL_EXTENT_ANCHOR};
use chamber_geom::Point3;
use proptest::prelude::*;

fn arb_position() -> impl Strategy<Value = Point3> {
    (0..16i32, 0..16i32, 0..16i32).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

proptest! {
    // Barrier roles depend only on connect order: with k extents connected,
    // roles resolve exactly when k >= 3, to the first three in order, with
    // Chebyshev offsets from the parent.
    #[test]
    fn barrier_roles_are_order_determined(
        parent in arb_position(),
        positions in proptest::collection::vec(arb_position(), 0..6),
    ) {
        let mut chamber = Chamber::new();
        let b = chamber.add_item(barrier::new_item());
        chamber.set_voxel_position(b, parent);

        let mut extents = Vec::new();
        for position in &positions {
            let e = chamber.add_item(extent::new_item(ExtentType::Barrier));
            chamber.set_voxel_position(e, *position);
            chamber.connect(b, e, CHANNEL_EXTENT_ANCHOR).unwrap();
            extents.push(e);
        }

        let state = chamber.barrier(b).unwrap();
        if extents.len() < 3 {
            prop_assert_eq!(state.left(), None);
            prop_assert_eq!(state.up(), None);
            prop_assert_eq!(state.right_extent(), None);
        } else {
            prop_assert_eq!(state.left(), Some(extents[0]));
            prop_assert_eq!(state.up(), Some(extents[1]));
            prop_assert_eq!(state.right_extent(), Some(extents[2]));
            prop_assert_eq!(state.left_offset(), (parent - positions[0]).chebyshev());
            prop_assert_eq!(state.up_offset(), (positions[1] - parent).chebyshev());
            prop_assert_eq!(state.right_offset(), (positions[2] - parent).chebyshev());
        }
    }

    // The near end of a piston never passes its far end, whatever order the
    // two offsets are edited in.
    #[test]
    fn piston_offsets_stay_ordered(
        edits in proptest::collection::vec((any::<bool>(), -4..12i32), 1..12),
    ) {
        let mut chamber = Chamber::new();
        let p = chamber.add_piston_platform();

        for (far, offset) in edits {
            if far {
                chamber.set_piston_far_extent(p, offset);
            } else {
                chamber.set_piston_near_extent(p, offset);
            }
            let state = chamber.piston_platform(p).unwrap();
            prop_assert!(state.near_offset() <= state.far_offset());
        }
    }
}
