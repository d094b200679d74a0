use chamber_geom::{rotate, unrotate, Point3};
use proptest::prelude::*;

fn arb_point() -> impl Strategy<Value = Point3> {
    (-64..64i32, -64..64i32, -64..64i32).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn arb_lattice_angle() -> impl Strategy<Value = i32> {
    prop_oneof![Just(-90), Just(0), Just(90), Just(180)]
}

fn arb_angles() -> impl Strategy<Value = Point3> {
    (arb_lattice_angle(), arb_lattice_angle(), arb_lattice_angle())
        .prop_map(|(x, y, z)| Point3::new(x, y, z))
}

proptest! {
    // Rotation is a bijection on the grid: unrotate undoes rotate.
    #[test]
    fn unrotate_is_the_inverse(p in arb_point(), a in arb_angles()) {
        prop_assert_eq!(unrotate(rotate(p, a), a), p);
    }

    // Rotation preserves the Chebyshev norm (it permutes and flips axes).
    #[test]
    fn rotation_preserves_chebyshev_norm(p in arb_point(), a in arb_angles()) {
        prop_assert_eq!(rotate(p, a).chebyshev(), p.chebyshev());
    }

    // Any whole number of extra turns is a no-op.
    #[test]
    fn angles_wrap_mod_360(p in arb_point(), a in arb_angles(), k in -2..3i32) {
        let wrapped = Point3::new(a.x + 360 * k, a.y + 360 * k, a.z + 360 * k);
        prop_assert_eq!(rotate(p, wrapped), rotate(p, a));
    }

    // Rotating by 180 twice around a single axis is the identity.
    #[test]
    fn half_turns_cancel(p in arb_point()) {
        let a = Point3::new(180, 0, 0);
        prop_assert_eq!(rotate(rotate(p, a), a), p);
    }
}
