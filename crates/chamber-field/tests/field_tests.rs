use chamber_field::{Voxel, VoxelData, VoxelField};
use chamber_geom::{Direction, Point3};

#[test]
fn negative_coordinates_always_return_the_sentinel() {
    let mut field = VoxelField::sized(Point3::new(4, 4, 4));
    for pos in [
        Point3::new(-1, 0, 0),
        Point3::new(0, -1, 0),
        Point3::new(0, 0, -1),
        Point3::new(-5, -5, -5),
    ] {
        let voxel = field.get(pos);
        assert_eq!(voxel, Voxel::EMPTY);
        assert!(!voxel.is_solid());
        assert!(voxel.is_portalable_neg_x());
        assert!(voxel.is_portalable_neg_y());
        assert!(voxel.is_portalable_neg_z());
    }
    // Still the sentinel with autogrow on: negative never grows.
    field.set_autogrow(true);
    assert_eq!(field.get(Point3::new(-1, 2, 2)), Voxel::EMPTY);
    assert_eq!(field.width(), 4);
}

#[test]
fn out_of_bounds_without_autogrow_is_inert() {
    let mut field = VoxelField::sized(Point3::new(4, 4, 4));
    assert_eq!(field.get(Point3::new(9, 0, 0)), Voxel::EMPTY);
    field.set_data(Point3::new(9, 0, 0), VoxelData::SOLID, VoxelData::SOLID);
    assert_eq!(field.width(), 4);
    assert_eq!(field.depth(), 4);
    assert_eq!(field.height(), 4);
}

#[test]
fn autogrow_extends_to_cover_the_write() {
    let mut field = VoxelField::sized(Point3::new(4, 4, 4));
    field.set_autogrow(true);
    field.set_data(Point3::new(6, 2, 2), VoxelData::SOLID, VoxelData::SOLID);
    assert_eq!(field.width(), 7);
    assert_eq!(field.depth(), 4);
    assert_eq!(field.height(), 4);
    assert!(field.get(Point3::new(6, 2, 2)).is_solid());

    // The plane at the new maximum X is solid end to end.
    for y in 0..field.depth() {
        for z in 0..field.height() {
            assert!(field.get(Point3::new(6, y, z)).is_solid(), "({y}, {z})");
        }
    }
}

#[test]
fn autogrow_applies_to_reads_too() {
    let mut field = VoxelField::sized(Point3::new(4, 4, 4));
    field.set_autogrow(true);
    let voxel = field.get(Point3::new(4, 4, 4));
    assert_eq!(voxel.position(), Point3::new(4, 4, 4));
    assert_eq!(field.width(), 5);
    assert_eq!(field.depth(), 5);
    assert_eq!(field.height(), 5);
}

#[test]
fn resize_ignores_degenerate_dimensions() {
    let mut field = VoxelField::new();
    field.resize(1, 5, 5);
    assert_eq!(field.width(), 0);
    field.resize(5, 0, 5);
    assert_eq!(field.width(), 0);
    field.resize(5, 5, 5);
    assert_eq!(field.width(), 5);
}

#[test]
fn resize_solidifies_the_boundary_asymmetrically() {
    let field = VoxelField::sized(Point3::new(4, 3, 5));
    // Whole column solid at the max X or Y index.
    for y in 0..3 {
        for z in 0..5 {
            assert!(field.voxel(Point3::new(3, y, z)).is_solid());
        }
    }
    for x in 0..4 {
        for z in 0..5 {
            assert!(field.voxel(Point3::new(x, 2, z)).is_solid());
        }
    }
    // Interior columns: only the tip is solid.
    for x in 0..3 {
        for y in 0..2 {
            for z in 0..4 {
                assert!(!field.voxel(Point3::new(x, y, z)).is_solid(), "({x},{y},{z})");
            }
            assert!(field.voxel(Point3::new(x, y, 4)).is_solid());
        }
    }
}

#[test]
fn resize_copies_existing_data_verbatim() {
    let mut field = VoxelField::sized(Point3::new(4, 4, 4));
    field.set_data(
        Point3::new(1, 2, 1),
        VoxelData::SOLID | VoxelData::PORTAL_NEG_X,
        VoxelData::SOLID,
    );
    field.resize(6, 6, 6);
    let voxel = field.voxel(Point3::new(1, 2, 1));
    assert!(voxel.is_solid());
    assert!(!voxel.is_portalable_neg_x());
    assert!(voxel.is_portalable_neg_y());
    // The old boundary's solidification survives the copy.
    assert!(field.voxel(Point3::new(3, 0, 0)).is_solid());
}

#[test]
fn positive_faces_alias_the_neighbors_negative_face() {
    let mut field = VoxelField::sized(Point3::new(4, 4, 4));
    field.set_data(
        Point3::new(1, 1, 1),
        VoxelData::PORTAL_POS_X,
        VoxelData::empty(),
    );
    assert!(!field.voxel(Point3::new(2, 1, 1)).is_portalable_neg_x());
    assert!(!field.is_portalable(Point3::new(1, 1, 1), Direction::PosX));
    // The cell's own stored bits are untouched.
    assert!(field.voxel(Point3::new(1, 1, 1)).is_portalable_neg_x());

    field.set_portalable(Point3::new(1, 1, 1), Direction::PosX, true);
    assert!(field.is_portalable(Point3::new(1, 1, 1), Direction::PosX));
}

#[test]
fn set_range_clips_and_skips_solidification() {
    let mut field = VoxelField::sized(Point3::new(5, 5, 5));
    // Carve a room overlapping the boundary; writes past the edge clip.
    field.set_range(
        Point3::new(2, 2, 2),
        Point3::new(9, 9, 9),
        VoxelData::SOLID,
        VoxelData::empty(),
    );
    assert_eq!(field.width(), 5);
    for x in 2..5 {
        for y in 2..5 {
            for z in 2..5 {
                assert!(!field.voxel(Point3::new(x, y, z)).is_solid());
            }
        }
    }

    // With autogrow, the box plus a one-cell margin fits after the grow.
    field.set_autogrow(true);
    field.set_range(
        Point3::new(4, 4, 4),
        Point3::new(3, 3, 3),
        VoxelData::SOLID,
        VoxelData::SOLID,
    );
    assert_eq!(field.width(), 8);
    assert!(field.voxel(Point3::new(6, 6, 6)).is_solid());
}

#[test]
fn ceiling_and_floor_stop_under_solid_cells() {
    let mut field = VoxelField::sized(Point3::new(5, 5, 6));
    // The shell makes z = 5 solid everywhere; carve nothing else.
    assert_eq!(field.ceiling(Point3::new(1, 1, 0)), Point3::new(1, 1, 4));

    field.set_data(Point3::new(1, 1, 3), VoxelData::SOLID, VoxelData::SOLID);
    assert_eq!(field.ceiling(Point3::new(1, 1, 0)), Point3::new(1, 1, 2));
    assert_eq!(field.floor(Point3::new(1, 1, 5)), Point3::new(1, 1, 4));
    // Walking down from an open column bottoms out at z = 0.
    assert_eq!(field.floor(Point3::new(2, 1, 4)), Point3::new(2, 1, 0));
}

#[test]
fn records_keep_solids_boundaries_and_shadowed_cells() {
    let mut field = VoxelField::sized(Point3::new(4, 4, 4));
    field.set_data(Point3::new(1, 1, 1), VoxelData::SOLID, VoxelData::SOLID);
    let records = field.records();

    // The open cell at (2,1,1) sits in the +X shadow of a solid cell and is
    // kept; the open cell at (2,2,2) has no solid negative neighbor and no
    // boundary-plane membership, so it is dropped.
    assert!(records.iter().any(|r| r.position == Point3::new(1, 1, 1) && r.solid));
    assert!(records.iter().any(|r| r.position == Point3::new(2, 1, 1) && !r.solid));
    assert!(!records.iter().any(|r| r.position == Point3::new(2, 2, 2)));
    // Cells on a zero plane or a last plane always serialize.
    assert!(records.iter().any(|r| r.position == Point3::new(1, 1, 0)));
    assert!(records.iter().any(|r| r.position == Point3::new(3, 0, 0)));
    assert!(records.iter().any(|r| r.position == Point3::new(0, 0, 3)));
}

#[test]
fn sparse_records_round_trip() {
    let mut field = VoxelField::sized(Point3::new(5, 4, 4));
    field.set_data(Point3::new(1, 1, 1), VoxelData::SOLID, VoxelData::SOLID);
    field.set_data(
        Point3::new(2, 1, 1),
        VoxelData::PORTAL_NEG_X | VoxelData::PORTAL_NEG_Z,
        VoxelData::empty(),
    );
    field.set_data(Point3::new(3, 2, 1), VoxelData::SOLID, VoxelData::SOLID);

    let records = field.records();
    let mut decoded = VoxelField::sized(Point3::new(5, 4, 4));
    for record in &records {
        decoded.apply_record(record);
    }

    for x in 0..5 {
        for y in 0..4 {
            for z in 0..4 {
                let pos = Point3::new(x, y, z);
                assert_eq!(decoded.voxel(pos), field.voxel(pos), "at {pos}");
            }
        }
    }
}
