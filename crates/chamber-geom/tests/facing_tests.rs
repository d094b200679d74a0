use chamber_geom::{rotate, unrotate, Direction, Facing, Point3};

fn frames() -> Vec<Facing> {
    let mut out = Vec::new();
    for normal in Direction::ALL {
        for right in Direction::ALL {
            if let Ok(f) = Facing::new(normal, right) {
                out.push(f);
            }
        }
    }
    out
}

fn lattice() -> Vec<Point3> {
    let mut out = Vec::new();
    for x in [-90, 0, 90, 180] {
        for y in [-90, 0, 90, 180] {
            for z in [-90, 0, 90, 180] {
                out.push(Point3::new(x, y, z));
            }
        }
    }
    out
}

#[test]
fn there_are_24_valid_frames() {
    assert_eq!(frames().len(), 24);
}

#[test]
fn unrotate_inverts_rotate_over_the_whole_domain() {
    for frame in frames() {
        let v = frame.normal().unit() + frame.right().unit() * 2;
        for angles in lattice() {
            assert_eq!(
                unrotate(rotate(v, angles), angles),
                v,
                "frame {frame:?} angles {angles}"
            );
        }
    }
}

#[test]
fn angles_between_returns_a_working_preimage() {
    // The angle mapping is many-to-one; the returned triple need not match
    // any particular choice, but rotating by it must land on the target.
    for start in frames() {
        for end in frames() {
            let angles = Facing::angles_between(start, end);
            assert_eq!(
                Facing::from_angles(start, angles),
                end,
                "start {start:?} end {end:?} angles {angles}"
            );
        }
    }
}

#[test]
fn from_angles_matches_direct_rotation() {
    for start in frames() {
        for angles in lattice() {
            let end = Facing::from_angles(start, angles);
            let rotated = rotate(start.normal().unit(), angles);
            assert_eq!(end.normal().unit(), rotated);
        }
    }
}

#[test]
fn from_angles_snaps_off_lattice_input() {
    let start = Facing::new(Direction::PosZ, Direction::PosX).unwrap();
    assert_eq!(
        Facing::from_angles(start, Point3::new(450, -270, 45)),
        Facing::from_angles(start, Point3::new(90, 90, 0))
    );
}

#[test]
fn up_is_cross_of_right_and_normal() {
    let f = Facing::new(Direction::PosZ, Direction::PosX).unwrap();
    assert_eq!(f.up(), Direction::PosX.cross(Direction::PosZ));
    assert_eq!(f.up(), Direction::NegY);
}
