//! Integer rotation in 90° increments around the world axes.

use crate::Point3;

type Mat3 = [[i32; 3]; 3];

const IDENTITY: Mat3 = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

// One matrix per quantization bucket: -90°, 0°, 90°, 180°.
const ROT_X: [Mat3; 4] = [
    [[1, 0, 0], [0, 0, 1], [0, -1, 0]],
    IDENTITY,
    [[1, 0, 0], [0, 0, -1], [0, 1, 0]],
    [[1, 0, 0], [0, -1, 0], [0, 0, -1]],
];

const ROT_Y: [Mat3; 4] = [
    [[0, 0, -1], [0, 1, 0], [1, 0, 0]],
    IDENTITY,
    [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
    [[-1, 0, 0], [0, 1, 0], [0, 0, -1]],
];

const ROT_Z: [Mat3; 4] = [
    [[0, 1, 0], [-1, 0, 0], [0, 0, 1]],
    IDENTITY,
    [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
    [[-1, 0, 0], [0, -1, 0], [0, 0, 1]],
];

#[inline]
fn apply(m: &Mat3, p: Point3) -> Point3 {
    Point3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z,
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z,
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z,
    )
}

/// Normalizes an angle into [-90, 180] and picks its 90° bucket. Angles that
/// are not multiples of 90 land in the nearest lower bucket.
fn bucket(angle: i32) -> usize {
    let mut a = angle;
    while a > 180 {
        a -= 360;
    }
    while a < -90 {
        a += 360;
    }
    ((a + 90) / 90) as usize
}

/// The lattice angle a component quantizes to.
pub(crate) fn snap_angle(angle: i32) -> i32 {
    bucket(angle) as i32 * 90 - 90
}

/// Rotates `point` by `angles` degrees around the X, then Y, then Z axis.
pub fn rotate(point: Point3, angles: Point3) -> Point3 {
    let p = apply(&ROT_X[bucket(angles.x)], point);
    let p = apply(&ROT_Y[bucket(angles.y)], p);
    apply(&ROT_Z[bucket(angles.z)], p)
}

/// Reverses `rotate`: applies the negated angles in Z, Y, X order.
pub fn unrotate(point: Point3, angles: Point3) -> Point3 {
    let p = apply(&ROT_Z[bucket(-angles.z)], point);
    let p = apply(&ROT_Y[bucket(-angles.y)], p);
    apply(&ROT_X[bucket(-angles.x)], p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_around_z() {
        let p = Point3::new(1, 0, 0);
        assert_eq!(rotate(p, Point3::new(0, 0, 90)), Point3::new(0, 1, 0));
        assert_eq!(rotate(p, Point3::new(0, 0, -90)), Point3::new(0, -1, 0));
        assert_eq!(rotate(p, Point3::new(0, 0, 180)), Point3::new(-1, 0, 0));
    }

    #[test]
    fn angles_normalize_mod_360() {
        let p = Point3::new(1, 2, 3);
        assert_eq!(rotate(p, Point3::new(450, 0, 0)), rotate(p, Point3::new(90, 0, 0)));
        assert_eq!(rotate(p, Point3::new(-270, 0, 0)), rotate(p, Point3::new(90, 0, 0)));
        assert_eq!(rotate(p, Point3::new(0, 270, 0)), rotate(p, Point3::new(0, -90, 0)));
    }

    #[test]
    fn off_lattice_angles_quantize() {
        let p = Point3::new(1, 2, 3);
        // 45 shares the 0° bucket, 100 the 90° bucket.
        assert_eq!(rotate(p, Point3::new(45, 0, 0)), p);
        assert_eq!(
            rotate(p, Point3::new(100, 0, 0)),
            rotate(p, Point3::new(90, 0, 0))
        );
        assert_eq!(snap_angle(45), 0);
        assert_eq!(snap_angle(100), 90);
        assert_eq!(snap_angle(-100), 180);
    }
}
