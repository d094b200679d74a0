//! The dense voxel field and its growth/boundary semantics.

use chamber_geom::{Direction, Point3};

use crate::{Voxel, VoxelData, VoxelRecord};

/// A dense grid of voxels in x-major order. Width runs along X, depth along
/// Y, height along Z.
///
/// Every sized field keeps a solid shell at its maximum index per axis
/// (maintained by `resize`); the boundary-seeking walks depend on it.
#[derive(Clone, Debug, Default)]
pub struct VoxelField {
    width: i32,
    depth: i32,
    height: i32,
    autogrow: bool,
    voxels: Vec<Voxel>,
}

impl VoxelField {
    /// An unsized field. `resize` (directly or through autogrow) gives it
    /// dimensions.
    pub fn new() -> VoxelField {
        VoxelField::default()
    }

    /// A field sized to `size` per axis.
    pub fn sized(size: Point3) -> VoxelField {
        let mut field = VoxelField::new();
        field.resize(size.x, size.y, size.z);
        field
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> i32 {
        self.depth
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn autogrow(&self) -> bool {
        self.autogrow
    }

    /// When enabled, queries and writes beyond the current bounds grow the
    /// field to cover them instead of hitting the out-of-bounds policy.
    pub fn set_autogrow(&mut self, autogrow: bool) {
        self.autogrow = autogrow;
    }

    #[inline]
    fn index(&self, position: Point3) -> usize {
        (position.x * self.depth * self.height + position.y * self.height + position.z) as usize
    }

    #[inline]
    fn in_bounds(&self, position: Point3) -> bool {
        position.x < self.width && position.y < self.depth && position.z < self.height
    }

    fn grow_to(&mut self, position: Point3) {
        self.resize(
            self.width.max(position.x + 1),
            self.depth.max(position.y + 1),
            self.height.max(position.z + 1),
        );
    }

    /// Read-only access; never grows. Out-of-field positions (negative or
    /// beyond bounds) return the empty sentinel.
    pub fn voxel(&self, position: Point3) -> Voxel {
        if position.x < 0 || position.y < 0 || position.z < 0 || !self.in_bounds(position) {
            return Voxel::EMPTY;
        }
        self.voxels[self.index(position)]
    }

    /// The voxel at `position`. Negative coordinates always return the empty
    /// sentinel; coordinates beyond the current bounds do too, unless
    /// autogrow is enabled, in which case the field grows first.
    pub fn get(&mut self, position: Point3) -> Voxel {
        if position.x < 0 || position.y < 0 || position.z < 0 {
            return Voxel::EMPTY;
        }
        if !self.in_bounds(position) {
            if !self.autogrow {
                return Voxel::EMPTY;
            }
            self.grow_to(position);
            // Growth to a degenerate size (any dimension <= 1) is refused.
            if !self.in_bounds(position) {
                return Voxel::EMPTY;
            }
        }
        self.voxels[self.index(position)]
    }

    /// Applies `value` under `mask` at `position`. Out-of-field writes are a
    /// silent no-op (negative coordinates, or beyond bounds without
    /// autogrow).
    pub fn set_data(&mut self, position: Point3, mask: VoxelData, value: VoxelData) {
        if position.x < 0 || position.y < 0 || position.z < 0 {
            return;
        }
        if !self.in_bounds(position) {
            if !self.autogrow {
                return;
            }
            self.grow_to(position);
            if !self.in_bounds(position) {
                return;
            }
        }
        self.apply(position, mask, value);
    }

    /// Copies another voxel's stored state onto `position`, with the same
    /// out-of-bounds policy as `set_data`.
    pub fn set_voxel(&mut self, position: Point3, voxel: Voxel) {
        self.set_data(position, VoxelData::STORED, voxel.data());
    }

    // Writes an in-bounds cell. Positive-face bits route to the neighbor one
    // step along that axis before the stored nibble is masked in.
    fn apply(&mut self, position: Point3, mask: VoxelData, value: VoxelData) {
        if mask.contains(VoxelData::PORTAL_POS_X) {
            let bit = portal_bit(value.contains(VoxelData::PORTAL_POS_X), VoxelData::PORTAL_NEG_X);
            self.set_data(position + Point3::UNIT_X, VoxelData::PORTAL_NEG_X, bit);
        }
        if mask.contains(VoxelData::PORTAL_POS_Y) {
            let bit = portal_bit(value.contains(VoxelData::PORTAL_POS_Y), VoxelData::PORTAL_NEG_Y);
            self.set_data(position + Point3::UNIT_Y, VoxelData::PORTAL_NEG_Y, bit);
        }
        if mask.contains(VoxelData::PORTAL_POS_Z) {
            let bit = portal_bit(value.contains(VoxelData::PORTAL_POS_Z), VoxelData::PORTAL_NEG_Z);
            self.set_data(position + Point3::UNIT_Z, VoxelData::PORTAL_NEG_Z, bit);
        }
        let index = self.index(position);
        self.voxels[index].set_stored(mask, value);
    }

    /// Whether the face of the cell at `position` toward `direction` is
    /// portalable. Positive faces read through the neighbor's negative face.
    pub fn is_portalable(&self, position: Point3, direction: Direction) -> bool {
        match direction {
            Direction::NegX => self.voxel(position).is_portalable_neg_x(),
            Direction::NegY => self.voxel(position).is_portalable_neg_y(),
            Direction::NegZ => self.voxel(position).is_portalable_neg_z(),
            Direction::PosX => self.voxel(position + Point3::UNIT_X).is_portalable_neg_x(),
            Direction::PosY => self.voxel(position + Point3::UNIT_Y).is_portalable_neg_y(),
            Direction::PosZ => self.voxel(position + Point3::UNIT_Z).is_portalable_neg_z(),
        }
    }

    pub fn set_portalable(&mut self, position: Point3, direction: Direction, portalable: bool) {
        let (target, mask) = match direction {
            Direction::NegX => (position, VoxelData::PORTAL_NEG_X),
            Direction::NegY => (position, VoxelData::PORTAL_NEG_Y),
            Direction::NegZ => (position, VoxelData::PORTAL_NEG_Z),
            Direction::PosX => (position + Point3::UNIT_X, VoxelData::PORTAL_NEG_X),
            Direction::PosY => (position + Point3::UNIT_Y, VoxelData::PORTAL_NEG_Y),
            Direction::PosZ => (position + Point3::UNIT_Z, VoxelData::PORTAL_NEG_Z),
        };
        self.set_data(target, mask, portal_bit(portalable, mask));
    }

    /// Resizes the field. Ignored when any dimension is ≤ 1 or nothing
    /// changes. Existing in-bounds cells are copied verbatim, new cells
    /// default-initialize, and the boundary solidifies: columns at the
    /// maximum X or Y index become solid end to end, every other column only
    /// gets its last-Z cell forced solid.
    pub fn resize(&mut self, sx: i32, sy: i32, sz: i32) {
        if sx <= 1 || sy <= 1 || sz <= 1 {
            return;
        }
        if sx == self.width && sy == self.depth && sz == self.height {
            return;
        }

        let mut next: Vec<Voxel> = Vec::with_capacity((sx * sy * sz) as usize);
        for x in 0..sx {
            for y in 0..sy {
                let row_start = next.len();
                if x < self.width && y < self.depth {
                    for z in 0..self.height.min(sz) {
                        next.push(self.voxels[self.index(Point3::new(x, y, z))]);
                    }
                }
                for z in (next.len() - row_start) as i32..sz {
                    next.push(Voxel::new(Point3::new(x, y, z)));
                }

                if x == sx - 1 || y == sy - 1 {
                    for voxel in &mut next[row_start..] {
                        voxel.set_stored(VoxelData::SOLID, VoxelData::SOLID);
                    }
                } else if let Some(voxel) = next.last_mut() {
                    voxel.set_stored(VoxelData::SOLID, VoxelData::SOLID);
                }
            }
        }

        self.voxels = next;
        self.width = sx;
        self.depth = sy;
        self.height = sz;
    }

    /// Applies `value` under `mask` over a box of cells, clipped to the
    /// current bounds. With autogrow the field is grown to fit the box (plus
    /// a one-cell margin) first. No boundary solidification happens here.
    pub fn set_range(&mut self, position: Point3, size: Point3, mask: VoxelData, value: VoxelData) {
        let max = position + size + Point3::ONE;
        if self.autogrow && (max.x > self.width || max.y > self.depth || max.z > self.height) {
            self.resize(
                max.x.max(self.width),
                max.y.max(self.depth),
                max.z.max(self.height),
            );
        }

        for x in position.x.max(0)..position.x + size.x {
            if x >= self.width {
                break;
            }
            for y in position.y.max(0)..position.y + size.y {
                if y >= self.depth {
                    break;
                }
                for z in position.z.max(0)..position.z + size.z {
                    if z >= self.height {
                        break;
                    }
                    self.apply(Point3::new(x, y, z), mask, value);
                }
            }
        }
    }

    /// The last non-solid cell walking up from `location`. Relies on the
    /// solid top shell for termination; the explicit bound covers unsized
    /// fields.
    pub fn ceiling(&mut self, location: Point3) -> Point3 {
        let mut pos = location;
        while pos.z < self.height && !self.get(pos + Point3::UNIT_Z).is_solid() {
            pos.z += 1;
        }
        pos
    }

    /// The last non-solid cell walking down from `location`; bottoms out at
    /// z = 0.
    pub fn floor(&mut self, location: Point3) -> Point3 {
        let mut pos = location;
        while pos.z > 0 && !self.get(pos - Point3::UNIT_Z).is_solid() {
            pos.z -= 1;
        }
        pos
    }

    /// Sparse encoding of the field. A voxel is omitted iff it is not solid,
    /// not on the last plane of any axis, and all three of its negative
    /// neighbors are also not solid; everything omitted decodes back to the
    /// default cell.
    pub fn records(&self) -> Vec<VoxelRecord> {
        let mut out = Vec::new();
        for x in 0..self.width {
            for y in 0..self.depth {
                for z in 0..self.height {
                    let pos = Point3::new(x, y, z);
                    let voxel = self.voxels[self.index(pos)];

                    let interior =
                        x != self.width - 1 && y != self.depth - 1 && z != self.height - 1;
                    let has_neg_neighbors = x > 0 && y > 0 && z > 0;
                    if !voxel.is_solid()
                        && interior
                        && has_neg_neighbors
                        && !self.voxel(pos - Point3::UNIT_X).is_solid()
                        && !self.voxel(pos - Point3::UNIT_Y).is_solid()
                        && !self.voxel(pos - Point3::UNIT_Z).is_solid()
                    {
                        continue;
                    }

                    out.push(VoxelRecord::from_voxel(&voxel));
                }
            }
        }
        out
    }

    /// Writes one sparse record into the field (same out-of-bounds policy as
    /// `set_data`).
    pub fn apply_record(&mut self, record: &VoxelRecord) {
        self.set_data(record.position, VoxelData::STORED, record.data());
    }
}

#[inline]
fn portal_bit(on: bool, bit: VoxelData) -> VoxelData {
    if on { bit } else { VoxelData::empty() }
}
