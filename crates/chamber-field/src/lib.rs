//! Dense voxel storage for puzzle chambers.
#![forbid(unsafe_code)]

mod field;

pub use field::VoxelField;

use bitflags::bitflags;
use chamber_geom::Point3;

bitflags! {
    /// Per-voxel state bits. Only the low nibble is stored on a voxel; the
    /// positive-face bits are logical and alias the negative face of the
    /// neighbor one step further along that axis.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct VoxelData: u8 {
        const PORTAL_NEG_X = 1;
        const PORTAL_NEG_Y = 2;
        const PORTAL_NEG_Z = 4;
        const SOLID = 8;

        const PORTAL_POS_X = 16;
        const PORTAL_POS_Y = 32;
        const PORTAL_POS_Z = 64;

        const PORTAL_NEG = 7;
        const PORTAL_POS = 112;
        const PORTAL_ALL = 119;
        /// The bits a voxel actually owns.
        const STORED = 15;
    }
}

impl VoxelData {
    /// A fresh cell: open, portalable on every owned face.
    pub const DEFAULT: VoxelData = VoxelData::PORTAL_NEG;
}

/// A copy of one cell's state, tagged with its grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Voxel {
    position: Point3,
    data: VoxelData,
}

impl Voxel {
    /// The sentinel returned for any out-of-field query.
    pub const EMPTY: Voxel = Voxel {
        position: Point3::new(-1, -1, -1),
        data: VoxelData::DEFAULT,
    };

    pub(crate) fn new(position: Point3) -> Voxel {
        Voxel {
            position,
            data: VoxelData::DEFAULT,
        }
    }

    #[inline]
    pub fn position(&self) -> Point3 {
        self.position
    }

    #[inline]
    pub fn data(&self) -> VoxelData {
        self.data
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.data.contains(VoxelData::SOLID)
    }

    #[inline]
    pub fn is_portalable_neg_x(&self) -> bool {
        self.data.contains(VoxelData::PORTAL_NEG_X)
    }

    #[inline]
    pub fn is_portalable_neg_y(&self) -> bool {
        self.data.contains(VoxelData::PORTAL_NEG_Y)
    }

    #[inline]
    pub fn is_portalable_neg_z(&self) -> bool {
        self.data.contains(VoxelData::PORTAL_NEG_Z)
    }

    /// Overwrites the masked stored bits; logical positive-face bits in the
    /// mask are ignored here (the field resolves those through neighbors).
    pub(crate) fn set_stored(&mut self, mask: VoxelData, value: VoxelData) {
        let mask = mask & VoxelData::STORED;
        self.data = (self.data - mask) | (value & mask);
    }
}

/// One entry of the sparse voxel encoding: explicit state for a position,
/// everything absent decodes to the default cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelRecord {
    pub position: Point3,
    pub solid: bool,
    pub portal_neg_x: bool,
    pub portal_neg_y: bool,
    pub portal_neg_z: bool,
}

impl VoxelRecord {
    pub fn from_voxel(voxel: &Voxel) -> VoxelRecord {
        VoxelRecord {
            position: voxel.position(),
            solid: voxel.is_solid(),
            portal_neg_x: voxel.is_portalable_neg_x(),
            portal_neg_y: voxel.is_portalable_neg_y(),
            portal_neg_z: voxel.is_portalable_neg_z(),
        }
    }

    pub fn data(&self) -> VoxelData {
        let mut data = VoxelData::empty();
        if self.solid {
            data |= VoxelData::SOLID;
        }
        if self.portal_neg_x {
            data |= VoxelData::PORTAL_NEG_X;
        }
        if self.portal_neg_y {
            data |= VoxelData::PORTAL_NEG_Y;
        }
        if self.portal_neg_z {
            data |= VoxelData::PORTAL_NEG_Z;
        }
        data
    }
}
