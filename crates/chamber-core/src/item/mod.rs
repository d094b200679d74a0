//! Items: everything placed in a chamber, from buttons to the derived
//! extent markers of composite items.

pub mod angled_panel;
pub mod barrier;
pub mod barrier_hazard;
pub mod button;
pub mod cube;
pub mod extent;
pub mod piston;
pub mod track;

use chamber_geom::{Direction, Facing, Point3, Vec3};

use crate::connection::{ReceiverPoint, SenderPoint};

pub use angled_panel::{AngledPanel, ExtendAngle};
pub use barrier::{Barrier, BarrierType};
pub use barrier_hazard::{BarrierHazard, HazardType};
pub use button::{Button, ButtonType};
pub use cube::{CubeProperties, CubeType};
pub use extent::{Extent, ExtentType};
pub use piston::PistonPlatform;
pub use track::TrackPlatform;

/// Kind-specific state for every item type the library models.
#[derive(Clone, Debug)]
pub enum ItemKind {
    Button(Button),
    AngledPanel(AngledPanel),
    Cube(CubeProperties),
    CubeDropper(CubeProperties),
    Barrier(Barrier),
    BarrierHazard(BarrierHazard),
    PistonPlatform(PistonPlatform),
    TrackPlatform(TrackPlatform),
    Extent(Extent),
    /// Unrecognized type; its properties round-trip verbatim.
    Other,
}

/// One placed item. Orientation is carried as rotation angles relative to
/// the kind's default frame; the world facing is derived through the
/// rotation tables.
#[derive(Clone, Debug)]
pub struct Item {
    pub(crate) type_name: String,
    pub(crate) deletable: bool,
    pub(crate) voxel_position: Point3,
    pub(crate) local_offset: Vec3,
    /// Rotation angles in X, Y, Z axis order (the file stores Y, Z, X).
    pub(crate) angles: Point3,
    pub(crate) default_normal: Direction,
    pub(crate) default_right: Direction,
    /// Raw `Facing` property carried through save/load untouched.
    pub(crate) facing_raw: Point3,
    pub(crate) sender: Option<SenderPoint>,
    pub(crate) receivers: Vec<ReceiverPoint>,
    pub(crate) extra: Vec<(String, String)>,
    pub(crate) kind: ItemKind,
}

impl Item {
    pub(crate) fn base(type_name: &str, kind: ItemKind) -> Item {
        Item {
            type_name: type_name.to_string(),
            deletable: false,
            voxel_position: Point3::ZERO,
            local_offset: Vec3::ZERO,
            angles: Point3::ZERO,
            default_normal: Direction::PosZ,
            default_right: Direction::PosX,
            facing_raw: Point3::ZERO,
            sender: None,
            receivers: Vec::new(),
            extra: Vec::new(),
            kind,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    #[inline]
    pub(crate) fn kind_mut(&mut self) -> &mut ItemKind {
        &mut self.kind
    }

    #[inline]
    pub fn deletable(&self) -> bool {
        self.deletable
    }

    #[inline]
    pub fn voxel_position(&self) -> Point3 {
        self.voxel_position
    }

    #[inline]
    pub fn local_offset(&self) -> Vec3 {
        self.local_offset
    }

    #[inline]
    pub fn angles(&self) -> Point3 {
        self.angles
    }

    fn default_facing(&self) -> Facing {
        Facing::new(self.default_normal, self.default_right)
            .expect("item default frames are orthogonal")
    }

    /// The item's world facing, derived from its angles.
    pub fn facing(&self) -> Facing {
        Facing::from_angles(self.default_facing(), self.angles)
    }

    /// Re-expresses `target` as angles relative to the default frame.
    pub(crate) fn set_facing(&mut self, target: Facing) {
        self.angles = Facing::angles_between(self.default_facing(), target);
    }

    /// The wall the item sits on: the opposite of its facing normal.
    pub fn wall(&self) -> Direction {
        self.facing().normal().opposite()
    }

    pub fn sender(&self) -> Option<&SenderPoint> {
        self.sender.as_ref()
    }

    pub(crate) fn sender_mut(&mut self) -> Option<&mut SenderPoint> {
        self.sender.as_mut()
    }

    pub fn receivers(&self) -> &[ReceiverPoint] {
        &self.receivers
    }

    pub fn receiver(&self, channel: &str) -> Option<&ReceiverPoint> {
        self.receivers.iter().find(|r| r.channel() == channel)
    }

    pub(crate) fn receiver_mut(&mut self, channel: &str) -> Option<&mut ReceiverPoint> {
        self.receivers.iter_mut().find(|r| r.channel() == channel)
    }

    /// Properties preserved from an unrecognized item type.
    pub fn extra_properties(&self) -> &[(String, String)] {
        &self.extra
    }
}

/// A frame standing on `wall`, with the right edge picked the way simple
/// wall-mounted items do: the next direction index along.
pub(crate) fn wall_frame(wall: Direction) -> Facing {
    let normal = wall.opposite();
    let right = Direction::ALL[(normal.index() + 1) % 6];
    Facing::new(normal, right).expect("adjacent direction indices are never parallel")
}
