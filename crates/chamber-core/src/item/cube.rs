//! Cubes and the droppers that spawn them. A cube links to its dropper over
//! a pair of single-cardinality points; positions couple through the
//! field's floor/ceiling walks.

use chamber_geom::{Direction, Facing};

use crate::chamber::{Chamber, ItemId};
use crate::connection::{Cardinality, ReceiverPoint, SenderPoint, CHANNEL_BOX_DROPPER, CHANNEL_STANDARD};
use crate::item::{Item, ItemKind};

pub const TYPE_NAME: &str = "ITEM_CUBE";
pub const DROPPER_TYPE_NAME: &str = "ITEM_DROPPER_CUBE";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CubeType {
    #[default]
    Standard,
    Companion,
    Reflective,
    Sphere,
    Franken,
}

impl CubeType {
    pub(crate) fn from_i32(value: i32) -> CubeType {
        match value {
            1 => CubeType::Companion,
            2 => CubeType::Reflective,
            3 => CubeType::Sphere,
            4 => CubeType::Franken,
            _ => CubeType::Standard,
        }
    }

    pub(crate) fn as_i32(self) -> i32 {
        match self {
            CubeType::Standard => 0,
            CubeType::Companion => 1,
            CubeType::Reflective => 2,
            CubeType::Sphere => 3,
            CubeType::Franken => 4,
        }
    }
}

/// Shared cube/dropper settings. The cube's copy is authoritative while the
/// two are linked; the dropper mirrors it.
#[derive(Clone, Debug)]
pub struct CubeProperties {
    pub cube_type: CubeType,
    pub dropper_visible: bool,
    pub auto_drop: bool,
    pub auto_respawn: bool,
}

impl Default for CubeProperties {
    fn default() -> Self {
        CubeProperties {
            cube_type: CubeType::Standard,
            dropper_visible: true,
            auto_drop: true,
            auto_respawn: true,
        }
    }
}

pub fn new_cube_item() -> Item {
    let mut item = Item::base(TYPE_NAME, ItemKind::Cube(CubeProperties::default()));
    item.deletable = true;
    item.sender = Some(SenderPoint::new(Cardinality::Single));
    item
}

pub fn new_dropper_item() -> Item {
    let mut item = Item::base(
        DROPPER_TYPE_NAME,
        ItemKind::CubeDropper(CubeProperties::default()),
    );
    item.deletable = true;
    if let Ok(facing) = Facing::new(Direction::NegZ, Direction::PosX) {
        item.set_facing(facing);
    }
    item.receivers
        .push(ReceiverPoint::new(CHANNEL_BOX_DROPPER, Cardinality::Single));
    item.receivers
        .push(ReceiverPoint::new(CHANNEL_STANDARD, Cardinality::Multi));
    item
}

impl Chamber {
    /// Adds a cube together with its dropper, already linked.
    pub fn add_cube(&mut self) -> ItemId {
        let cube = self.add_item(new_cube_item());
        let dropper = self.add_item(new_dropper_item());
        let _ = self.connect(cube, dropper, CHANNEL_BOX_DROPPER);
        cube
    }

    /// The dropper linked to `cube`, if any.
    pub fn cube_dropper(&self, cube: ItemId) -> Option<ItemId> {
        let item = self.item(cube)?;
        if !matches!(item.kind(), ItemKind::Cube(_)) {
            return None;
        }
        let point = item.sender()?;
        point.connections().iter().find_map(|id| {
            let conn = self.connection(*id)?;
            let peer = self.item(conn.receiver)?;
            matches!(peer.kind(), ItemKind::CubeDropper(_)).then_some(conn.receiver)
        })
    }

    /// The cube linked to `dropper`, if any.
    pub fn dropper_cube(&self, dropper: ItemId) -> Option<ItemId> {
        let item = self.item(dropper)?;
        let point = item.receiver(CHANNEL_BOX_DROPPER)?;
        point.connections().iter().find_map(|id| {
            let conn = self.connection(*id)?;
            let peer = self.item(conn.sender)?;
            matches!(peer.kind(), ItemKind::Cube(_)).then_some(conn.sender)
        })
    }

    /// Updates the cube's settings and mirrors them onto its dropper.
    pub fn set_cube_properties(&mut self, cube: ItemId, properties: CubeProperties) {
        if let Some(item) = self.item_mut(cube) {
            if let ItemKind::Cube(props) = item.kind_mut() {
                *props = properties;
            } else {
                return;
            }
        } else {
            return;
        }
        sync_dropper(self, cube);
    }

    pub fn cube_properties(&self, id: ItemId) -> Option<&CubeProperties> {
        match self.item(id)?.kind() {
            ItemKind::Cube(props) | ItemKind::CubeDropper(props) => Some(props),
            _ => None,
        }
    }
}

/// Copies the cube's settings onto its linked dropper. Runs when the link
/// forms and whenever the cube's settings change.
pub(crate) fn sync_dropper(chamber: &mut Chamber, cube: ItemId) {
    let Some(dropper) = chamber.cube_dropper(cube) else {
        return;
    };
    let props = match chamber.item(cube).map(Item::kind) {
        Some(ItemKind::Cube(props)) => props.clone(),
        _ => return,
    };
    if let Some(item) = chamber.item_mut(dropper) {
        if let ItemKind::CubeDropper(mirror) = item.kind_mut() {
            *mirror = props;
        }
    }
}

/// The cube moved: its dropper follows to the ceiling above it.
pub(crate) fn cube_moved(chamber: &mut Chamber, cube: ItemId) {
    let Some(dropper) = chamber.cube_dropper(cube) else {
        return;
    };
    let Some(position) = chamber.item(cube).map(Item::voxel_position) else {
        return;
    };
    let ceiling = chamber.field_mut().ceiling(position);
    if let Some(item) = chamber.item_mut(dropper) {
        item.voxel_position = ceiling;
    }
}

/// The dropper moved: its cube lands on the floor below it.
pub(crate) fn dropper_moved(chamber: &mut Chamber, dropper: ItemId) {
    let Some(cube) = chamber.dropper_cube(dropper) else {
        return;
    };
    let Some(position) = chamber.item(dropper).map(Item::voxel_position) else {
        return;
    };
    let floor = chamber.field_mut().floor(position);
    if let Some(item) = chamber.item_mut(cube) {
        item.voxel_position = floor;
    }
}
