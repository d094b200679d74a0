//! Barrier hazards: fizzler or laser fields spanning a neg/pos extent pair.
//! Roles come from a per-axis position scan, not a total order.

use chamber_geom::{Direction, Facing, Point3, Vec3};

use crate::chamber::{Chamber, ItemId};
use crate::connection::{
    Cardinality, ReceiverPoint, SenderPoint, CHANNEL_EXTENT_ANCHOR, CHANNEL_STANDARD,
};
use crate::item::{extent, ExtentType, Item, ItemKind};

pub const TYPE_NAME: &str = "ITEM_BARRIER_HAZARD";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HazardType {
    #[default]
    Fizzler,
    Laserfield,
}

impl HazardType {
    pub(crate) fn from_i32(value: i32) -> HazardType {
        if value == 1 {
            HazardType::Laserfield
        } else {
            HazardType::Fizzler
        }
    }

    pub(crate) fn as_i32(self) -> i32 {
        match self {
            HazardType::Fizzler => 0,
            HazardType::Laserfield => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BarrierHazard {
    pub hazard_type: HazardType,
    pub start_enabled: bool,
    pub(crate) normal: Direction,
    pub(crate) right: Direction,
    pub(crate) is_offset: bool,
    pub(crate) neg_offset: i32,
    pub(crate) pos_offset: i32,
    pub(crate) neg: Option<ItemId>,
    pub(crate) pos: Option<ItemId>,
}

impl Default for BarrierHazard {
    fn default() -> Self {
        BarrierHazard {
            hazard_type: HazardType::Fizzler,
            start_enabled: true,
            normal: Direction::NegX,
            right: Direction::NegX,
            is_offset: false,
            neg_offset: 0,
            pos_offset: 0,
            neg: None,
            pos: None,
        }
    }
}

impl BarrierHazard {
    pub fn neg(&self) -> Option<ItemId> {
        self.neg
    }

    pub fn pos(&self) -> Option<ItemId> {
        self.pos
    }

    pub fn neg_offset(&self) -> i32 {
        self.neg_offset
    }

    pub fn pos_offset(&self) -> i32 {
        self.pos_offset
    }

    pub fn is_offset(&self) -> bool {
        self.is_offset
    }
}

pub fn new_item() -> Item {
    let mut item = Item::base(TYPE_NAME, ItemKind::BarrierHazard(BarrierHazard::default()));
    item.deletable = true;
    item.default_right = Direction::PosY;
    item.sender = Some(SenderPoint::new(Cardinality::Multi));
    item.receivers
        .push(ReceiverPoint::new(CHANNEL_STANDARD, Cardinality::Multi));
    item
}

fn state(chamber: &Chamber, id: ItemId) -> Option<&BarrierHazard> {
    match chamber.item(id)?.kind() {
        ItemKind::BarrierHazard(hazard) => Some(hazard),
        _ => None,
    }
}

fn state_mut(chamber: &mut Chamber, id: ItemId) -> Option<&mut BarrierHazard> {
    match chamber.item_mut(id)?.kind_mut() {
        ItemKind::BarrierHazard(hazard) => Some(hazard),
        _ => None,
    }
}

impl Chamber {
    /// Adds a barrier hazard with its two extents connected.
    pub fn add_barrier_hazard(&mut self) -> ItemId {
        let id = self.add_item(new_item());
        for _ in 0..2 {
            let e = self.add_item(extent::new_item(ExtentType::BarrierHazard));
            let _ = self.connect(id, e, CHANNEL_EXTENT_ANCHOR);
        }
        id
    }

    pub fn barrier_hazard(&self, id: ItemId) -> Option<&BarrierHazard> {
        state(self, id)
    }

    /// Puts the hazard on `wall`.
    pub fn set_hazard_wall(&mut self, id: ItemId, wall: Direction) {
        let Some(hazard) = state_mut(self, id) else { return };
        hazard.normal = wall.opposite();
        let (normal, right) = (hazard.normal, hazard.right);
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
        }
        update_offset(self, id);
        update_extents(self, id);
    }

    pub fn set_hazard_right(&mut self, id: ItemId, right: Direction) {
        let Some(hazard) = state_mut(self, id) else { return };
        hazard.right = right;
        let normal = hazard.normal;
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
        }
        update_offset(self, id);
        update_extents(self, id);
    }

    /// Centered hazards sit on the voxel seam; offset hazards nudge 0.375 of
    /// a cell along the forward axis.
    pub fn set_hazard_offset(&mut self, id: ItemId, offset: bool) {
        let Some(hazard) = state_mut(self, id) else { return };
        hazard.is_offset = offset;
        update_offset(self, id);
    }

    pub fn set_hazard_neg_extent(&mut self, id: ItemId, offset: i32) {
        if let Some(hazard) = state_mut(self, id) {
            hazard.neg_offset = offset;
            update_extents(self, id);
        }
    }

    pub fn set_hazard_pos_extent(&mut self, id: ItemId, offset: i32) {
        if let Some(hazard) = state_mut(self, id) {
            hazard.pos_offset = offset;
            update_extents(self, id);
        }
    }
}

fn update_offset(chamber: &mut Chamber, id: ItemId) {
    let Some(hazard) = state(chamber, id) else { return };
    if !hazard.is_offset {
        if let Some(item) = chamber.item_mut(id) {
            item.local_offset = Vec3::ZERO;
        }
        return;
    }

    let forward = hazard.normal.cross(hazard.right);
    if forward == hazard.right {
        return;
    }
    let dir = forward.unit();
    if let Some(item) = chamber.item_mut(id) {
        item.local_offset = Vec3::new(dir.x as f32, dir.y as f32, dir.z as f32) * 0.375;
    }
}

/// Re-derives the neg/pos roles from current membership. The first extent
/// seeds both roles; each later one takes neg when any of its coordinates is
/// strictly below neg's, otherwise takes pos when any coordinate is at or
/// above pos's. Per-axis and order-dependent on ties, by design. A scan that
/// ends with both roles on the same extent clears them.
pub(crate) fn refresh_roles(chamber: &mut Chamber, id: ItemId) {
    let members = chamber.extent_members(id);
    let Some(parent_pos) = chamber.item(id).map(Item::voxel_position) else {
        return;
    };

    let mut neg: Option<(ItemId, Point3)> = None;
    let mut pos: Option<(ItemId, Point3)> = None;
    for (eid, epos) in members {
        let (Some(n), Some(p)) = (neg, pos) else {
            neg = Some((eid, epos));
            pos = Some((eid, epos));
            continue;
        };
        if epos.x < n.1.x || epos.y < n.1.y || epos.z < n.1.z {
            neg = Some((eid, epos));
        } else if epos.x >= p.1.x || epos.y >= p.1.y || epos.z >= p.1.z {
            pos = Some((eid, epos));
        }
    }

    let resolved = match (neg, pos) {
        (Some((n, npos)), Some((p, ppos))) if n != p => Some((
            (n, (parent_pos - npos).chebyshev()),
            (p, (ppos - parent_pos).chebyshev()),
        )),
        _ => None,
    };

    let Some(hazard) = state_mut(chamber, id) else { return };
    match resolved {
        Some(((n, n_off), (p, p_off))) => {
            hazard.neg = Some(n);
            hazard.pos = Some(p);
            hazard.neg_offset = n_off;
            hazard.pos_offset = p_off;
        }
        None => {
            hazard.neg = None;
            hazard.pos = None;
            return;
        }
    }

    update_extents(chamber, id);
}

/// Pushes the hazard's pose down onto its extents: they sit along the right
/// axis, facing each other, `up` shared.
pub(crate) fn update_extents(chamber: &mut Chamber, id: ItemId) {
    let Some(parent_pos) = chamber.item(id).map(Item::voxel_position) else {
        return;
    };
    let Some(hazard) = state(chamber, id) else { return };
    let (normal, right) = (hazard.normal, hazard.right);
    if normal.is_parallel_to(right) {
        return;
    }
    let (Some(neg), Some(pos)) = (hazard.neg, hazard.pos) else {
        return;
    };
    let (neg_off, pos_off) = (hazard.neg_offset, hazard.pos_offset);

    let negative = right.negative();
    let up_dir = normal.cross(negative);
    let (Ok(neg_facing), Ok(pos_facing)) = (
        Facing::new(negative, up_dir),
        Facing::new(negative.opposite(), up_dir),
    ) else {
        return;
    };

    let step = negative.unit();
    chamber.place_extent(neg, parent_pos + step * neg_off, neg_facing);
    chamber.place_extent(pos, parent_pos - step * pos_off, pos_facing);
}
