//! Barriers: a glass or grating sheet spanning left/up/right extents.
//! Extent roles are assigned purely by connect order.

use chamber_geom::{Direction, Facing};

use crate::chamber::{Chamber, ItemId};
use crate::connection::{Cardinality, SenderPoint, CHANNEL_EXTENT_ANCHOR};
use crate::item::{extent, ExtentType, Item, ItemKind};

pub const TYPE_NAME: &str = "ITEM_BARRIER";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarrierType {
    #[default]
    Glass,
    Grating,
}

impl BarrierType {
    pub(crate) fn from_i32(value: i32) -> BarrierType {
        if value == 1 {
            BarrierType::Grating
        } else {
            BarrierType::Glass
        }
    }

    pub(crate) fn as_i32(self) -> i32 {
        match self {
            BarrierType::Glass => 0,
            BarrierType::Grating => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Barrier {
    pub barrier_type: BarrierType,
    // Cached orientation; starts as a parallel junk pair, which keeps the
    // extent push-down inert until a real facing is set.
    pub(crate) normal: Direction,
    pub(crate) right: Direction,
    pub(crate) left_offset: i32,
    pub(crate) up_offset: i32,
    pub(crate) right_offset: i32,
    pub(crate) left: Option<ItemId>,
    pub(crate) up: Option<ItemId>,
    pub(crate) right_extent: Option<ItemId>,
}

impl Default for Barrier {
    fn default() -> Self {
        Barrier {
            barrier_type: BarrierType::Glass,
            normal: Direction::NegX,
            right: Direction::NegX,
            left_offset: 0,
            up_offset: 0,
            right_offset: 0,
            left: None,
            up: None,
            right_extent: None,
        }
    }
}

impl Barrier {
    pub fn left(&self) -> Option<ItemId> {
        self.left
    }

    pub fn up(&self) -> Option<ItemId> {
        self.up
    }

    pub fn right_extent(&self) -> Option<ItemId> {
        self.right_extent
    }

    pub fn left_offset(&self) -> i32 {
        self.left_offset
    }

    pub fn up_offset(&self) -> i32 {
        self.up_offset
    }

    pub fn right_offset(&self) -> i32 {
        self.right_offset
    }
}

pub fn new_item() -> Item {
    let mut item = Item::base(TYPE_NAME, ItemKind::Barrier(Barrier::default()));
    item.deletable = true;
    item.default_normal = Direction::NegX;
    item.default_right = Direction::PosY;
    item.sender = Some(SenderPoint::new(Cardinality::Multi));
    item
}

fn state(chamber: &Chamber, id: ItemId) -> Option<&Barrier> {
    match chamber.item(id)?.kind() {
        ItemKind::Barrier(barrier) => Some(barrier),
        _ => None,
    }
}

fn state_mut(chamber: &mut Chamber, id: ItemId) -> Option<&mut Barrier> {
    match chamber.item_mut(id)?.kind_mut() {
        ItemKind::Barrier(barrier) => Some(barrier),
        _ => None,
    }
}

impl Chamber {
    /// Adds a barrier with its three extents connected in role order.
    pub fn add_barrier(&mut self) -> ItemId {
        let id = self.add_item(new_item());
        for _ in 0..3 {
            let e = self.add_item(extent::new_item(ExtentType::Barrier));
            let _ = self.connect(id, e, CHANNEL_EXTENT_ANCHOR);
        }
        id
    }

    pub fn barrier(&self, id: ItemId) -> Option<&Barrier> {
        state(self, id)
    }

    /// The direction the barrier sheet faces.
    pub fn set_barrier_facing(&mut self, id: ItemId, normal: Direction) {
        let Some(barrier) = state_mut(self, id) else { return };
        barrier.normal = normal;
        let right = barrier.right;
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
        }
        update_extents(self, id);
    }

    pub fn set_barrier_right(&mut self, id: ItemId, right: Direction) {
        let Some(barrier) = state_mut(self, id) else { return };
        barrier.right = right;
        let normal = barrier.normal;
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
        }
        update_extents(self, id);
    }

    pub fn set_barrier_left_extent(&mut self, id: ItemId, offset: i32) {
        if let Some(barrier) = state_mut(self, id) {
            barrier.left_offset = offset;
            update_extents(self, id);
        }
    }

    pub fn set_barrier_up_extent(&mut self, id: ItemId, offset: i32) {
        if let Some(barrier) = state_mut(self, id) {
            barrier.up_offset = offset;
            update_extents(self, id);
        }
    }

    pub fn set_barrier_right_extent(&mut self, id: ItemId, offset: i32) {
        if let Some(barrier) = state_mut(self, id) {
            barrier.right_offset = offset;
            update_extents(self, id);
        }
    }
}

/// Re-derives extent roles from the current membership of the extent sender,
/// in connect order: first extent is left, second up, third right. Anything
/// short of three resolvable extents clears every role.
pub(crate) fn refresh_roles(chamber: &mut Chamber, id: ItemId) {
    let members = chamber.extent_members(id);
    let Some(parent_pos) = chamber.item(id).map(Item::voxel_position) else {
        return;
    };

    let resolved = (members.len() >= 3).then(|| {
        let (left, left_pos) = members[0];
        let (up, up_pos) = members[1];
        let (right, right_pos) = members[2];
        (
            (left, (parent_pos - left_pos).chebyshev()),
            (up, (up_pos - parent_pos).chebyshev()),
            (right, (right_pos - parent_pos).chebyshev()),
        )
    });

    let Some(barrier) = state_mut(chamber, id) else { return };
    match resolved {
        Some(((left, left_off), (up, up_off), (right, right_off))) => {
            barrier.left = Some(left);
            barrier.up = Some(up);
            barrier.right_extent = Some(right);
            barrier.left_offset = left_off;
            barrier.up_offset = up_off;
            barrier.right_offset = right_off;
        }
        None => {
            barrier.left = None;
            barrier.up = None;
            barrier.right_extent = None;
            return;
        }
    }

    update_extents(chamber, id);
}

/// Pushes the barrier's pose down onto its role extents. Inert while the
/// cached orientation pair is parallel or any role is unset.
pub(crate) fn update_extents(chamber: &mut Chamber, id: ItemId) {
    let Some(parent_pos) = chamber.item(id).map(Item::voxel_position) else {
        return;
    };
    let Some(barrier) = state(chamber, id) else { return };
    let (normal, right) = (barrier.normal, barrier.right);
    if normal.is_parallel_to(right) {
        return;
    }
    let (Some(left), Some(up), Some(right_e)) = (barrier.left, barrier.up, barrier.right_extent)
    else {
        return;
    };
    let (left_off, up_off, right_off) =
        (barrier.left_offset, barrier.up_offset, barrier.right_offset);

    let up_dir = right.cross(normal);
    let right_pt = right.unit();
    let up_pt = up_dir.unit();

    let (Ok(left_facing), Ok(up_facing), Ok(right_facing)) = (
        Facing::new(right.opposite(), normal.opposite()),
        Facing::new(up_dir, normal.opposite()),
        Facing::new(right, normal.opposite()),
    ) else {
        return;
    };

    chamber.place_extent(left, parent_pos - right_pt * left_off, left_facing);
    chamber.place_extent(up, parent_pos + up_pt * up_off, up_facing);
    chamber.place_extent(right_e, parent_pos + right_pt * right_off, right_facing);
}
