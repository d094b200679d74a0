//! Piston platforms: a lift running between a near and a far extent.
//! Two colinear extents cannot be told apart by position, so each carries an
//! explicit end handle (0 = near, 1 = far).

use chamber_geom::Direction;

use crate::chamber::{Chamber, ItemId};
use crate::connection::{
    Cardinality, ReceiverPoint, SenderPoint, CHANNEL_EXTENT_ANCHOR, CHANNEL_STANDARD,
};
use crate::item::{extent, Extent, ExtentType, Item, ItemKind};

pub const TYPE_NAME: &str = "ITEM_PISTON_PLATFORM";

#[derive(Clone, Debug, Default)]
pub struct PistonPlatform {
    pub start_up: bool,
    pub(crate) near_offset: i32,
    pub(crate) far_offset: i32,
    pub(crate) near: Option<ItemId>,
    pub(crate) far: Option<ItemId>,
}

impl PistonPlatform {
    pub fn near(&self) -> Option<ItemId> {
        self.near
    }

    pub fn far(&self) -> Option<ItemId> {
        self.far
    }

    pub fn near_offset(&self) -> i32 {
        self.near_offset
    }

    pub fn far_offset(&self) -> i32 {
        self.far_offset
    }
}

pub fn new_item() -> Item {
    let mut item = Item::base(TYPE_NAME, ItemKind::PistonPlatform(PistonPlatform::default()));
    item.deletable = true;
    item.default_normal = Direction::PosZ;
    item.default_right = Direction::PosY;
    item.sender = Some(SenderPoint::new(Cardinality::Multi));
    item.receivers
        .push(ReceiverPoint::new(CHANNEL_STANDARD, Cardinality::Multi));
    item
}

fn state(chamber: &Chamber, id: ItemId) -> Option<&PistonPlatform> {
    match chamber.item(id)?.kind() {
        ItemKind::PistonPlatform(piston) => Some(piston),
        _ => None,
    }
}

fn state_mut(chamber: &mut Chamber, id: ItemId) -> Option<&mut PistonPlatform> {
    match chamber.item_mut(id)?.kind_mut() {
        ItemKind::PistonPlatform(piston) => Some(piston),
        _ => None,
    }
}

impl Chamber {
    /// Adds a piston platform with its two end-handle extents connected.
    pub fn add_piston_platform(&mut self) -> ItemId {
        let id = self.add_item(new_item());
        for handle in 0..2 {
            let e = self.add_item(extent::new_piston_item(handle));
            let _ = self.connect(id, e, CHANNEL_EXTENT_ANCHOR);
        }
        id
    }

    pub fn piston_platform(&self, id: ItemId) -> Option<&PistonPlatform> {
        state(self, id)
    }

    /// Puts the platform on `wall`; the right edge follows the normal.
    pub fn set_piston_wall(&mut self, id: ItemId, wall: Direction) {
        let Some(item) = self.item_mut(id) else { return };
        if !matches!(item.kind(), ItemKind::PistonPlatform(_)) {
            return;
        }
        item.set_facing(crate::item::wall_frame(wall));
        update_extents(self, id);
    }

    /// Retracted height of the lift. The far end never drops below it.
    pub fn set_piston_near_extent(&mut self, id: ItemId, offset: i32) {
        if offset < 0 {
            return;
        }
        if let Some(piston) = state_mut(self, id) {
            piston.near_offset = offset;
            piston.far_offset = piston.far_offset.max(offset);
            update_extents(self, id);
        }
    }

    /// Extended height of the lift; pulls the near end down with it.
    pub fn set_piston_far_extent(&mut self, id: ItemId, offset: i32) {
        if let Some(piston) = state_mut(self, id) {
            piston.far_offset = offset;
            piston.near_offset = piston.near_offset.min(offset);
            update_extents(self, id);
        }
    }
}

/// Re-derives the near/far roles from current membership by each piston
/// extent's end handle; later connections win a contested handle. Both
/// handles must be present or the roles clear.
pub(crate) fn refresh_roles(chamber: &mut Chamber, id: ItemId) {
    let Some(parent_pos) = chamber.item(id).map(Item::voxel_position) else {
        return;
    };

    let mut near: Option<(ItemId, i32)> = None;
    let mut far: Option<(ItemId, i32)> = None;
    let member_ids: Vec<ItemId> = chamber
        .extent_members(id)
        .into_iter()
        .map(|(eid, _)| eid)
        .collect();
    for eid in member_ids {
        let Some(peer) = chamber.item(eid) else { continue };
        let ItemKind::Extent(Extent {
            extent_type: ExtentType::PistonPlatform,
            end_handle,
        }) = peer.kind()
        else {
            continue;
        };
        let distance = (parent_pos - peer.voxel_position()).chebyshev();
        match end_handle {
            0 => near = Some((eid, distance)),
            1 => far = Some((eid, distance)),
            _ => {}
        }
    }

    let resolved = match (near, far) {
        (Some(n), Some(f)) => Some((n, f)),
        _ => None,
    };

    let Some(piston) = state_mut(chamber, id) else { return };
    match resolved {
        Some(((n, n_off), (f, f_off))) => {
            piston.near = Some(n);
            piston.far = Some(f);
            piston.near_offset = n_off;
            piston.far_offset = f_off;
        }
        None => {
            piston.near = None;
            piston.far = None;
            return;
        }
    }

    update_extents(chamber, id);
}

/// Pushes the platform's pose down: both extents share its facing and sit
/// along the normal at their offsets.
pub(crate) fn update_extents(chamber: &mut Chamber, id: ItemId) {
    let Some(item) = chamber.item(id) else { return };
    let (parent_pos, facing) = (item.voxel_position(), item.facing());
    let Some(piston) = state(chamber, id) else { return };
    let (Some(near), Some(far)) = (piston.near, piston.far) else {
        return;
    };
    let (near_off, far_off) = (piston.near_offset, piston.far_offset);

    let step = facing.normal().unit();
    chamber.place_extent(near, parent_pos + step * near_off, facing);
    chamber.place_extent(far, parent_pos + step * far_off, facing);
}
