//! Track platforms: a platform riding a rail between four extents. Roles
//! are assigned purely by connect order: back, left, forward, right.

use chamber_geom::{Direction, Facing};

use crate::chamber::{Chamber, ItemId};
use crate::connection::{
    Cardinality, ReceiverPoint, SenderPoint, CHANNEL_EXTENT_ANCHOR, CHANNEL_STANDARD,
};
use crate::item::{extent, ExtentType, Item, ItemKind};

pub const TYPE_NAME: &str = "ITEM_RAIL_PLATFORM";

#[derive(Clone, Debug)]
pub struct TrackPlatform {
    pub start_active: bool,
    pub rail_oscillate: bool,
    pub(crate) normal: Direction,
    pub(crate) forward: Direction,
    pub(crate) back_offset: i32,
    pub(crate) left_offset: i32,
    pub(crate) forward_offset: i32,
    pub(crate) right_offset: i32,
    pub(crate) back: Option<ItemId>,
    pub(crate) left: Option<ItemId>,
    pub(crate) forward_extent: Option<ItemId>,
    pub(crate) right_extent: Option<ItemId>,
}

impl Default for TrackPlatform {
    fn default() -> Self {
        TrackPlatform {
            start_active: true,
            rail_oscillate: true,
            normal: Direction::NegX,
            forward: Direction::NegX,
            back_offset: 0,
            left_offset: 0,
            forward_offset: 0,
            right_offset: 0,
            back: None,
            left: None,
            forward_extent: None,
            right_extent: None,
        }
    }
}

impl TrackPlatform {
    pub fn back(&self) -> Option<ItemId> {
        self.back
    }

    pub fn left(&self) -> Option<ItemId> {
        self.left
    }

    pub fn forward_extent(&self) -> Option<ItemId> {
        self.forward_extent
    }

    pub fn right_extent(&self) -> Option<ItemId> {
        self.right_extent
    }

    pub fn back_offset(&self) -> i32 {
        self.back_offset
    }

    pub fn left_offset(&self) -> i32 {
        self.left_offset
    }

    pub fn forward_offset(&self) -> i32 {
        self.forward_offset
    }

    pub fn right_offset(&self) -> i32 {
        self.right_offset
    }
}

pub fn new_item() -> Item {
    let mut item = Item::base(TYPE_NAME, ItemKind::TrackPlatform(TrackPlatform::default()));
    item.deletable = true;
    item.default_right = Direction::PosY;
    item.sender = Some(SenderPoint::new(Cardinality::Multi));
    item.receivers
        .push(ReceiverPoint::new(CHANNEL_STANDARD, Cardinality::Multi));
    item
}

fn state(chamber: &Chamber, id: ItemId) -> Option<&TrackPlatform> {
    match chamber.item(id)?.kind() {
        ItemKind::TrackPlatform(track) => Some(track),
        _ => None,
    }
}

fn state_mut(chamber: &mut Chamber, id: ItemId) -> Option<&mut TrackPlatform> {
    match chamber.item_mut(id)?.kind_mut() {
        ItemKind::TrackPlatform(track) => Some(track),
        _ => None,
    }
}

impl Chamber {
    /// Adds a track platform with its four extents connected in role order.
    pub fn add_track_platform(&mut self) -> ItemId {
        let id = self.add_item(new_item());
        for _ in 0..4 {
            let e = self.add_item(extent::new_item(ExtentType::RailPlatform));
            let _ = self.connect(id, e, CHANNEL_EXTENT_ANCHOR);
        }
        id
    }

    pub fn track_platform(&self, id: ItemId) -> Option<&TrackPlatform> {
        state(self, id)
    }

    /// Puts the platform on `wall`, keeping the travel direction.
    pub fn set_track_wall(&mut self, id: ItemId, wall: Direction) {
        let Some(track) = state_mut(self, id) else { return };
        track.normal = wall.opposite();
        let (normal, forward) = (track.normal, track.forward);
        if normal.is_parallel_to(forward) {
            return;
        }
        let right = forward.cross(normal);
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
            update_extents(self, id);
        }
    }

    /// Sets the direction the platform's face points along the rail.
    pub fn set_track_facing_direction(&mut self, id: ItemId, direction: Direction) {
        let Some(track) = state_mut(self, id) else { return };
        track.forward = direction;
        let (normal, forward) = (track.normal, track.forward);
        if normal.is_parallel_to(forward) {
            return;
        }
        let right = forward.cross(normal);
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
            update_extents(self, id);
        }
    }

    /// Rail length behind the platform; a back/forward rail zeroes the
    /// sideways one.
    pub fn set_track_back_extent(&mut self, id: ItemId, offset: i32) {
        if offset < 0 {
            return;
        }
        if let Some(track) = state_mut(self, id) {
            track.back_offset = offset;
            if offset != 0 {
                track.left_offset = 0;
                track.right_offset = 0;
            }
            update_extents(self, id);
        }
    }

    pub fn set_track_forward_extent(&mut self, id: ItemId, offset: i32) {
        if offset < 0 {
            return;
        }
        if let Some(track) = state_mut(self, id) {
            track.forward_offset = offset;
            if offset != 0 {
                track.left_offset = 0;
                track.right_offset = 0;
            }
            update_extents(self, id);
        }
    }

    /// Rail length to the platform's left; a sideways rail zeroes the
    /// back/forward one.
    pub fn set_track_left_extent(&mut self, id: ItemId, offset: i32) {
        if offset < 0 {
            return;
        }
        if let Some(track) = state_mut(self, id) {
            track.left_offset = offset;
            if offset != 0 {
                track.forward_offset = 0;
                track.back_offset = 0;
            }
            update_extents(self, id);
        }
    }

    pub fn set_track_right_extent(&mut self, id: ItemId, offset: i32) {
        if offset < 0 {
            return;
        }
        if let Some(track) = state_mut(self, id) {
            track.right_offset = offset;
            if offset != 0 {
                track.forward_offset = 0;
                track.back_offset = 0;
            }
            update_extents(self, id);
        }
    }
}

/// Re-derives roles from current membership, strictly by connect order:
/// back, left, forward, right. Fewer than four extents clears every role.
pub(crate) fn refresh_roles(chamber: &mut Chamber, id: ItemId) {
    let members = chamber.extent_members(id);
    let Some(parent_pos) = chamber.item(id).map(Item::voxel_position) else {
        return;
    };

    let resolved = (members.len() >= 4).then(|| {
        [members[0], members[1], members[2], members[3]]
            .map(|(eid, epos)| (eid, (epos - parent_pos).chebyshev()))
    });

    let Some(track) = state_mut(chamber, id) else { return };
    match resolved {
        Some([(back, back_off), (left, left_off), (forward, fwd_off), (right, right_off)]) => {
            track.back = Some(back);
            track.left = Some(left);
            track.forward_extent = Some(forward);
            track.right_extent = Some(right);
            track.back_offset = back_off;
            track.left_offset = left_off;
            track.forward_offset = fwd_off;
            track.right_offset = right_off;
        }
        None => {
            track.back = None;
            track.left = None;
            track.forward_extent = None;
            track.right_extent = None;
            return;
        }
    }

    update_extents(chamber, id);
}

/// Pushes the platform's pose down onto its four extents: back and forward
/// along the travel axis, left and right across it, each facing outward
/// around the shared normal.
pub(crate) fn update_extents(chamber: &mut Chamber, id: ItemId) {
    let Some(item) = chamber.item(id) else { return };
    let (parent_pos, facing) = (item.voxel_position(), item.facing());
    let Some(track) = state(chamber, id) else { return };
    let (Some(back), Some(left), Some(forward_e), Some(right_e)) = (
        track.back,
        track.left,
        track.forward_extent,
        track.right_extent,
    ) else {
        return;
    };
    let (back_off, left_off, fwd_off, right_off) = (
        track.back_offset,
        track.left_offset,
        track.forward_offset,
        track.right_offset,
    );

    let (normal, right) = (facing.normal(), facing.right());
    let forward = normal.cross(right);
    let forward_pt = forward.unit();
    let right_pt = right.unit();

    let (Ok(back_facing), Ok(left_facing), Ok(forward_facing), Ok(right_facing)) = (
        Facing::new(normal, right),
        Facing::new(normal, right.cross(normal)),
        Facing::new(normal, right.opposite()),
        Facing::new(normal, normal.cross(right)),
    ) else {
        return;
    };

    chamber.place_extent(back, parent_pos - forward_pt * back_off, back_facing);
    chamber.place_extent(left, parent_pos - right_pt * left_off, left_facing);
    chamber.place_extent(forward_e, parent_pos + forward_pt * fwd_off, forward_facing);
    chamber.place_extent(right_e, parent_pos + right_pt * right_off, right_facing);
}
