//! The chamber: one voxel field plus arenas of items and connections.

use chamber_field::VoxelField;
use chamber_geom::{Facing, Point3, Vec3};
use thiserror::Error;

use crate::connection::{Cardinality, Connection};
use crate::item::{barrier, barrier_hazard, cube, piston, track, Item, ItemKind};

/// Stable handle into the chamber's item arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable handle into the chamber's connection arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) u32);

impl ConnectionId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("unknown item {0:?}")]
    UnknownItem(ItemId),

    #[error("item {0:?} has no sender point")]
    NoSenderPoint(ItemId),

    #[error("item {item:?} has no receiver for channel {channel:?}")]
    NoReceiverChannel { item: ItemId, channel: String },
}

/// A puzzle chamber. Owns every item, extent and connection; removal
/// cascades and role recomputation complete before a mutation returns.
pub struct Chamber {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) file_id: String,
    pub(crate) created: i64,
    pub(crate) modified: i64,
    pub(crate) compile_time: f64,
    pub(crate) preview_dirty: i32,
    pub(crate) size: Point3,
    pub(crate) field: VoxelField,
    pub(crate) items: Vec<Option<Item>>,
    pub(crate) connections: Vec<Option<Connection>>,
}

impl Default for Chamber {
    fn default() -> Self {
        Chamber::new()
    }
}

impl Chamber {
    pub fn new() -> Chamber {
        Chamber {
            title: "Untitled Chamber".to_string(),
            description: String::new(),
            file_id: "0x0000000000000000".to_string(),
            created: 0,
            modified: 0,
            compile_time: 15.0,
            preview_dirty: 0,
            size: Point3::ONE,
            field: VoxelField::new(),
            items: Vec::new(),
            connections: Vec::new(),
        }
    }

    // Metadata

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn modified(&self) -> i64 {
        self.modified
    }

    /// Unix-second timestamps stamped into the saved file.
    pub fn set_timestamps(&mut self, created: i64, modified: i64) {
        self.created = created;
        self.modified = modified;
    }

    /// Usable interior size: one less than the field's dimensions once the
    /// field is sized.
    pub fn chamber_size(&self) -> Point3 {
        if self.field.width() > 0 {
            Point3::new(
                self.field.width() - 1,
                self.field.depth() - 1,
                self.field.height() - 1,
            )
        } else {
            self.size
        }
    }

    /// Resizes the field to `size + 1` per axis, creating the solid shell
    /// past the usable interior.
    pub fn set_chamber_size(&mut self, size: Point3) {
        self.size = size;
        self.field.resize(size.x + 1, size.y + 1, size.z + 1);
    }

    pub fn field(&self) -> &VoxelField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut VoxelField {
        &mut self.field
    }

    // Items

    pub fn add_item(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(Some(item));
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())?.as_ref()
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id.index())?.as_mut()
    }

    /// Live items in id order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (ItemId(i as u32), item)))
    }

    pub fn item_count(&self) -> usize {
        self.items.iter().filter(|slot| slot.is_some()).count()
    }

    /// Removes an item, disconnecting every connection point it owns first.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let Some(item) = self.item(id) else {
            return false;
        };

        let mut doomed: Vec<ConnectionId> = Vec::new();
        if let Some(point) = item.sender() {
            doomed.extend_from_slice(point.connections());
        }
        for point in item.receivers() {
            doomed.extend_from_slice(point.connections());
        }
        for connection in doomed {
            self.disconnect(connection);
        }

        self.items[id.index()] = None;
        log::debug!(target: "chamber", "removed item {id:?}");
        true
    }

    /// Moves an item, running whatever follows from it: composites reposition
    /// their extents, cubes and droppers drag each other through the field's
    /// floor/ceiling walks.
    pub fn set_voxel_position(&mut self, id: ItemId, position: Point3) {
        let Some(item) = self.item_mut(id) else { return };
        item.voxel_position = position;
        self.position_changed(id);
    }

    pub fn set_local_offset(&mut self, id: ItemId, offset: Vec3) {
        if let Some(item) = self.item_mut(id) {
            item.local_offset = offset;
        }
    }

    pub fn set_deletable(&mut self, id: ItemId, deletable: bool) {
        if let Some(item) = self.item_mut(id) {
            item.deletable = deletable;
        }
    }

    /// Reorients an item without any composite bookkeeping. Composite kinds
    /// have their own wall/right setters that keep cached state coherent.
    pub fn set_item_facing(&mut self, id: ItemId, facing: Facing) {
        if let Some(item) = self.item_mut(id) {
            item.set_facing(facing);
        }
    }

    // Connections

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.index())?.as_ref()
    }

    /// Live connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ConnectionId(i as u32), c)))
    }

    pub fn connection_count(&self) -> usize {
        self.connections.iter().filter(|slot| slot.is_some()).count()
    }

    /// Connects an item's sender point to another item's receiver point on
    /// `channel`. Connecting an already-connected pair is a no-op returning
    /// the existing connection; a single-cardinality endpoint displaces its
    /// current connection first. Role inference on the sender side runs
    /// before this returns.
    pub fn connect(
        &mut self,
        sender: ItemId,
        receiver: ItemId,
        channel: &str,
    ) -> Result<ConnectionId, ConnectError> {
        let sender_cardinality = self
            .item(sender)
            .ok_or(ConnectError::UnknownItem(sender))?
            .sender()
            .ok_or(ConnectError::NoSenderPoint(sender))?
            .cardinality();
        let receiver_cardinality = self
            .item(receiver)
            .ok_or(ConnectError::UnknownItem(receiver))?
            .receiver(channel)
            .ok_or_else(|| ConnectError::NoReceiverChannel {
                item: receiver,
                channel: channel.to_string(),
            })?
            .cardinality();

        if let Some(existing) = self.find_connection(sender, receiver, channel) {
            return Ok(existing);
        }

        if sender_cardinality == Cardinality::Single {
            self.displace_sender(sender);
        }
        if receiver_cardinality == Cardinality::Single {
            self.displace_receiver(receiver, channel);
        }

        let id = ConnectionId(self.connections.len() as u32);
        self.connections.push(Some(Connection {
            sender,
            receiver,
            channel: channel.to_string(),
        }));
        if let Some(point) = self.item_mut(sender).and_then(Item::sender_mut) {
            point.insert(id);
        }
        if let Some(point) = self.item_mut(receiver).and_then(|i| i.receiver_mut(channel)) {
            point.insert(id);
        }
        log::debug!(target: "chamber", "connect {sender:?} -> {receiver:?} on {channel}");

        self.membership_changed(sender);
        Ok(id)
    }

    /// Removes a connection from both endpoints and the chamber's list, then
    /// re-runs role inference on the sender side.
    pub fn disconnect(&mut self, id: ConnectionId) {
        let Some(slot) = self.connections.get_mut(id.index()) else {
            return;
        };
        let Some(connection) = slot.take() else { return };

        if let Some(point) = self.item_mut(connection.sender).and_then(Item::sender_mut) {
            point.remove(id);
        }
        if let Some(point) = self
            .item_mut(connection.receiver)
            .and_then(|i| i.receiver_mut(&connection.channel))
        {
            point.remove(id);
        }
        log::debug!(
            target: "chamber",
            "disconnect {:?} -> {:?} on {}",
            connection.sender,
            connection.receiver,
            connection.channel
        );

        self.membership_changed(connection.sender);
    }

    /// The existing connection for an exact (sender, receiver, channel)
    /// triple, if one exists.
    pub fn find_connection(
        &self,
        sender: ItemId,
        receiver: ItemId,
        channel: &str,
    ) -> Option<ConnectionId> {
        let point = self.item(sender)?.sender()?;
        point.connections().iter().copied().find(|id| {
            self.connection(*id)
                .is_some_and(|c| c.receiver == receiver && c.channel == channel)
        })
    }

    fn displace_sender(&mut self, sender: ItemId) {
        let current: Vec<ConnectionId> = self
            .item(sender)
            .and_then(Item::sender)
            .map(|p| p.connections().to_vec())
            .unwrap_or_default();
        for id in current {
            self.disconnect(id);
        }
    }

    fn displace_receiver(&mut self, receiver: ItemId, channel: &str) {
        let current: Vec<ConnectionId> = self
            .item(receiver)
            .and_then(|i| i.receiver(channel))
            .map(|p| p.connections().to_vec())
            .unwrap_or_default();
        for id in current {
            self.disconnect(id);
        }
    }

    // Cascades

    /// One full role-inference pass for whichever composite owns the mutated
    /// sender point. Scans current membership from scratch, so repeating it
    /// without an intervening change is idempotent.
    fn membership_changed(&mut self, id: ItemId) {
        let Some(cascade) = self.item(id).map(cascade_kind) else {
            return;
        };
        match cascade {
            Cascade::Barrier => barrier::refresh_roles(self, id),
            Cascade::BarrierHazard => barrier_hazard::refresh_roles(self, id),
            Cascade::PistonPlatform => piston::refresh_roles(self, id),
            Cascade::TrackPlatform => track::refresh_roles(self, id),
            Cascade::Cube => cube::sync_dropper(self, id),
            Cascade::CubeDropper | Cascade::Inert => {}
        }
    }

    fn position_changed(&mut self, id: ItemId) {
        let Some(cascade) = self.item(id).map(cascade_kind) else {
            return;
        };
        match cascade {
            Cascade::Barrier => barrier::update_extents(self, id),
            Cascade::BarrierHazard => barrier_hazard::update_extents(self, id),
            Cascade::PistonPlatform => piston::update_extents(self, id),
            Cascade::TrackPlatform => track::update_extents(self, id),
            Cascade::Cube => cube::cube_moved(self, id),
            Cascade::CubeDropper => cube::dropper_moved(self, id),
            Cascade::Inert => {}
        }
    }

    /// Extents currently connected through `id`'s sender point, in connect
    /// order, with their raw positions.
    pub(crate) fn extent_members(&self, id: ItemId) -> Vec<(ItemId, Point3)> {
        let Some(point) = self.item(id).and_then(Item::sender) else {
            return Vec::new();
        };
        point
            .connections()
            .iter()
            .filter_map(|cid| {
                let connection = self.connection(*cid)?;
                let peer = self.item(connection.receiver)?;
                matches!(peer.kind(), ItemKind::Extent(_))
                    .then(|| (connection.receiver, peer.voxel_position()))
            })
            .collect()
    }

    /// Writes an extent's pose. Only parents call this; extents have no
    /// cascades of their own.
    pub(crate) fn place_extent(&mut self, id: ItemId, position: Point3, facing: Facing) {
        if let Some(item) = self.item_mut(id) {
            item.voxel_position = position;
            item.set_facing(facing);
        }
    }
}

// Owned dispatch tag so cascades can reborrow the chamber mutably.
#[derive(Clone, Copy)]
enum Cascade {
    Barrier,
    BarrierHazard,
    PistonPlatform,
    TrackPlatform,
    Cube,
    CubeDropper,
    Inert,
}

fn cascade_kind(item: &Item) -> Cascade {
    match item.kind() {
        ItemKind::Barrier(_) => Cascade::Barrier,
        ItemKind::BarrierHazard(_) => Cascade::BarrierHazard,
        ItemKind::PistonPlatform(_) => Cascade::PistonPlatform,
        ItemKind::TrackPlatform(_) => Cascade::TrackPlatform,
        ItemKind::Cube(_) => Cascade::Cube,
        ItemKind::CubeDropper(_) => Cascade::CubeDropper,
        _ => Cascade::Inert,
    }
}
