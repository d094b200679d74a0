//! Connection endpoints and the connections between them.

use crate::chamber::{ConnectionId, ItemId};

/// Channel a logic sender pairs with (buttons driving panels, platforms...).
pub const CHANNEL_STANDARD: &str = "CONNECTION_STANDARD";
/// Channel a composite item uses to anchor its extents.
pub const CHANNEL_EXTENT_ANCHOR: &str = "CONNECTION_BARRIER_ANCHOR_TO_EXTENT";
/// Channel linking a cube to its dropper.
pub const CHANNEL_BOX_DROPPER: &str = "CONNECTION_BOX_DROPPER";

/// How many connections an endpoint holds at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Holds one connection; connecting again displaces the current one.
    Single,
    /// Holds any number of connections, in connect order.
    Multi,
}

/// The sending end of an item. An item owns at most one sender point.
#[derive(Clone, Debug)]
pub struct SenderPoint {
    cardinality: Cardinality,
    connections: Vec<ConnectionId>,
}

impl SenderPoint {
    pub(crate) fn new(cardinality: Cardinality) -> SenderPoint {
        SenderPoint {
            cardinality,
            connections: Vec::new(),
        }
    }

    #[inline]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Member connections in connect order.
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub(crate) fn insert(&mut self, id: ConnectionId) {
        if !self.connections.contains(&id) {
            self.connections.push(id);
        }
    }

    pub(crate) fn remove(&mut self, id: ConnectionId) {
        self.connections.retain(|c| *c != id);
    }
}

/// A receiving end of an item, tagged with the channel it accepts.
#[derive(Clone, Debug)]
pub struct ReceiverPoint {
    channel: String,
    cardinality: Cardinality,
    connections: Vec<ConnectionId>,
}

impl ReceiverPoint {
    pub(crate) fn new(channel: &str, cardinality: Cardinality) -> ReceiverPoint {
        ReceiverPoint {
            channel: channel.to_string(),
            cardinality,
            connections: Vec::new(),
        }
    }

    #[inline]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[inline]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Member connections in connect order.
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub(crate) fn insert(&mut self, id: ConnectionId) {
        if !self.connections.contains(&id) {
            self.connections.push(id);
        }
    }

    pub(crate) fn remove(&mut self, id: ConnectionId) {
        self.connections.retain(|c| *c != id);
    }
}

/// A directed edge from one item's sender point to another item's receiver
/// point. Endpoints are ids into the chamber's item arena, never owned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub sender: ItemId,
    pub receiver: ItemId,
    pub channel: String,
}
