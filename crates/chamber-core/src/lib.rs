//! The puzzle chamber data model: items, typed connections between them,
//! composite-item role inference, and load/save over the record tree.
#![forbid(unsafe_code)]

mod chamber;
mod connection;
mod io;
pub mod item;

pub use chamber::{Chamber, ConnectError, ConnectionId, ItemId};
pub use connection::{
    Cardinality, Connection, ReceiverPoint, SenderPoint, CHANNEL_BOX_DROPPER,
    CHANNEL_EXTENT_ANCHOR, CHANNEL_STANDARD,
};
pub use io::{LoadError, APP_ID, FORMAT_VERSION};
pub use item::{Item, ItemKind};
