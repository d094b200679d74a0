//! Extents: derived boundary markers owned by a composite item. Only the
//! parent composite writes an extent's position and facing.

use chamber_geom::Direction;

use crate::connection::{Cardinality, ReceiverPoint, CHANNEL_EXTENT_ANCHOR};
use crate::item::{Item, ItemKind};

pub const BARRIER_TYPE_NAME: &str = "ITEM_BARRIER_EXTENT";
pub const BARRIER_HAZARD_TYPE_NAME: &str = "ITEM_BARRIER_HAZARD_EXTENT";
pub const PISTON_PLATFORM_TYPE_NAME: &str = "ITEM_PISTON_PLATFORM_EXTENT";
pub const RAIL_PLATFORM_TYPE_NAME: &str = "ITEM_RAIL_PLATFORM_EXTENT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtentType {
    Barrier,
    BarrierHazard,
    PistonPlatform,
    RailPlatform,
}

impl ExtentType {
    pub fn type_name(self) -> &'static str {
        match self {
            ExtentType::Barrier => BARRIER_TYPE_NAME,
            ExtentType::BarrierHazard => BARRIER_HAZARD_TYPE_NAME,
            ExtentType::PistonPlatform => PISTON_PLATFORM_TYPE_NAME,
            ExtentType::RailPlatform => RAIL_PLATFORM_TYPE_NAME,
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<ExtentType> {
        match type_name {
            BARRIER_TYPE_NAME => Some(ExtentType::Barrier),
            BARRIER_HAZARD_TYPE_NAME => Some(ExtentType::BarrierHazard),
            PISTON_PLATFORM_TYPE_NAME => Some(ExtentType::PistonPlatform),
            RAIL_PLATFORM_TYPE_NAME => Some(ExtentType::RailPlatform),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Extent {
    pub extent_type: ExtentType,
    /// Which end of a piston platform this marker is (0 = near, 1 = far).
    /// Meaningless for the other extent types.
    pub end_handle: i32,
}

pub fn new_item(extent_type: ExtentType) -> Item {
    let mut item = Item::base(
        extent_type.type_name(),
        ItemKind::Extent(Extent {
            extent_type,
            end_handle: 0,
        }),
    );
    match extent_type {
        ExtentType::Barrier | ExtentType::BarrierHazard => {
            item.default_normal = Direction::PosX;
            item.default_right = Direction::PosZ;
        }
        ExtentType::PistonPlatform | ExtentType::RailPlatform => {
            item.default_normal = Direction::PosZ;
            item.default_right = Direction::PosY;
        }
    }
    item.receivers
        .push(ReceiverPoint::new(CHANNEL_EXTENT_ANCHOR, Cardinality::Single));
    item
}

pub fn new_piston_item(end_handle: i32) -> Item {
    let mut item = new_item(ExtentType::PistonPlatform);
    if let ItemKind::Extent(extent) = item.kind_mut() {
        extent.end_handle = end_handle;
    }
    item
}
