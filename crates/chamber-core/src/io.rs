//! Chamber load/save over the record tree.
//!
//! Loading is all-or-nothing: any malformed record (missing property, bad
//! value, or a connection referencing an unknown item index) aborts the
//! whole load and no chamber is returned.

use std::collections::HashMap;

use chamber_field::VoxelRecord;
use chamber_geom::{Point3, Vec3};
use chamber_tree::{read_tree, write_tree, Entry, Node, Property, TreeError};
use thiserror::Error;

use crate::chamber::{Chamber, ConnectError, ItemId};
use crate::connection::CHANNEL_STANDARD;
use crate::item::{
    angled_panel, barrier, barrier_hazard, button, cube, extent, piston, track, BarrierType,
    ButtonType, CubeType, ExtendAngle, ExtentType, HazardType, Item, ItemKind, TrackPlatform,
};

pub const APP_ID: i32 = 644;
pub const FORMAT_VERSION: i32 = 12;

const ROOT_KEY: &str = "portal2_puzzle";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("root node {0:?} is not a puzzle")]
    BadRoot(String),

    #[error("app id {found} does not match expected {expected}")]
    AppIdMismatch { found: i32, expected: i32 },

    #[error("format version {found} does not match expected {expected}")]
    VersionMismatch { found: i32, expected: i32 },

    #[error("connection references unknown item index {0}")]
    UnknownItemIndex(i32),

    #[error("connection cannot attach: {0}")]
    Connect(#[from] ConnectError),
}

impl Chamber {
    /// Parses and loads a chamber from its text form.
    pub fn from_text(input: &str) -> Result<Chamber, LoadError> {
        let root = read_tree(input)?;
        Chamber::from_node(&root)
    }

    /// Loads a chamber from a record tree.
    pub fn from_node(root: &Node) -> Result<Chamber, LoadError> {
        if root.key != ROOT_KEY {
            return Err(LoadError::BadRoot(root.key.clone()));
        }

        let app_id = root.require("AppID")?.as_i32()?;
        if app_id != APP_ID {
            return Err(LoadError::AppIdMismatch {
                found: app_id,
                expected: APP_ID,
            });
        }
        let version = root.require("Version")?.as_i32()?;
        if version != FORMAT_VERSION {
            return Err(LoadError::VersionMismatch {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let mut chamber = Chamber::new();
        chamber.file_id = root.require("FileID")?.value.clone();
        chamber.created = root.require("Timestamp_Created")?.as_timestamp()?;
        chamber.modified = root.require("Timestamp_Modified")?.as_timestamp()?;
        chamber.compile_time = root.require("CompileTime")?.as_f64()?;
        chamber.title = root.require("Title")?.value.clone();
        chamber.description = root.require("Description")?.value.clone();
        chamber.preview_dirty = root.require("PreviewDirty")?.as_i32()?;

        let size = root.require("ChamberSize")?.as_point()?;
        chamber.size = size;
        chamber
            .field
            .resize(size.x + 1, size.y + 1, size.z + 1);

        if let Some(voxels) = root.node("Voxels") {
            for voxel_node in voxels.nodes("Voxel") {
                let record = read_voxel(voxel_node)?;
                chamber.field.apply_record(&record);
            }
        }

        let mut by_index: HashMap<i32, ItemId> = HashMap::new();
        if let Some(items) = root.node("Items") {
            for item_node in items.nodes("Item") {
                let (index, item) = read_item(item_node)?;
                let id = chamber.add_item(item);
                by_index.insert(index, id);
            }
        }

        if let Some(connections) = root.node("Connections") {
            for connection_node in connections.nodes("Connection") {
                let sender_index = connection_node.require("Sender")?.as_i32()?;
                let receiver_index = connection_node.require("Receiver")?.as_i32()?;
                let channel = &connection_node.require("Type")?.value;

                let sender = *by_index
                    .get(&sender_index)
                    .ok_or(LoadError::UnknownItemIndex(sender_index))?;
                let receiver = *by_index
                    .get(&receiver_index)
                    .ok_or(LoadError::UnknownItemIndex(receiver_index))?;
                chamber.connect(sender, receiver, channel)?;
            }
        }

        log::info!(
            target: "load",
            "loaded chamber {:?}: {} items, {} connections, size {}",
            chamber.title,
            chamber.item_count(),
            chamber.connection_count(),
            chamber.chamber_size()
        );
        Ok(chamber)
    }

    /// Serializes the chamber to its text form.
    pub fn to_text(&self) -> String {
        write_tree(&self.to_node())
    }

    /// Serializes the chamber to a record tree, assigning item indices by
    /// enumeration order.
    pub fn to_node(&self) -> Node {
        let mut root = Node::new(ROOT_KEY);
        root.push_property(Property::int("AppID", APP_ID));
        root.push_property(Property::int("Version", FORMAT_VERSION));
        root.push_property(Property::text("FileID", self.file_id.clone()));
        root.push_property(Property::timestamp("Timestamp_Created", self.created));
        root.push_property(Property::timestamp("Timestamp_Modified", self.modified));
        root.push_property(Property::float("CompileTime", self.compile_time));
        root.push_property(Property::text("Title", self.title.clone()));
        root.push_property(Property::text("Description", self.description.clone()));
        root.push_property(Property::int("PreviewDirty", self.preview_dirty));
        root.push_property(Property::point("ChamberSize", self.chamber_size()));

        let mut voxels = Node::new("Voxels");
        for record in self.field.records() {
            voxels.push_node(voxel_node(&record));
        }
        root.push_node(voxels);

        let by_id: HashMap<ItemId, i32> = self
            .items()
            .enumerate()
            .map(|(index, (id, _))| (id, index as i32))
            .collect();

        if self.item_count() != 0 {
            let mut items = Node::new("Items");
            for (id, item) in self.items() {
                items.push_node(self.item_node(item, by_id[&id]));
            }
            root.push_node(items);
        }

        if self.connection_count() != 0 {
            let mut connections = Node::new("Connections");
            for (_, connection) in self.connections() {
                let (Some(sender), Some(receiver)) = (
                    by_id.get(&connection.sender),
                    by_id.get(&connection.receiver),
                ) else {
                    continue;
                };
                let mut node = Node::new("Connection");
                node.push_property(Property::int("Sender", *sender));
                node.push_property(Property::int("Receiver", *receiver));
                node.push_property(Property::text("Type", connection.channel.clone()));
                connections.push_node(node);
            }
            root.push_node(connections);
        }

        root
    }

    fn item_node(&self, item: &Item, index: i32) -> Node {
        let mut node = Node::new("Item");
        node.push_property(Property::int("Index", index));
        node.push_property(Property::text("Type", item.type_name.clone()));
        node.push_property(Property::bool("Deletable", item.deletable));
        node.push_property(Property::point("VoxelPos", item.voxel_position));
        node.push_property(Property::vec3("LocalPos", item.local_offset));
        node.push_property(Property::point("Angles", angles_to_file(item.angles)));
        node.push_property(Property::point("Facing", item.facing_raw));

        self.push_kind_properties(&mut node, item);

        for (key, value) in &item.extra {
            node.push_property(Property::text(key.clone(), value.clone()));
        }
        node
    }

    fn push_kind_properties(&self, node: &mut Node, item: &Item) {
        match &item.kind {
            ItemKind::Button(b) => {
                node.push_property(Property::int(
                    "ITEM_PROPERTY_BUTTON_TYPE",
                    b.button_type.as_i32(),
                ));
            }
            ItemKind::AngledPanel(panel) => {
                node.push_property(connection_count(item));
                node.push_property(Property::int(
                    "ITEM_PROPERTY_ANGLED_PANEL_TYPE",
                    panel.extend_angle.as_i32(),
                ));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_START_DEPLOYED",
                    panel.start_deployed,
                ));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_PORTALABLE",
                    self.field.is_portalable(item.voxel_position, item.wall()),
                ));
                node.push_property(Property::text(
                    "ITEM_PROPERTY_ANGLED_PANEL_ANIMATION",
                    panel.extend_angle.animation(),
                ));
            }
            ItemKind::Cube(props) => {
                node.push_property(Property::int(
                    "ITEM_PROPERTY_CUBE_TYPE",
                    props.cube_type.as_i32(),
                ));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_DROPPER_ENABLED",
                    props.dropper_visible,
                ));
                node.push_property(Property::bool("ITEM_PROPERTY_AUTO_DROP_CUBE", props.auto_drop));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_AUTO_RESPAWN_CUBE",
                    props.auto_respawn,
                ));
            }
            ItemKind::CubeDropper(props) => {
                node.push_property(Property::int(
                    "ITEM_PROPERTY_CUBE_TYPE",
                    props.cube_type.as_i32(),
                ));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_DROPPER_ENABLED",
                    props.dropper_visible,
                ));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_DROPPER_FALL_STRAIGHT_DOWN",
                    true,
                ));
                node.push_property(Property::bool("ITEM_PROPERTY_AUTO_DROP_CUBE", props.auto_drop));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_AUTO_RESPAWN_CUBE",
                    props.auto_respawn,
                ));
                node.push_property(connection_count(item));
            }
            ItemKind::Barrier(b) => {
                node.push_property(Property::int(
                    "ITEM_PROPERTY_BARRIER_TYPE",
                    b.barrier_type.as_i32(),
                ));
            }
            ItemKind::BarrierHazard(hazard) => {
                node.push_property(connection_count(item));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_START_ENABLED",
                    hazard.start_enabled,
                ));
                node.push_property(Property::int(
                    "ITEM_PROPERTY_BARRIER_HAZARD_TYPE",
                    hazard.hazard_type.as_i32(),
                ));
            }
            ItemKind::PistonPlatform(piston) => {
                let unconnected = item
                    .receiver(CHANNEL_STANDARD)
                    .is_none_or(|point| point.connections().is_empty());
                node.push_property(connection_count(item));
                // End handles stay 0 and 1 in every chamber seen so far.
                node.push_property(Property::int("ITEM_PROPERTY_PISTON_LIFT_BOTTOM_LEVEL", 0));
                node.push_property(Property::int("ITEM_PROPERTY_PISTON_LIFT_TOP_LEVEL", 1));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_PISTON_LIFT_START_UP",
                    piston.start_up,
                ));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_PISTON_ALLOW_AUTO_TRIGGER",
                    unconnected,
                ));
            }
            ItemKind::TrackPlatform(track) => {
                node.push_property(connection_count(item));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_RAIL_OSCILLATE",
                    track.rail_oscillate,
                ));
                node.push_property(Property::int("ITEM_PROPERTY_RAIL_STARTING_POSITION", 0));
                node.push_property(Property::int("ITEM_PROPERTY_RAIL_TRAVEL_DISTANCE", 0));
                node.push_property(Property::int("ITEM_PROPERTY_RAIL_SPEED", 100));
                node.push_property(Property::int(
                    "ITEM_PROPERTY_RAIL_TRAVEL_DIRECTION",
                    rail_travel_direction(track),
                ));
                node.push_property(Property::bool(
                    "ITEM_PROPERTY_RAIL_START_ACTIVE",
                    track.start_active,
                ));
            }
            ItemKind::Extent(e) => {
                if e.extent_type == ExtentType::PistonPlatform {
                    node.push_property(Property::int("EndHandle", e.end_handle));
                }
            }
            ItemKind::Other => {}
        }
    }
}

fn rail_travel_direction(track: &TrackPlatform) -> i32 {
    if track.forward_offset == 0 && track.back_offset == 0 {
        1
    } else {
        0
    }
}

fn connection_count(item: &Item) -> Property {
    let count = item
        .receiver(CHANNEL_STANDARD)
        .map(|point| point.connections().len())
        .unwrap_or(0);
    Property::int("ITEM_PROPERTY_CONNECTION_COUNT", count as i32)
}

fn voxel_node(record: &VoxelRecord) -> Node {
    let mut node = Node::new("Voxel");
    node.push_property(Property::point("Position", record.position));
    node.push_property(Property::bool("Solid", record.solid));
    node.push_property(Property::bool("Portal0", record.portal_neg_x));
    node.push_property(Property::bool("Portal1", record.portal_neg_y));
    node.push_property(Property::bool("Portal2", record.portal_neg_z));
    node
}

fn read_voxel(node: &Node) -> Result<VoxelRecord, LoadError> {
    Ok(VoxelRecord {
        position: node.require("Position")?.as_point()?,
        solid: node.require("Solid")?.as_bool(),
        portal_neg_x: node.require("Portal0")?.as_bool(),
        portal_neg_y: node.require("Portal1")?.as_bool(),
        portal_neg_z: node.require("Portal2")?.as_bool(),
    })
}

fn item_for_type(type_name: &str) -> Item {
    if let Some(extent_type) = ExtentType::from_type_name(type_name) {
        return extent::new_item(extent_type);
    }
    match type_name {
        button::TYPE_NAME => button::new_item(),
        angled_panel::TYPE_NAME => angled_panel::new_item(false),
        angled_panel::TYPE_NAME_GLASS => angled_panel::new_item(true),
        cube::TYPE_NAME => cube::new_cube_item(),
        cube::DROPPER_TYPE_NAME => cube::new_dropper_item(),
        barrier::TYPE_NAME => barrier::new_item(),
        barrier_hazard::TYPE_NAME => barrier_hazard::new_item(),
        piston::TYPE_NAME => piston::new_item(),
        track::TYPE_NAME => track::new_item(),
        other => Item::base(other, ItemKind::Other),
    }
}

fn read_item(node: &Node) -> Result<(i32, Item), LoadError> {
    let type_name = &node.require("Type")?.value;
    let mut item = item_for_type(type_name);
    let mut index = 0;

    for entry in &node.entries {
        let Entry::Property(property) = entry else {
            continue;
        };
        match property.key.as_str() {
            "Index" => index = property.as_i32()?,
            "Type" => {}
            "Deletable" => item.deletable = property.as_bool(),
            "VoxelPos" => item.voxel_position = property.as_point()?,
            "LocalPos" => item.local_offset = property.as_vec3()?,
            "Angles" => item.angles = angles_from_file(property.as_point()?),
            "Facing" => item.facing_raw = property.as_point()?,
            _ => read_kind_property(&mut item, property)?,
        }
    }

    finish_read(&mut item);
    Ok((index, item))
}

fn read_kind_property(item: &mut Item, property: &Property) -> Result<(), LoadError> {
    match &mut item.kind {
        ItemKind::Button(b) => {
            if property.key == "ITEM_PROPERTY_BUTTON_TYPE" {
                b.button_type = ButtonType::from_i32(property.as_i32()?);
            }
        }
        ItemKind::AngledPanel(panel) => match property.key.as_str() {
            "ITEM_PROPERTY_ANGLED_PANEL_TYPE" => {
                panel.extend_angle = ExtendAngle::from_i32(property.as_i32()?);
            }
            "ITEM_PROPERTY_START_DEPLOYED" => panel.start_deployed = property.as_bool(),
            _ => {}
        },
        ItemKind::Cube(props) | ItemKind::CubeDropper(props) => match property.key.as_str() {
            "ITEM_PROPERTY_CUBE_TYPE" => props.cube_type = CubeType::from_i32(property.as_i32()?),
            "ITEM_PROPERTY_DROPPER_ENABLED" => props.dropper_visible = property.as_bool(),
            "ITEM_PROPERTY_AUTO_DROP_CUBE" => props.auto_drop = property.as_bool(),
            "ITEM_PROPERTY_AUTO_RESPAWN_CUBE" => props.auto_respawn = property.as_bool(),
            _ => {}
        },
        ItemKind::Barrier(b) => {
            if property.key == "ITEM_PROPERTY_BARRIER_TYPE" {
                b.barrier_type = BarrierType::from_i32(property.as_i32()?);
            }
        }
        ItemKind::BarrierHazard(hazard) => match property.key.as_str() {
            "ITEM_PROPERTY_BARRIER_HAZARD_TYPE" => {
                hazard.hazard_type = HazardType::from_i32(property.as_i32()?);
            }
            "ITEM_PROPERTY_START_ENABLED" => hazard.start_enabled = property.as_bool(),
            _ => {}
        },
        ItemKind::PistonPlatform(piston) => {
            if property.key == "ITEM_PROPERTY_PISTON_LIFT_START_UP" {
                piston.start_up = property.as_bool();
            }
        }
        ItemKind::TrackPlatform(track) => match property.key.as_str() {
            "ITEM_PROPERTY_RAIL_OSCILLATE" => track.rail_oscillate = property.as_bool(),
            "ITEM_PROPERTY_RAIL_START_ACTIVE" => track.start_active = property.as_bool(),
            _ => {}
        },
        ItemKind::Extent(e) => {
            if property.key == "EndHandle" {
                e.end_handle = property.as_i32()?;
            }
        }
        ItemKind::Other => {
            item.extra
                .push((property.key.clone(), property.value.clone()));
        }
    }
    Ok(())
}

/// Rebuilds cached orientation state once every property is in.
fn finish_read(item: &mut Item) {
    let facing = item.facing();
    let offset = item.local_offset;
    match &mut item.kind {
        ItemKind::AngledPanel(panel) => {
            panel.normal = facing.normal();
            panel.right = facing.right();
        }
        ItemKind::Barrier(b) => {
            b.normal = facing.normal();
            b.right = facing.right();
        }
        ItemKind::BarrierHazard(hazard) => {
            hazard.normal = facing.normal();
            hazard.right = facing.right();
            hazard.is_offset = offset != Vec3::ZERO;
        }
        _ => {}
    }
}

/// Angles persist in Y, Z, X axis order; internally they are X, Y, Z.
fn angles_to_file(angles: Point3) -> Point3 {
    Point3::new(angles.y, angles.z, angles.x)
}

fn angles_from_file(stored: Point3) -> Point3 {
    Point3::new(stored.z, stored.x, stored.y)
}
