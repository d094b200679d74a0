//! Angled panels: wall-mounted ramps driven over the standard channel.

use chamber_geom::{Direction, Facing};

use crate::chamber::{Chamber, ItemId};
use crate::connection::{Cardinality, ReceiverPoint, CHANNEL_STANDARD};
use crate::item::{Item, ItemKind};

pub const TYPE_NAME: &str = "ITEM_PANEL_ANGLED";
pub const TYPE_NAME_GLASS: &str = "ITEM_PANEL_CLEAR";

/// How far the panel swings open when deployed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtendAngle {
    Angle90,
    Angle60,
    #[default]
    Angle45,
    Angle30,
}

impl ExtendAngle {
    pub(crate) fn from_i32(value: i32) -> ExtendAngle {
        match value {
            0 => ExtendAngle::Angle90,
            1 => ExtendAngle::Angle60,
            3 => ExtendAngle::Angle30,
            _ => ExtendAngle::Angle45,
        }
    }

    pub(crate) fn as_i32(self) -> i32 {
        match self {
            ExtendAngle::Angle90 => 0,
            ExtendAngle::Angle60 => 1,
            ExtendAngle::Angle45 => 2,
            ExtendAngle::Angle30 => 3,
        }
    }

    pub(crate) fn animation(self) -> &'static str {
        match self {
            ExtendAngle::Angle90 => "ramp_90_deg_open",
            ExtendAngle::Angle60 => "ramp_60_deg_open",
            ExtendAngle::Angle45 => "ramp_45_deg_open",
            ExtendAngle::Angle30 => "ramp_30_deg_open",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AngledPanel {
    pub extend_angle: ExtendAngle,
    pub start_deployed: bool,
    pub(crate) normal: Direction,
    pub(crate) right: Direction,
}

impl Default for AngledPanel {
    fn default() -> Self {
        AngledPanel {
            extend_angle: ExtendAngle::Angle45,
            start_deployed: false,
            normal: Direction::NegX,
            right: Direction::NegX,
        }
    }
}

pub fn new_item(is_glass: bool) -> Item {
    let type_name = if is_glass { TYPE_NAME_GLASS } else { TYPE_NAME };
    let mut item = Item::base(type_name, ItemKind::AngledPanel(AngledPanel::default()));
    item.deletable = true;
    item.default_right = Direction::PosX;
    item.receivers
        .push(ReceiverPoint::new(CHANNEL_STANDARD, Cardinality::Multi));
    item
}

fn state_mut(chamber: &mut Chamber, id: ItemId) -> Option<&mut AngledPanel> {
    match chamber.item_mut(id)?.kind_mut() {
        ItemKind::AngledPanel(panel) => Some(panel),
        _ => None,
    }
}

impl Chamber {
    pub fn add_angled_panel(&mut self) -> ItemId {
        self.add_item(new_item(false))
    }

    pub fn add_glass_panel(&mut self) -> ItemId {
        self.add_item(new_item(true))
    }

    /// Puts the panel on `wall`, keeping its extend direction when possible.
    pub fn set_panel_wall(&mut self, id: ItemId, wall: Direction) {
        let Some(panel) = state_mut(self, id) else { return };
        panel.normal = wall.opposite();
        let (normal, right) = (panel.normal, panel.right);
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
        }
    }

    /// Sets the direction the panel extends toward when deployed.
    pub fn set_panel_extend_direction(&mut self, id: ItemId, direction: Direction) {
        let Some(panel) = state_mut(self, id) else { return };
        panel.right = direction.opposite();
        let (normal, right) = (panel.normal, panel.right);
        if let Ok(facing) = Facing::new(normal, right) {
            if let Some(item) = self.item_mut(id) {
                item.set_facing(facing);
            }
        }
    }

    /// Whether the wall face under the panel is portalable.
    pub fn panel_is_portalable(&self, id: ItemId) -> Option<bool> {
        let item = self.item(id)?;
        if !matches!(item.kind(), ItemKind::AngledPanel(_)) {
            return None;
        }
        Some(self.field().is_portalable(item.voxel_position(), item.wall()))
    }

    /// Marks the wall face under the panel portalable or not.
    pub fn set_panel_portalable(&mut self, id: ItemId, portalable: bool) {
        let Some(item) = self.item(id) else { return };
        if !matches!(item.kind(), ItemKind::AngledPanel(_)) {
            return;
        }
        let (position, wall) = (item.voxel_position(), item.wall());
        self.field_mut().set_portalable(position, wall, portalable);
    }
}
