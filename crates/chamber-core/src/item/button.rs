//! Floor buttons: the basic logic sender.

use chamber_geom::Direction;

use crate::chamber::{Chamber, ItemId};
use crate::connection::{Cardinality, SenderPoint};
use crate::item::{wall_frame, Item, ItemKind};

pub const TYPE_NAME: &str = "ITEM_BUTTON_FLOOR";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonType {
    #[default]
    Standard,
    Cube,
    Sphere,
}

impl ButtonType {
    pub(crate) fn from_i32(value: i32) -> ButtonType {
        match value {
            1 => ButtonType::Cube,
            2 => ButtonType::Sphere,
            _ => ButtonType::Standard,
        }
    }

    pub(crate) fn as_i32(self) -> i32 {
        match self {
            ButtonType::Standard => 0,
            ButtonType::Cube => 1,
            ButtonType::Sphere => 2,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Button {
    pub button_type: ButtonType,
}

pub fn new_item() -> Item {
    let mut item = Item::base(TYPE_NAME, ItemKind::Button(Button::default()));
    item.deletable = true;
    item.default_right = Direction::PosX;
    item.sender = Some(SenderPoint::new(Cardinality::Multi));
    // A floor button until the wall is changed.
    item.set_facing(wall_frame(Direction::NegZ));
    item
}

impl Chamber {
    pub fn add_button(&mut self) -> ItemId {
        self.add_item(new_item())
    }

    /// Puts the button on `wall`.
    pub fn set_button_wall(&mut self, id: ItemId, wall: Direction) {
        let Some(item) = self.item_mut(id) else { return };
        if matches!(item.kind(), ItemKind::Button(_)) {
            item.set_facing(wall_frame(wall));
        }
    }
}
