#![forbid(unsafe_code)]

//! Canonical seed data for the three dashboard sections.
//!
//! The host application owns item *membership*; the user owns item *order*.
//! These lists are the membership side: what exists, in default order, with
//! default device states. Saved orders are reconciled against them at
//! startup, so editing these lists (adding a device, retiring a room) does
//! the right thing without migration code.

use hearth_sortable::Item;

/// Collection key for the room tiles.
pub const ROOMS_KEY: &str = "rooms";
/// Collection key for the quick-control devices.
pub const DEVICES_KEY: &str = "devices";
/// Collection key for the scene list.
pub const SCENES_KEY: &str = "scenes";

/// Room tile payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    /// Cover image path (kept from the host asset catalog).
    pub image: &'static str,
    /// Whether this is the currently selected room.
    pub active: bool,
}

/// Quick-control device payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Glyph shown before the device name.
    pub icon: &'static str,
}

/// Scene payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneInfo {
    /// Glyph shown before the scene name.
    pub icon: &'static str,
}

/// The rooms, default order.
#[must_use]
pub fn canonical_rooms() -> Vec<Item<RoomInfo>> {
    vec![
        Item::new(
            "客厅",
            RoomInfo {
                image: "images/living_room.jpg",
                active: true,
            },
        ),
        Item::new(
            "主卧室",
            RoomInfo {
                image: "images/bedroom.jpg",
                active: false,
            },
        ),
        Item::new(
            "厨房",
            RoomInfo {
                image: "images/kitchen.jpg",
                active: false,
            },
        ),
        Item::new(
            "书房",
            RoomInfo {
                image: "images/study.jpg",
                active: false,
            },
        ),
    ]
}

/// The quick-control devices, default order and default states.
#[must_use]
pub fn canonical_devices() -> Vec<Item<DeviceInfo>> {
    vec![
        Item::toggleable("智能空调", DeviceInfo { icon: "❄" }, true),
        Item::toggleable("客厅灯光", DeviceInfo { icon: "✦" }, false),
        Item::toggleable("智能窗帘", DeviceInfo { icon: "≋" }, true),
        Item::toggleable("安防系统", DeviceInfo { icon: "⛨" }, true),
        Item::toggleable("新风系统", DeviceInfo { icon: "≈" }, false),
        Item::toggleable("地暖控制", DeviceInfo { icon: "♨" }, true),
    ]
}

/// The scenes, default order. Scenes carry no toggle state.
#[must_use]
pub fn canonical_scenes() -> Vec<Item<SceneInfo>> {
    vec![
        Item::new("回家模式", SceneInfo { icon: "⌂" }),
        Item::new("离家模式", SceneInfo { icon: "➜" }),
        Item::new("睡眠模式", SceneInfo { icon: "☾" }),
        Item::new("影院模式", SceneInfo { icon: "▣" }),
        Item::new("会客模式", SceneInfo { icon: "✧" }),
    ]
}
