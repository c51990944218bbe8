#![forbid(unsafe_code)]

//! Dashboard model: three reorderable sections and the pointer glue
//! between them.
//!
//! The model owns one [`ReorderController`] and one [`GestureDisambiguator`]
//! per section. Raw mouse events are routed to the section where the press
//! began (pointer capture: once a press opens a session, motion and release
//! stay with that section until the session ends). Gesture events come back
//! out and turn into controller calls:
//!
//! - `Tap` on a device toggles it; on a scene it activates it.
//! - `DragStart`/`DragMove` track a candidate drop target for rendering.
//! - `DragEnd` over a sibling item issues the identity-keyed move; a drop
//!   outside any target is a no-op.
//!
//! The device switch hit-boxes are registered as opaque regions with the
//! devices disambiguator, so a press there never opens a gesture session —
//! the switch owns that interaction and toggles on release.

use std::time::{Duration, Instant};

use hearth_core::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use hearth_core::geometry::{Position, Rect};
use hearth_core::gesture::{GestureConfig, GestureDisambiguator, GestureEvent};
use hearth_sortable::{CollectionObserver, ReorderController, SharedStore};

use crate::data::{
    self, DEVICES_KEY, DeviceInfo, ROOMS_KEY, RoomInfo, SCENES_KEY, SceneInfo,
};

/// One dashboard section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Rooms,
    Devices,
    Scenes,
}

/// Screen area occupied by one item, as computed by the last layout pass.
#[derive(Debug, Clone)]
pub struct ItemRegion {
    pub section: Section,
    pub id: String,
    pub area: Rect,
    /// The nested switch hit-box, for items that have one.
    pub toggle: Option<Rect>,
}

/// All item regions from the last layout pass; the hit-testing surface.
#[derive(Debug, Default)]
pub struct LayoutMap {
    pub regions: Vec<ItemRegion>,
}

impl LayoutMap {
    /// The item under `pos`, if any.
    #[must_use]
    pub fn item_at(&self, pos: Position) -> Option<&ItemRegion> {
        self.regions.iter().find(|r| r.area.contains_pos(pos))
    }

    /// The item whose *switch* is under `pos`, if any.
    #[must_use]
    pub fn toggle_at(&self, pos: Position) -> Option<&ItemRegion> {
        self.regions
            .iter()
            .find(|r| r.toggle.is_some_and(|t| t.contains_pos(pos)))
    }

    /// The region of a specific item id.
    #[must_use]
    pub fn region_of(&self, id: &str) -> Option<&ItemRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    fn toggle_rects(&self) -> Vec<Rect> {
        self.regions.iter().filter_map(|r| r.toggle).collect()
    }
}

/// A drag in progress, for rendering.
#[derive(Debug, Clone)]
pub struct DragView {
    pub section: Section,
    pub source_id: String,
    /// Candidate drop target under the pointer, if any.
    pub over_id: Option<String>,
    pub current: Position,
}

/// Logs every durable change. The dashboard re-reads controller state when
/// it redraws, so logging is all the subscription needs to do here.
struct ChangeLogger;

impl CollectionObserver for ChangeLogger {
    fn order_changed(&mut self, key: &str, order: &[String]) {
        tracing::info!(key, ?order, "order changed");
    }

    fn state_changed(&mut self, key: &str, id: &str, on: bool) {
        tracing::info!(key, id, on, "state changed");
    }
}

/// The dashboard model.
pub struct Dashboard {
    rooms: ReorderController<RoomInfo>,
    devices: ReorderController<DeviceInfo>,
    scenes: ReorderController<SceneInfo>,
    rooms_gesture: GestureDisambiguator,
    devices_gesture: GestureDisambiguator,
    scenes_gesture: GestureDisambiguator,
    layout: LayoutMap,
    /// Section and item where the current press began.
    press: Option<(Section, String)>,
    /// Device whose switch was pressed; toggles on release over the switch.
    pending_toggle: Option<String>,
    drag: Option<DragView>,
    hovered_room: Option<String>,
    should_quit: bool,
    dirty: bool,
}

impl Dashboard {
    /// Build the dashboard on top of a shared order store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        let rooms = ReorderController::new(ROOMS_KEY, data::canonical_rooms(), store.clone())
            .with_observer(Box::new(ChangeLogger));
        let devices = ReorderController::new(DEVICES_KEY, data::canonical_devices(), store.clone())
            .with_observer(Box::new(ChangeLogger));
        let scenes = ReorderController::new(SCENES_KEY, data::canonical_scenes(), store)
            .with_observer(Box::new(ChangeLogger));

        Self {
            rooms,
            devices,
            scenes,
            // Room tiles drag as soon as they are pressed; devices and
            // scenes require the long-press (or a decisive movement).
            rooms_gesture: GestureDisambiguator::new(GestureConfig {
                hold_threshold: Duration::ZERO,
                move_tolerance: 2,
            }),
            devices_gesture: GestureDisambiguator::new(GestureConfig::default()),
            scenes_gesture: GestureDisambiguator::new(GestureConfig::default()),
            layout: LayoutMap::default(),
            press: None,
            pending_toggle: None,
            drag: None,
            hovered_room: None,
            should_quit: false,
            dirty: true,
        }
    }

    pub fn rooms(&self) -> &ReorderController<RoomInfo> {
        &self.rooms
    }

    pub fn devices(&self) -> &ReorderController<DeviceInfo> {
        &self.devices
    }

    pub fn scenes(&self) -> &ReorderController<SceneInfo> {
        &self.scenes
    }

    /// The drag in progress, if any.
    #[must_use]
    pub fn drag(&self) -> Option<&DragView> {
        self.drag.as_ref()
    }

    /// The hovered room tile, if any.
    #[must_use]
    pub fn hovered_room(&self) -> Option<&str> {
        self.hovered_room.as_deref()
    }

    /// The hit-testing surface from the last layout pass.
    #[must_use]
    pub fn layout(&self) -> &LayoutMap {
        &self.layout
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether a redraw is due; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Recompute item regions for the given terminal size and refresh the
    /// opaque switch hit-boxes.
    pub fn relayout(&mut self, width: u16, height: u16) {
        self.layout = crate::ui::layout(self, width, height);
        self.devices_gesture
            .set_opaque_regions(self.layout.toggle_rects());
    }

    /// Feed one canonical event into the model.
    pub fn handle(&mut self, event: &Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse, now),
            Event::Resize { .. } => self.dirty = true,
            Event::Focus(false) => self.abandon_gestures(),
            Event::Tick => self.handle_tick(now),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.is_char('q') || (key.ctrl() && key.is_char('c')) {
            self.should_quit = true;
        } else if key.code == hearth_core::event::KeyCode::Escape {
            self.abandon_gestures();
        }
    }

    fn handle_tick(&mut self, now: Instant) {
        for section in [Section::Rooms, Section::Devices, Section::Scenes] {
            if let Some(event) = self.gesture_mut(section).poll(now) {
                self.dispatch(section, event);
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let pos = Position::new(mouse.x, mouse.y);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(region) = self.layout.toggle_at(pos) {
                    // The switch owns this press. The gesture layer is
                    // still offered the press so the opaque-region
                    // suppression is exercised, not bypassed.
                    self.pending_toggle = Some(region.id.clone());
                    self.devices_gesture.press(pos, now);
                } else if let Some(region) = self.layout.item_at(pos) {
                    let section = region.section;
                    let id = region.id.clone();
                    self.press = Some((section, id));
                    self.gesture_mut(section).press(pos, now);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(section) = self.press_section() {
                    if let Some(event) = self.gesture_mut(section).motion(pos, now) {
                        self.dispatch(section, event);
                    }
                }
            }
            MouseEventKind::Moved => {
                let hovered = self
                    .layout
                    .item_at(pos)
                    .filter(|r| r.section == Section::Rooms)
                    .map(|r| r.id.clone());
                if hovered != self.hovered_room {
                    self.hovered_room = hovered;
                    self.dirty = true;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(id) = self.pending_toggle.take()
                    && self.layout.toggle_at(pos).is_some_and(|r| r.id == id)
                {
                    self.devices.toggle_item(&id);
                    self.dirty = true;
                }
                if let Some(section) = self.press_section() {
                    if let Some(event) = self.gesture_mut(section).release(pos, now) {
                        self.dispatch(section, event);
                    }
                    self.press = None;
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, section: Section, event: GestureEvent) {
        match event {
            GestureEvent::Tap { .. } => {
                let Some((_, id)) = self.press.clone() else {
                    return;
                };
                match section {
                    Section::Devices => {
                        self.devices.toggle_item(&id);
                        self.dirty = true;
                    }
                    Section::Scenes => {
                        tracing::info!(scene = %id, "scene activated");
                    }
                    Section::Rooms => {}
                }
            }
            GestureEvent::DragStart { pos } => {
                if let Some((_, id)) = &self.press {
                    self.drag = Some(DragView {
                        section,
                        source_id: id.clone(),
                        over_id: None,
                        current: pos,
                    });
                    self.dirty = true;
                }
            }
            GestureEvent::DragMove { current, .. } => {
                if let Some(drag) = &mut self.drag {
                    drag.current = current;
                    drag.over_id = self
                        .layout
                        .regions
                        .iter()
                        .find(|r| r.area.contains_pos(current))
                        .filter(|r| r.section == section && r.id != drag.source_id)
                        .map(|r| r.id.clone());
                    self.dirty = true;
                }
            }
            GestureEvent::DragEnd { end, .. } => {
                if let Some(drag) = self.drag.take() {
                    let target = self
                        .layout
                        .item_at(end)
                        .filter(|r| r.section == drag.section && r.id != drag.source_id)
                        .map(|r| r.id.clone());
                    match target {
                        Some(target_id) => {
                            self.move_in(drag.section, &drag.source_id, &target_id);
                        }
                        None => {
                            tracing::debug!(source = %drag.source_id, "dropped outside any target");
                        }
                    }
                    self.dirty = true;
                }
            }
            GestureEvent::DragCancel => {
                if self.drag.take().is_some() {
                    self.dirty = true;
                }
            }
        }
    }

    fn move_in(&mut self, section: Section, source_id: &str, target_id: &str) {
        match section {
            Section::Rooms => {
                self.rooms.move_item(source_id, target_id);
            }
            Section::Devices => {
                self.devices.move_item(source_id, target_id);
            }
            Section::Scenes => {
                self.scenes.move_item(source_id, target_id);
            }
        }
    }

    fn press_section(&self) -> Option<Section> {
        self.press.as_ref().map(|(section, _)| *section)
    }

    fn gesture_mut(&mut self, section: Section) -> &mut GestureDisambiguator {
        match section {
            Section::Rooms => &mut self.rooms_gesture,
            Section::Devices => &mut self.devices_gesture,
            Section::Scenes => &mut self.scenes_gesture,
        }
    }

    fn abandon_gestures(&mut self) {
        for section in [Section::Rooms, Section::Devices, Section::Scenes] {
            self.gesture_mut(section).cancel();
        }
        self.press = None;
        self.pending_toggle = None;
        if self.drag.take().is_some() {
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::event::Modifiers;
    use hearth_sortable::{MemoryStore, shared};

    const WIDTH: u16 = 80;
    const HEIGHT: u16 = 40;

    fn dashboard() -> Dashboard {
        let mut d = Dashboard::new(shared(MemoryStore::new()));
        d.relayout(WIDTH, HEIGHT);
        d
    }

    fn mouse(kind: MouseEventKind, pos: Position) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            x: pos.x,
            y: pos.y,
            modifiers: Modifiers::NONE,
        })
    }

    fn down(pos: Position) -> Event {
        mouse(MouseEventKind::Down(MouseButton::Left), pos)
    }

    fn up(pos: Position) -> Event {
        mouse(MouseEventKind::Up(MouseButton::Left), pos)
    }

    fn drag_to(pos: Position) -> Event {
        mouse(MouseEventKind::Drag(MouseButton::Left), pos)
    }

    fn center(area: Rect) -> Position {
        Position::new(area.x + area.width / 2, area.y + area.height / 2)
    }

    fn item_center(d: &Dashboard, id: &str) -> Position {
        center(d.layout().region_of(id).unwrap().area)
    }

    fn toggle_center(d: &Dashboard, id: &str) -> Position {
        center(d.layout().region_of(id).unwrap().toggle.unwrap())
    }

    const HOLD: Duration = Duration::from_millis(400);
    const SHORT: Duration = Duration::from_millis(80);

    #[test]
    fn tap_on_device_row_toggles_it() {
        let mut d = dashboard();
        let t = Instant::now();
        let pos = item_center(&d, "客厅灯光");

        d.handle(&down(pos), t);
        d.handle(&up(pos), t + SHORT);

        assert_eq!(
            d.devices().get("客厅灯光").and_then(|i| i.state),
            Some(true)
        );
        assert_eq!(d.devices().order()[1], "客厅灯光"); // order untouched
    }

    #[test]
    fn long_press_then_drop_reorders_devices() {
        let mut d = dashboard();
        let t = Instant::now();
        let source = item_center(&d, "智能空调");
        let target = item_center(&d, "安防系统");

        d.handle(&down(source), t);
        d.handle(&Event::Tick, t + HOLD);
        assert!(d.drag().is_some());

        d.handle(&drag_to(target), t + HOLD + SHORT);
        assert_eq!(d.drag().unwrap().over_id.as_deref(), Some("安防系统"));

        d.handle(&up(target), t + HOLD + SHORT + SHORT);
        assert!(d.drag().is_none());
        assert_eq!(
            d.devices().order(),
            ["客厅灯光", "智能窗帘", "安防系统", "智能空调", "新风系统", "地暖控制"]
        );
    }

    #[test]
    fn short_press_emits_no_drag() {
        let mut d = dashboard();
        let t = Instant::now();
        let pos = item_center(&d, "睡眠模式");

        d.handle(&down(pos), t);
        d.handle(&Event::Tick, t + SHORT);
        assert!(d.drag().is_none());

        d.handle(&up(pos), t + SHORT + SHORT);
        assert!(d.drag().is_none());
    }

    #[test]
    fn movement_past_tolerance_starts_drag_early() {
        let mut d = dashboard();
        let t = Instant::now();
        let source = item_center(&d, "回家模式");

        d.handle(&down(source), t);
        d.handle(
            &drag_to(Position::new(source.x, source.y + 7)),
            t + SHORT,
        );
        assert!(d.drag().is_some());
        assert_eq!(d.drag().unwrap().source_id, "回家模式");
    }

    #[test]
    fn drop_outside_any_target_is_noop() {
        let mut d = dashboard();
        let t = Instant::now();
        let before = d.scenes().order();
        let source = item_center(&d, "影院模式");

        d.handle(&down(source), t);
        d.handle(&Event::Tick, t + HOLD);
        d.handle(&up(Position::new(WIDTH - 1, HEIGHT - 1)), t + HOLD + SHORT);

        assert_eq!(d.scenes().order(), before);
    }

    #[test]
    fn drop_on_other_section_is_noop() {
        let mut d = dashboard();
        let t = Instant::now();
        let before = d.devices().order();
        let source = item_center(&d, "智能空调");
        let foreign = item_center(&d, "回家模式");

        d.handle(&down(source), t);
        d.handle(&Event::Tick, t + HOLD);
        d.handle(&up(foreign), t + HOLD + SHORT);

        assert_eq!(d.devices().order(), before);
        assert_eq!(d.scenes().order()[0], "回家模式");
    }

    #[test]
    fn press_on_switch_toggles_without_drag() {
        let mut d = dashboard();
        let t = Instant::now();
        let pos = toggle_center(&d, "安防系统");

        d.handle(&down(pos), t);
        // Even a long hold on the switch never becomes a drag.
        d.handle(&Event::Tick, t + HOLD);
        assert!(d.drag().is_none());

        d.handle(&up(pos), t + HOLD + SHORT);
        assert_eq!(
            d.devices().get("安防系统").and_then(|i| i.state),
            Some(false)
        );
    }

    #[test]
    fn room_press_drags_without_hold() {
        let mut d = dashboard();
        let t = Instant::now();
        let source = item_center(&d, "客厅");
        let target = item_center(&d, "厨房");

        d.handle(&down(source), t);
        // First tick, no waiting: rooms use a zero hold threshold.
        d.handle(&Event::Tick, t);
        assert!(d.drag().is_some());

        d.handle(&up(target), t + SHORT);
        assert_eq!(d.rooms().order(), ["主卧室", "厨房", "客厅", "书房"]);
    }

    #[test]
    fn escape_cancels_drag() {
        let mut d = dashboard();
        let t = Instant::now();
        let before = d.devices().order();
        let source = item_center(&d, "地暖控制");

        d.handle(&down(source), t);
        d.handle(&Event::Tick, t + HOLD);
        assert!(d.drag().is_some());

        d.handle(
            &Event::Key(KeyEvent::new(hearth_core::event::KeyCode::Escape)),
            t + HOLD + SHORT,
        );
        assert!(d.drag().is_none());

        // The release after the cancel does nothing.
        d.handle(&up(item_center(&d, "智能空调")), t + HOLD + SHORT + SHORT);
        assert_eq!(d.devices().order(), before);
    }

    #[test]
    fn focus_loss_cancels_drag() {
        let mut d = dashboard();
        let t = Instant::now();
        let source = item_center(&d, "回家模式");

        d.handle(&down(source), t);
        d.handle(&Event::Tick, t + HOLD);
        assert!(d.drag().is_some());

        d.handle(&Event::Focus(false), t + HOLD + SHORT);
        assert!(d.drag().is_none());
    }

    #[test]
    fn hover_tracks_room_tiles_only() {
        let mut d = dashboard();
        let t = Instant::now();

        d.handle(&mouse(MouseEventKind::Moved, item_center(&d, "厨房")), t);
        assert_eq!(d.hovered_room(), Some("厨房"));

        d.handle(&mouse(MouseEventKind::Moved, item_center(&d, "智能空调")), t);
        assert_eq!(d.hovered_room(), None);
    }

    #[test]
    fn order_survives_dashboard_restart() {
        let store = shared(MemoryStore::new());
        {
            let mut d = Dashboard::new(store.clone());
            d.relayout(WIDTH, HEIGHT);
            let t = Instant::now();
            let source = item_center(&d, "智能空调");
            let target = item_center(&d, "地暖控制");
            d.handle(&down(source), t);
            d.handle(&Event::Tick, t + HOLD);
            d.handle(&up(target), t + HOLD + SHORT);
        }

        let d = Dashboard::new(store);
        assert_eq!(d.devices().order().last().map(String::as_str), Some("智能空调"));
    }

    #[test]
    fn quit_keys() {
        let mut d = dashboard();
        assert!(!d.should_quit());
        d.handle(&Event::Key(KeyEvent::new(hearth_core::event::KeyCode::Char('q'))), Instant::now());
        assert!(d.should_quit());
    }
}
