//! End-to-end: pointer events → gesture classification → reorder
//! controller → file store, then a fresh dashboard on the same file.

use std::time::{Duration, Instant};

use hearth_core::event::{Event, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use hearth_core::geometry::Position;
use hearth_dashboard::app::Dashboard;
use hearth_sortable::{FileStore, shared};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 40;
const HOLD: Duration = Duration::from_millis(400);
const SHORT: Duration = Duration::from_millis(80);

fn mouse(kind: MouseEventKind, pos: Position) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        x: pos.x,
        y: pos.y,
        modifiers: Modifiers::NONE,
    })
}

fn item_center(d: &Dashboard, id: &str) -> Position {
    let area = d.layout().region_of(id).expect("item not laid out").area;
    Position::new(area.x + area.width / 2, area.y + area.height / 2)
}

/// Long-press `source`, drag onto `target`, release.
fn drag_item(d: &mut Dashboard, source: &str, target: &str, t: Instant) {
    d.relayout(WIDTH, HEIGHT);
    let from = item_center(d, source);
    let to = item_center(d, target);
    d.handle(&mouse(MouseEventKind::Down(MouseButton::Left), from), t);
    d.handle(&Event::Tick, t + HOLD);
    d.handle(&mouse(MouseEventKind::Drag(MouseButton::Left), to), t + HOLD + SHORT);
    d.handle(
        &mouse(MouseEventKind::Up(MouseButton::Left), to),
        t + HOLD + SHORT + SHORT,
    );
}

/// Short-press an item.
fn tap_item(d: &mut Dashboard, id: &str, t: Instant) {
    d.relayout(WIDTH, HEIGHT);
    let pos = item_center(d, id);
    d.handle(&mouse(MouseEventKind::Down(MouseButton::Left), pos), t);
    d.handle(&mouse(MouseEventKind::Up(MouseButton::Left), pos), t + SHORT);
}

#[test]
fn reorders_and_toggles_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let mut d = Dashboard::new(shared(FileStore::open(&path)));
        d.relayout(WIDTH, HEIGHT);
        let t = Instant::now();

        drag_item(&mut d, "智能空调", "安防系统", t);
        tap_item(&mut d, "客厅灯光", t + Duration::from_secs(2));
        drag_item(&mut d, "睡眠模式", "回家模式", t + Duration::from_secs(4));

        assert_eq!(
            d.devices().order(),
            ["客厅灯光", "智能窗帘", "安防系统", "智能空调", "新风系统", "地暖控制"]
        );
        assert_eq!(
            d.scenes().order(),
            ["睡眠模式", "回家模式", "离家模式", "影院模式", "会客模式"]
        );
    }

    // Fresh process, same file.
    let d = Dashboard::new(shared(FileStore::open(&path)));
    assert_eq!(
        d.devices().order(),
        ["客厅灯光", "智能窗帘", "安防系统", "智能空调", "新风系统", "地暖控制"]
    );
    assert_eq!(d.devices().get("客厅灯光").and_then(|i| i.state), Some(true));
    assert_eq!(
        d.scenes().order(),
        ["睡眠模式", "回家模式", "离家模式", "影院模式", "会客模式"]
    );
    // Untouched section keeps canonical order.
    assert_eq!(d.rooms().order(), ["客厅", "主卧室", "厨房", "书房"]);
}

#[test]
fn stale_persisted_ids_are_dropped_on_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    // Persist an order, then hand-edit the file to reference a device that
    // no longer exists and to drop one that does.
    {
        let mut d = Dashboard::new(shared(FileStore::open(&path)));
        d.relayout(WIDTH, HEIGHT);
        drag_item(&mut d, "地暖控制", "智能空调", Instant::now());
    }
    let text = std::fs::read_to_string(&path).unwrap();
    let text = text.replace("新风系统", "拆除设备");
    std::fs::write(&path, text).unwrap();

    let d = Dashboard::new(shared(FileStore::open(&path)));
    let order = d.devices().order();
    // The unknown id is gone, the no-longer-listed device is appended.
    assert!(!order.contains(&"拆除设备".to_owned()));
    assert_eq!(order.first().map(String::as_str), Some("地暖控制"));
    assert!(order.contains(&"新风系统".to_owned()));
    assert_eq!(order.len(), 6);
}

#[test]
fn corrupt_state_file_degrades_to_canonical_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, b"\x00\x01 not even close to json").unwrap();

    let d = Dashboard::new(shared(FileStore::open(&path)));
    assert_eq!(
        d.devices().order(),
        ["智能空调", "客厅灯光", "智能窗帘", "安防系统", "新风系统", "地暖控制"]
    );
}
