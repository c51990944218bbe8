#![forbid(unsafe_code)]

//! Section layout and crossterm rendering.
//!
//! [`layout`] is the single source of item geometry: the same regions it
//! returns are used for hit testing (via [`Dashboard::layout`]) and for
//! painting, so the pointer can never disagree with the pixels. Rendering
//! positions every fragment with an absolute `MoveTo`, which sidesteps
//! display-width arithmetic for the CJK labels.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use hearth_core::geometry::Rect;

use crate::app::{Dashboard, ItemRegion, LayoutMap, Section};
use crate::theme;

/// Widest the content column gets, however wide the terminal is.
const CONTENT_MAX: u16 = 72;
/// Height of one room tile.
const TILE_HEIGHT: u16 = 3;
/// Width of the switch hit-box at the right edge of a device row.
const TOGGLE_WIDTH: u16 = 8;

/// Vertical origins of the three sections for a given item census.
struct SectionFrame {
    content_w: u16,
    tile_w: u16,
    rooms_title_y: u16,
    rooms_y: u16,
    devices_title_y: u16,
    devices_y: u16,
    scenes_title_y: u16,
    scenes_y: u16,
}

fn frame(d: &Dashboard, width: u16) -> SectionFrame {
    let content_w = width.min(CONTENT_MAX).max(24);
    let tile_w = content_w / 2;

    let rooms_title_y = 2;
    let rooms_y = rooms_title_y + 1;
    let room_rows = (d.rooms().len() as u16).div_ceil(2);

    let devices_title_y = rooms_y + room_rows * TILE_HEIGHT + 1;
    let devices_y = devices_title_y + 1;

    let scenes_title_y = devices_y + d.devices().len() as u16 + 1;
    let scenes_y = scenes_title_y + 1;

    SectionFrame {
        content_w,
        tile_w,
        rooms_title_y,
        rooms_y,
        devices_title_y,
        devices_y,
        scenes_title_y,
        scenes_y,
    }
}

/// Compute the item regions for the given terminal size.
///
/// Rows that would land on or below the footer line are left out of the
/// map: what cannot be seen cannot be pressed.
#[must_use]
pub fn layout(d: &Dashboard, width: u16, height: u16) -> LayoutMap {
    let f = frame(d, width);
    let visible = height.saturating_sub(1);
    let mut regions = Vec::new();

    for (i, item) in d.rooms().items().iter().enumerate() {
        let col = (i % 2) as u16;
        let row = (i / 2) as u16;
        let area = Rect::new(
            col * f.tile_w,
            f.rooms_y + row * TILE_HEIGHT,
            f.tile_w.saturating_sub(1),
            TILE_HEIGHT,
        );
        if area.bottom() > visible {
            continue;
        }
        regions.push(ItemRegion {
            section: Section::Rooms,
            id: item.id.clone(),
            area,
            toggle: None,
        });
    }

    for (i, item) in d.devices().items().iter().enumerate() {
        let y = f.devices_y + i as u16;
        if y >= visible {
            continue;
        }
        let area = Rect::new(0, y, f.content_w, 1);
        let toggle = Rect::new(f.content_w - TOGGLE_WIDTH, y, TOGGLE_WIDTH, 1);
        regions.push(ItemRegion {
            section: Section::Devices,
            id: item.id.clone(),
            area,
            toggle: Some(toggle),
        });
    }

    for (i, item) in d.scenes().items().iter().enumerate() {
        let y = f.scenes_y + i as u16;
        if y >= visible {
            continue;
        }
        regions.push(ItemRegion {
            section: Section::Scenes,
            id: item.id.clone(),
            area: Rect::new(0, y, f.content_w, 1),
            toggle: None,
        });
    }

    LayoutMap { regions }
}

/// Render the dashboard.
pub fn draw(out: &mut impl Write, d: &Dashboard, width: u16, height: u16) -> io::Result<()> {
    let f = frame(d, width);
    queue!(out, Clear(ClearType::All), ResetColor)?;

    // Header.
    queue!(
        out,
        MoveTo(0, 0),
        SetForegroundColor(theme::ACCENT),
        SetAttribute(Attribute::Bold),
        Print("hearth ⌂ 智能家居"),
        SetAttribute(Attribute::Reset),
        ResetColor,
    )?;

    section_title(out, f.rooms_title_y, height, "房间")?;
    section_title(out, f.devices_title_y, height, "快捷控制")?;
    section_title(out, f.scenes_title_y, height, "智能场景")?;

    for region in &d.layout().regions {
        match region.section {
            Section::Rooms => draw_room(out, d, region)?,
            Section::Devices => draw_device(out, d, region)?,
            Section::Scenes => draw_scene(out, d, region)?,
        }
    }

    // Footer hint.
    if height > 1 {
        queue!(
            out,
            MoveTo(0, height - 1),
            SetForegroundColor(theme::MUTED),
            Print("长按拖动排序 · 点按切换开关 · q 退出"),
            ResetColor,
        )?;
    }

    out.flush()
}

fn section_title(out: &mut impl Write, y: u16, height: u16, title: &str) -> io::Result<()> {
    if y + 1 >= height {
        return Ok(());
    }
    queue!(
        out,
        MoveTo(0, y),
        SetAttribute(Attribute::Bold),
        Print(title),
        SetAttribute(Attribute::Reset),
    )
}

/// Marker and color for an item's drag role, if it has one.
fn drag_role(d: &Dashboard, region: &ItemRegion) -> Option<crossterm::style::Color> {
    let drag = d.drag()?;
    if drag.source_id == region.id {
        Some(theme::DRAGGING)
    } else if drag.over_id.as_deref() == Some(region.id.as_str()) {
        Some(theme::DROP_TARGET)
    } else {
        None
    }
}

fn draw_room(out: &mut impl Write, d: &Dashboard, region: &ItemRegion) -> io::Result<()> {
    let Some(item) = d.rooms().get(&region.id) else {
        return Ok(());
    };
    let area = region.area;
    let hovered = d.hovered_room() == Some(region.id.as_str());
    let role = drag_role(d, region);

    let fill_color = role.unwrap_or(if hovered { theme::ACCENT } else { theme::MUTED });
    let fill: String = "░".repeat(area.width as usize);
    for dy in 0..area.height.saturating_sub(1) {
        queue!(
            out,
            MoveTo(area.x, area.y + dy),
            SetForegroundColor(fill_color),
            Print(&fill),
            ResetColor,
        )?;
    }

    // Bottom info bar: door glyph + room name.
    let marker = if role.is_some() { "≡" } else { "⌐" };
    queue!(
        out,
        MoveTo(area.x, area.y + area.height - 1),
        SetForegroundColor(role.unwrap_or(theme::ACCENT)),
        Print(format!("{marker} {}", item.id)),
        ResetColor,
    )?;
    if item.payload.active {
        queue!(
            out,
            MoveTo(area.right().saturating_sub(2), area.y + area.height - 1),
            SetForegroundColor(theme::ON),
            Print("●"),
            ResetColor,
        )?;
    }
    Ok(())
}

fn draw_device(out: &mut impl Write, d: &Dashboard, region: &ItemRegion) -> io::Result<()> {
    let Some(item) = d.devices().get(&region.id) else {
        return Ok(());
    };
    let area = region.area;
    let role = drag_role(d, region);
    let on = item.state.unwrap_or(false);

    let marker = if role.is_some() { "≡" } else { " " };
    queue!(
        out,
        MoveTo(area.x, area.y),
        SetForegroundColor(role.unwrap_or(theme::ACCENT)),
        Print(format!("{marker}{} ", item.payload.icon)),
        SetForegroundColor(role.unwrap_or(crossterm::style::Color::Reset)),
        Print(&item.id),
        ResetColor,
    )?;

    let toggle = region.toggle.unwrap_or(area);
    queue!(
        out,
        MoveTo(toggle.x, toggle.y),
        SetForegroundColor(if on { theme::ON } else { theme::OFF }),
        Print(if on { "[已开启]" } else { "[已关闭]" }),
        ResetColor,
    )?;
    Ok(())
}

fn draw_scene(out: &mut impl Write, d: &Dashboard, region: &ItemRegion) -> io::Result<()> {
    let Some(item) = d.scenes().get(&region.id) else {
        return Ok(());
    };
    let area = region.area;
    let role = drag_role(d, region);

    let marker = if role.is_some() { "≡" } else { " " };
    queue!(
        out,
        MoveTo(area.x, area.y),
        SetForegroundColor(role.unwrap_or(theme::SURFACE)),
        Print(format!("{marker}{} ", item.payload.icon)),
        SetForegroundColor(role.unwrap_or(crossterm::style::Color::Reset)),
        Print(&item.id),
        SetForegroundColor(theme::MUTED),
        Print(" ›"),
        ResetColor,
    )?;
    Ok(())
}
