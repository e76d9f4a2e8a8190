use std::collections::BTreeSet;

use chrono::{NaiveTime, Weekday};
use tracing::warn;

use crate::grid::RawCourseCell;
use crate::layout::{ColumnHalf, GridLayout, LinkKind};
use crate::model::{Category, CourseFact, WeekParity};

/// Decode one screened course cell into a structured fact.
///
/// Everything reaching this stage already passed screening, so no input can
/// fail here: unknown categories fall back to `Info`, unclassifiable links
/// are ignored, and an off-grid `left` is logged and mapped to a default.
pub fn map_cell(
    layout: &GridLayout,
    schedule_id: &str,
    reference_hour: u32,
    cell: &RawCourseCell,
) -> CourseFact {
    let starts_at = quarter_time(layout, reference_hour, cell.top as i64);
    let ends_at = quarter_time(
        layout,
        reference_hour,
        cell.top as i64 + cell.height as i64 + layout.border_correction as i64,
    );

    let (day_of_week, half) = match layout.resolve_day(cell.left) {
        Some(resolved) => resolved,
        None => {
            warn!(left = cell.left, "course cell left offset matches no day column");
            (Weekday::Mon, ColumnHalf::Left)
        }
    };
    let week_parity = if cell.width == layout.every_week_width {
        WeekParity::Every
    } else {
        match half {
            ColumnHalf::Left => WeekParity::Odd,
            ColumnHalf::Right => WeekParity::Even,
        }
    };

    let (name, category) = name_and_category(layout, &cell.text);

    let mut teachers = BTreeSet::new();
    let mut rooms = BTreeSet::new();
    for (display, href) in &cell.links {
        match layout.link_kind(href) {
            Some(LinkKind::Teacher) => {
                teachers.insert(display.clone());
            }
            Some(LinkKind::Room) => {
                rooms.insert(display.clone());
            }
            None => {}
        }
    }

    CourseFact {
        schedule_id: schedule_id.to_string(),
        starts_at,
        ends_at,
        name,
        category,
        teachers,
        rooms,
        day_of_week,
        week_parity,
        note: note_text(layout, &cell.text),
    }
}

/// Pixel boundary → quarter-hour-quantized time of day.
///
/// The vertical distance from the first row is converted to quarter blocks
/// with ceiling rounding: a boundary anywhere inside a quarter block belongs
/// to the next quarter line, never the previous one.
fn quarter_time(layout: &GridLayout, reference_hour: u32, boundary: i64) -> NaiveTime {
    // Widened to i64: screening only requires positive geometry, so a
    // degenerate pixel offset must clamp into the day, not overflow.
    let quarters = div_ceil(
        4 * (boundary - layout.first_row_offset as i64),
        layout.hour_height as i64,
    );
    let minutes = (reference_hour as i64 * 60)
        .saturating_add(quarters.saturating_mul(15))
        .clamp(0, 23 * 60 + 45);
    NaiveTime::from_hms_opt(minutes as u32 / 60, minutes as u32 % 60, 0)
        .unwrap_or(NaiveTime::MIN)
}

/// Ceiling division for a positive divisor; pixel offsets above the first
/// row come out negative and still round toward the next quarter line.
fn div_ceil(num: i64, den: i64) -> i64 {
    (num + den - 1).div_euclid(den)
}

/// First line of the cell, split on commas: the first segment is the name,
/// the second (when present) is the category abbreviation. A single-segment
/// line is an informational entry.
fn name_and_category(layout: &GridLayout, text: &str) -> (String, Category) {
    let first_line = text.lines().next().unwrap_or("");
    let mut segments = first_line.split(',');
    let name = segments.next().unwrap_or("").trim().to_string();
    match segments.next() {
        Some(abbrev) => (name, layout.category_for(abbrev.trim())),
        None => (name, Category::Info),
    }
}

/// Everything from the note marker onward, with newlines collapsed to single
/// spaces. Absent when the marker is not in the text.
fn note_text(layout: &GridLayout, text: &str) -> Option<String> {
    let start = text.find(layout.note_marker)?;
    let note = text[start..]
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(note)
}

// ── Tests ──
