use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::layout::GridLayout;

static TIME_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+:\d+-\d+:\d+$").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// One hourly header label, e.g. "08:00-09:00".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTimeCell {
    pub text: String,
}

/// One positioned block of the grid, geometry still in raw pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCourseCell {
    pub top: i32,
    pub left: i32,
    pub height: i32,
    pub width: i32,
    pub text: String,
    /// (display text, href) for every anchor inside the cell.
    pub links: Vec<(String, String)>,
}

/// Why a cell was screened out. The production path discards this, but the
/// screening functions surface it so the drop policy stays testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Header text does not look like "HH:MM-HH:MM".
    BadTimeLabel,
    /// Course cell with no text left after removing its anchors.
    EmptyText,
    /// A geometry value parsed to zero or negative (missing attributes
    /// included — they default to 0 and land here).
    BadGeometry,
}

#[derive(Debug, Default)]
pub struct GridCells {
    pub time_cells: Vec<RawTimeCell>,
    pub course_cells: Vec<RawCourseCell>,
}

/// Select and screen every marked cell in the document. Invalid cells are
/// silently discarded — the source markup is noisy by nature and partial
/// loss of individual cells is expected.
pub fn extract_cells(doc: &Html, layout: &GridLayout) -> GridCells {
    let time_cells = match class_selector(layout.time_cell_class) {
        Some(sel) => doc
            .select(&sel)
            .filter_map(|el| screen_time_cell(el).ok())
            .collect(),
        None => Vec::new(),
    };
    let course_cells = match class_selector(layout.course_cell_class) {
        Some(sel) => doc
            .select(&sel)
            .filter_map(|el| screen_course_cell(el).ok())
            .collect(),
        None => Vec::new(),
    };

    GridCells { time_cells, course_cells }
}

/// Keep a header label only if it is exactly an "H:MM-H:MM" range of 11
/// characters ("08:00-09:00"); anything else is a decoration cell.
pub fn screen_time_cell(el: ElementRef) -> Result<RawTimeCell, DropReason> {
    let text = el.text().collect::<String>().trim().to_string();
    if text.chars().count() == 11 && TIME_LABEL_RE.is_match(&text) {
        Ok(RawTimeCell { text })
    } else {
        Err(DropReason::BadTimeLabel)
    }
}

/// Read one course block: `top`/`left` from the inline style, `height`/
/// `width` from explicit attributes, anchors as links, and the remaining
/// text with anchor text excluded.
pub fn screen_course_cell(el: ElementRef) -> Result<RawCourseCell, DropReason> {
    let style = el.value().attr("style").unwrap_or("");
    let top = style_px(style, "top");
    let left = style_px(style, "left");
    let height = attr_px(el, "height");
    let width = attr_px(el, "width");

    let links: Vec<(String, String)> = el
        .select(&ANCHOR_SEL)
        .map(|a| {
            let display = a.text().collect::<String>().trim().to_string();
            let href = a.value().attr("href").unwrap_or("").to_string();
            (display, href)
        })
        .collect();

    let text = text_outside_anchors(el);
    if text.is_empty() {
        return Err(DropReason::EmptyText);
    }
    if top <= 0 || left <= 0 || height <= 0 || width <= 0 {
        return Err(DropReason::BadGeometry);
    }

    Ok(RawCourseCell { top, left, height, width, text, links })
}

/// Smallest leading hour across the valid header labels — the grid's
/// reference start hour. `None` when there are no time cells.
pub fn reference_hour(time_cells: &[RawTimeCell]) -> Option<u32> {
    time_cells
        .iter()
        .filter_map(|cell| {
            let (hour, _) = cell.text.split_once(':')?;
            hour.parse::<u32>().ok()
        })
        .min()
}

/// A class marker is configuration, so a bad one must not bring the
/// pipeline down: it selects nothing, which surfaces upstream as the
/// insufficient-data condition.
fn class_selector(class: &str) -> Option<Selector> {
    let sel = Selector::parse(&format!(".{class}")).ok();
    if sel.is_none() {
        warn!(class, "class marker is not a valid selector");
    }
    sel
}

/// Pull an integer out of an inline style declaration, "40px" → 40.
/// Missing or malformed values read as 0, which the screening step rejects.
fn style_px(style: &str, key: &str) -> i32 {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(name, _)| name.trim() == key)
        .and_then(|(_, value)| value.trim().trim_end_matches("px").parse().ok())
        .unwrap_or(0)
}

fn attr_px(el: ElementRef, name: &str) -> i32 {
    el.value()
        .attr(name)
        .and_then(|v| v.trim().trim_end_matches("px").parse().ok())
        .unwrap_or(0)
}

/// Whole text of the element minus anything rendered inside an anchor —
/// the anchors were already captured as links.
fn text_outside_anchors(el: ElementRef) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        if let Some(text) = node.value().as_text() {
            let in_anchor = node.ancestors().any(|anc| {
                anc.value().as_element().is_some_and(|e| e.name() == "a")
            });
            if !in_anchor {
                out.push_str(text);
            }
        }
    }
    out.trim().to_string()
}

// ── Tests ──
