//! Turns a pixel-positioned HTML timetable into addressable course records.
//!
//! The grid has no semantic markup: cells are absolutely positioned blocks
//! whose coordinates encode day, week parity and time of day. The pipeline
//! is three pure stages — extract raw cells, decode geometry into facts,
//! diff against the stored set by content equality. Fetching, persistence
//! and scheduling belong to the caller.

pub mod grid;
pub mod layout;
pub mod mapper;
pub mod model;
pub mod reconcile;

use std::collections::HashSet;

use scraper::Html;
use thiserror::Error;

use crate::layout::GridLayout;
use crate::model::CourseFact;

/// The one caller-actionable failure: a document that extracted to nothing.
///
/// Per-cell problems are swallowed during screening; an entirely empty
/// result usually means the upstream fetch broke, and the caller must abort
/// reconciliation instead of deleting every stored course for the schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("document contains no valid time cells")]
    NoTimeCells,
    #[error("document contains no valid course cells")]
    NoCourseCells,
}

/// Extract and map every course on the page for one schedule.
///
/// The reference start hour is taken from the earliest header label, so the
/// same code handles grids starting at different hours.
pub fn scrape_schedule(
    html: &str,
    schedule_id: &str,
    layout: &GridLayout,
) -> Result<Vec<CourseFact>, ScrapeError> {
    let doc = Html::parse_document(html);
    let cells = grid::extract_cells(&doc, layout);

    let reference_hour =
        grid::reference_hour(&cells.time_cells).ok_or(ScrapeError::NoTimeCells)?;
    if cells.course_cells.is_empty() {
        return Err(ScrapeError::NoCourseCells);
    }

    // The output is a set: byte-identical cells collapse to one fact.
    let mut seen: HashSet<CourseFact> = HashSet::new();
    let mut facts = Vec::new();
    for cell in &cells.course_cells {
        let fact = mapper::map_cell(layout, schedule_id, reference_hour, cell);
        if seen.insert(fact.clone()) {
            facts.push(fact);
        }
    }
    Ok(facts)
}
