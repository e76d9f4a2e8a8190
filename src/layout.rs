use chrono::Weekday;

use crate::model::Category;

/// Which half of a day's column a cell sits in. Left-half cells run on odd
/// weeks, right-half cells on even weeks (unless the cell spans the full
/// every-week width).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnHalf {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Teacher,
    Room,
}

/// Every layout assumption of the upstream grid, in one place.
///
/// The source page positions cells by raw pixel offsets, so all decoding is
/// driven by these constants. When the upstream layout changes, this struct
/// changes — the algorithms in `grid`/`mapper` do not.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Class marker on the hourly header labels ("08:00-09:00", ...).
    pub time_cell_class: &'static str,
    /// Class marker on positioned course blocks.
    pub course_cell_class: &'static str,
    /// Pixel offset of the first hour row.
    pub first_row_offset: i32,
    /// Pixel height of one hour row.
    pub hour_height: i32,
    /// Cell border, added to the end boundary only.
    pub border_correction: i32,
    /// Width of a cell spanning a full day column (every-week sessions).
    pub every_week_width: i32,
    /// Horizontal offset of a day column's right half.
    pub half_column_width: i32,
    /// Day column start offsets, increasing left to right.
    pub day_offsets: &'static [(i32, Weekday)],
    /// First-line suffix abbreviation → category. Case-sensitive.
    pub categories: &'static [(&'static str, Category)],
    /// `type=` discriminator values in cell hyperlinks.
    pub teacher_link_type: &'static str,
    pub room_link_type: &'static str,
    /// Marker introducing the free-text note at the end of a cell.
    pub note_marker: &'static str,
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout {
            time_cell_class: "timecell",
            course_cell_class: "coursediv",
            first_row_offset: 240,
            hour_height: 44,
            border_correction: 1,
            every_week_width: 154,
            half_column_width: 77,
            day_offsets: &[
                (88, Weekday::Mon),
                (254, Weekday::Tue),
                (420, Weekday::Wed),
                (586, Weekday::Thu),
                (752, Weekday::Fri),
                (918, Weekday::Sat),
            ],
            categories: &[
                ("wyk", Category::Lecture),
                ("lab", Category::Lab),
                ("proj", Category::Project),
                ("ćw", Category::Practical),
            ],
            teacher_link_type: "N",
            room_link_type: "s",
            note_marker: "Uwagi:",
        }
    }
}

impl GridLayout {
    /// Match a cell's `left` to a day column: either the column start itself
    /// (left half) or the start plus `half_column_width` (right half).
    pub fn resolve_day(&self, left: i32) -> Option<(Weekday, ColumnHalf)> {
        for &(offset, day) in self.day_offsets {
            if left == offset {
                return Some((day, ColumnHalf::Left));
            }
            if left - self.half_column_width == offset {
                return Some((day, ColumnHalf::Right));
            }
        }
        None
    }

    /// Closed-world category lookup; anything off the table is `Info`.
    pub fn category_for(&self, abbrev: &str) -> Category {
        self.categories
            .iter()
            .find(|(key, _)| *key == abbrev)
            .map(|(_, cat)| *cat)
            .unwrap_or(Category::Info)
    }

    /// Classify a cell hyperlink by the `type=` discriminator in its href.
    ///
    /// The source grid's URLs are not escaped, so this is a plain slice from
    /// `type=` to the next `&` — kept as-is on purpose, matching the
    /// upstream format exactly.
    pub fn link_kind(&self, href: &str) -> Option<LinkKind> {
        let start = href.find("type=")? + "type=".len();
        let rest = &href[start..];
        let code = match rest.find('&') {
            Some(end) => &rest[..end],
            None => rest,
        };
        if code == self.teacher_link_type {
            Some(LinkKind::Teacher)
        } else if code == self.room_link_type {
            Some(LinkKind::Room)
        } else {
            None
        }
    }
}
