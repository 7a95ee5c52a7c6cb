use crate::types::StampRecord;
use serde::Serialize;

pub const STAMP_COLUMNS: [&str; 6] = ["name", "year", "region", "latitude", "longitude", "visited"];

/// Display-ready grid: every cell is already formatted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Stable sort by year, then name, then region. Blank years and regions sort last.
pub fn sort_stamps(stamps: &mut [StampRecord]) {
    stamps.sort_by(|a, b| {
        (a.year.is_none(), a.year)
            .cmp(&(b.year.is_none(), b.year))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| (a.region.is_none(), &a.region).cmp(&(b.region.is_none(), &b.region)))
    });
}

/// Whole-number year without grouping separators.
pub fn format_year(year: i32) -> String {
    year.to_string()
}

// Shortest text that reads back as the stored value.
fn format_coordinate(value: f64) -> String {
    value.to_string()
}

pub fn stamp_table(stamps: &[StampRecord]) -> TableData {
    let mut sorted = stamps.to_vec();
    sort_stamps(&mut sorted);

    let rows = sorted
        .iter()
        .map(|stamp| {
            vec![
                stamp.name.clone(),
                stamp.year.map(format_year).unwrap_or_default(),
                stamp.region.clone().unwrap_or_default(),
                format_coordinate(stamp.latitude),
                format_coordinate(stamp.longitude),
                stamp.visited.to_string(),
            ]
        })
        .collect();

    TableData {
        headers: STAMP_COLUMNS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}
