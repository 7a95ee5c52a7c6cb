//! Sidebar filter selections and the set-membership filtering they drive.
//!
//! Every column predicate is an explicit allow-set. An empty set rejects every
//! row; "show everything" is expressed by selecting every distinct value.

use crate::types::{parse_year, StampRecord, VisitRecord, VisitStatus, Visited};
use std::collections::{BTreeSet, HashMap};

/// Marker field sent by the sidebar form so an empty multi-select can be told
/// apart from a first page load.
pub const APPLIED_PARAM: &str = "applied";

/// Filter values as they arrive in a query string (`?region=A&region=B`).
///
/// A column with no values falls back to every option, unless the sidebar form
/// was submitted, in which case it selects nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionParams {
    applied: bool,
    values: HashMap<String, Vec<String>>,
}

impl SelectionParams {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = SelectionParams::default();
        let Some(query) = query else {
            return params;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == APPLIED_PARAM {
                params.applied = true;
            } else {
                params.values.entry(key.into_owned()).or_default().push(value.into_owned());
            }
        }
        params
    }

    fn column(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(values) => Some(values.as_slice()),
            None if self.applied => Some(&[][..]),
            None => None,
        }
    }

    pub fn stamp_filter(&self, options: &StampOptions) -> StampFilter {
        let all = StampFilter::all(options);
        StampFilter {
            years: self
                .column("year")
                .map(|values| values.iter().filter_map(|v| parse_year(v)).collect())
                .unwrap_or(all.years),
            regions: self
                .column("region")
                .map(|values| values.iter().cloned().collect())
                .unwrap_or(all.regions),
            visited: self
                .column("visited")
                .map(|values| values.iter().filter_map(|v| Visited::parse(v)).collect())
                .unwrap_or(all.visited),
        }
    }

    pub fn visit_filter(&self, options: &[VisitStatus]) -> VisitFilter {
        match self.column("status") {
            Some(values) => VisitFilter {
                statuses: values.iter().filter_map(|v| VisitStatus::parse(v)).collect(),
            },
            None => VisitFilter::all(options),
        }
    }
}

/// Distinct values offered by the stamps sidebar, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StampOptions {
    pub years: Vec<i32>,
    pub regions: Vec<String>,
    pub visited: Vec<Visited>,
}

impl StampOptions {
    pub fn from_records(stamps: &[StampRecord]) -> Self {
        let years: BTreeSet<i32> = stamps.iter().filter_map(|s| s.year).collect();
        let regions: BTreeSet<&str> = stamps.iter().filter_map(|s| s.region.as_deref()).collect();
        StampOptions {
            years: years.into_iter().collect(),
            regions: regions.into_iter().map(str::to_string).collect(),
            // Both flags are always offered, even when one is absent from the data.
            visited: Visited::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StampFilter {
    pub years: BTreeSet<i32>,
    pub regions: BTreeSet<String>,
    pub visited: BTreeSet<Visited>,
}

impl StampFilter {
    /// The default selection: every option ticked.
    pub fn all(options: &StampOptions) -> Self {
        StampFilter {
            years: options.years.iter().copied().collect(),
            regions: options.regions.iter().cloned().collect(),
            visited: options.visited.iter().copied().collect(),
        }
    }

    /// Rows with a blank year or region never match.
    pub fn matches(&self, stamp: &StampRecord) -> bool {
        stamp.year.is_some_and(|year| self.years.contains(&year))
            && stamp.region.as_ref().is_some_and(|region| self.regions.contains(region))
            && self.visited.contains(&stamp.visited)
    }

    pub fn apply(&self, stamps: &[StampRecord]) -> Vec<StampRecord> {
        stamps.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}

/// Statuses present in the data, sorted by label.
pub fn status_options(visits: &[VisitRecord]) -> Vec<VisitStatus> {
    let mut statuses: Vec<VisitStatus> = visits
        .iter()
        .map(|v| v.status)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    statuses.sort_by_key(|status| status.label());
    statuses
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitFilter {
    pub statuses: BTreeSet<VisitStatus>,
}

impl VisitFilter {
    pub fn all(options: &[VisitStatus]) -> Self {
        VisitFilter {
            statuses: options.iter().copied().collect(),
        }
    }

    pub fn matches(&self, visit: &VisitRecord) -> bool {
        self.statuses.contains(&visit.status)
    }

    pub fn apply(&self, visits: &[VisitRecord]) -> Vec<VisitRecord> {
        visits.iter().filter(|v| self.matches(v)).cloned().collect()
    }
}
