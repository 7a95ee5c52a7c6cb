use crate::types::{VisitRecord, VisitRow, VisitStatus};

/// Summarize who has been to a park from the two visitor flags.
pub fn park_status(evan: bool, kelsey: bool) -> VisitStatus {
    match (evan, kelsey) {
        (true, true) => VisitStatus::EvanAndKelsey,
        (true, false) => VisitStatus::Evan,
        (false, true) => VisitStatus::Kelsey,
        (false, false) => VisitStatus::NotVisited,
    }
}

impl From<VisitRow> for VisitRecord {
    fn from(row: VisitRow) -> Self {
        VisitRecord {
            status: park_status(row.evan, row.kelsey),
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            evan: row.evan,
            kelsey: row.kelsey,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table_is_total() {
        assert_eq!(park_status(true, true).label(), "Evan And Kelsey");
        assert_eq!(park_status(true, false).label(), "Evan");
        assert_eq!(park_status(false, true).label(), "Kelsey");
        assert_eq!(park_status(false, false).label(), "Not Visited");
    }

    #[test]
    fn record_carries_derived_status() {
        let record = VisitRecord::from(VisitRow {
            name: "Arches".into(),
            latitude: 38.73,
            longitude: -109.59,
            evan: true,
            kelsey: false,
        });
        assert_eq!(record.status, VisitStatus::Evan);
        assert_eq!(record.name, "Arches");
    }
}
