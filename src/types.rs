use geo::Point;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Whether a passport stamp has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Visited {
    Yes,
    No,
}

impl Visited {
    pub const ALL: [Visited; 2] = [Visited::Yes, Visited::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visited::Yes => "Yes",
            Visited::No => "No",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Yes" => Some(Visited::Yes),
            "No" => Some(Visited::No),
            _ => None,
        }
    }
}

impl fmt::Display for Visited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the passport stamp series.
///
/// A blank year or region cell loads as `None`; such rows never match a
/// filter selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StampRecord {
    pub name: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub visited: Visited,
}

impl StampRecord {
    pub fn position(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Who, if anyone, has been to a park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VisitStatus {
    EvanAndKelsey,
    Evan,
    Kelsey,
    NotVisited,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 4] = [
        VisitStatus::EvanAndKelsey,
        VisitStatus::Evan,
        VisitStatus::Kelsey,
        VisitStatus::NotVisited,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VisitStatus::EvanAndKelsey => "Evan And Kelsey",
            VisitStatus::Evan => "Evan",
            VisitStatus::Kelsey => "Kelsey",
            VisitStatus::NotVisited => "Not Visited",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw row of the visited records table, before the status is attached.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitRow {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "Evan", deserialize_with = "deserialize_flag")]
    pub evan: bool,
    #[serde(rename = "Kelsey", deserialize_with = "deserialize_flag")]
    pub kelsey: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub evan: bool,
    pub kelsey: bool,
    pub status: VisitStatus,
}

impl VisitRecord {
    pub fn position(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

// Spreadsheet exports sometimes write whole years as floats ("2019.0").
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_year(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid year: {:?}", raw)))
}

pub(crate) fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid boolean: {:?}", raw)))
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "t" | "y" => Some(true),
        "false" | "no" | "0" | "f" | "n" | "" => Some(false),
        _ => None,
    }
}
