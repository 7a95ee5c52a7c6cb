use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_MARKER_COLOR: &str = "blue";

/// Category to marker color lookup, read from a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(HashMap<String, String>);

impl ColorMap {
    pub fn color_for(&self, category: &str) -> &str {
        self.0
            .get(category)
            .map(String::as_str)
            .unwrap_or(DEFAULT_MARKER_COLOR)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        ColorMap(iter.into_iter().collect())
    }
}
