//! Size labels and per-size quantity records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The default size chart
pub const STANDARD_SIZES: [&str; 5] = ["S", "M", "L", "XL", "XXL"];

/// A size label such as `"M"` or `"XXL"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeLabel(String);

impl SizeLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default chart as labels
    pub fn standard() -> Vec<SizeLabel> {
        STANDARD_SIZES.iter().map(|s| SizeLabel::new(*s)).collect()
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SizeLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Quantity per size label, in chart order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeQuantities(IndexMap<SizeLabel, u32>);

impl SizeQuantities {
    /// Every label of the chart at zero
    pub fn zeroed(chart: &[SizeLabel]) -> Self {
        Self(chart.iter().map(|label| (label.clone(), 0)).collect())
    }

    /// The chart at zero except `label`, which holds `quantity`.
    ///
    /// A label outside the chart is appended after it.
    pub fn single(chart: &[SizeLabel], label: &SizeLabel, quantity: u32) -> Self {
        let mut sizes = Self::zeroed(chart);
        sizes.set(label.clone(), quantity);
        sizes
    }

    pub fn get(&self, label: &SizeLabel) -> u32 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn set(&mut self, label: SizeLabel, quantity: u32) {
        self.0.insert(label, quantity);
    }

    /// Labels with a quantity above zero, in stored order
    pub fn non_zero(&self) -> impl Iterator<Item = (&SizeLabel, u32)> {
        self.0
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(label, qty)| (label, *qty))
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SizeLabel, &u32)> {
        self.0.iter()
    }
}

impl FromIterator<(SizeLabel, u32)> for SizeQuantities {
    fn from_iter<I: IntoIterator<Item = (SizeLabel, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One persisted row of the size tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeGroup {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub sizes: SizeQuantities,
}

impl SizeGroup {
    pub fn new(player_name: Option<String>, sizes: SizeQuantities) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_name,
            sizes,
        }
    }

    pub fn total(&self) -> u32 {
        self.sizes.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keeps_chart_order() {
        let chart = SizeLabel::standard();
        let sizes = SizeQuantities::single(&chart, &SizeLabel::from("L"), 3);
        let labels: Vec<&str> = sizes.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, STANDARD_SIZES);
        assert_eq!(sizes.get(&"L".into()), 3);
        assert_eq!(sizes.total(), 3);
    }

    #[test]
    fn test_non_zero_skips_empty_sizes() {
        let sizes: SizeQuantities = [("S".into(), 2), ("M".into(), 0), ("L".into(), 1)]
            .into_iter()
            .collect();
        let hits: Vec<(&str, u32)> = sizes.non_zero().map(|(l, q)| (l.as_str(), q)).collect();
        assert_eq!(hits, vec![("S", 2), ("L", 1)]);
    }

    #[test]
    fn test_group_serializes_as_plain_map() {
        let group = SizeGroup::new(
            Some("Sam".to_string()),
            SizeQuantities::single(&SizeLabel::standard(), &"M".into(), 1),
        );
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["playerName"], "Sam");
        assert_eq!(json["sizes"]["M"], 1);
        assert_eq!(json["sizes"]["XXL"], 0);
    }

    #[test]
    fn test_unknown_label_reads_as_zero() {
        let sizes = SizeQuantities::zeroed(&SizeLabel::standard());
        assert_eq!(sizes.get(&"3XL".into()), 0);
    }
}
