use serde::{Deserialize, Serialize};

/// An item line placed into a planned package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackedLine {
    pub item_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,

    pub qty: f64,
}

/// One package in a packing plan, with accumulated totals.
///
/// Totals stay within the configured limits except when the package
/// holds a single line that alone exceeds them — single lines are never
/// split across packages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedPackage {
    #[serde(default)]
    pub items: Vec<PackedLine>,

    /// Accumulated weight (kg).
    #[serde(default)]
    pub weight: f64,

    /// Accumulated volume (m³).
    #[serde(default)]
    pub volume: f64,
}

/// A full packing plan for a delivery note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackagePlan {
    pub packages: Vec<PlannedPackage>,
    pub total_packages: usize,
}
