use serde::{Deserialize, Serialize};

use super::package::PlannedPackage;

/// A shipment generated from a fully packed delivery note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub delivery_note: String,

    /// Packages as actually packed (box contents and totals).
    #[serde(default)]
    pub packages: Vec<PlannedPackage>,

    #[serde(default = "default_status")]
    pub status: String,

    pub created_by: String,

    /// RFC 3339.
    pub created_at: String,
}

fn default_status() -> String {
    "OPEN".to_string()
}
