use serde::{Deserialize, Serialize};

/// One line of a stock entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockEntryItem {
    pub idx: u32,
    pub item_code: String,
    pub qty: f64,

    /// Warehouse the quantity is drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_warehouse: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_warehouse: Option<String>,
}

/// A stock movement document (transfer, issue, receipt).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub entry_type: String,

    #[serde(default)]
    pub items: Vec<StockEntryItem>,
}
