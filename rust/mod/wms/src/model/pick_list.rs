use serde::{Deserialize, Serialize};

use super::DocStatus;
use super::lock::{DocLock, Lockable};

/// One line of a pick list: an item to retrieve from a warehouse slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickLocation {
    /// 1-based position in the walking order.
    pub idx: u32,

    pub item_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,

    /// Requested quantity.
    pub qty: f64,

    /// Picked so far. Never exceeds `qty`.
    #[serde(default)]
    pub picked_qty: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,

    /// Warehouse (route area) the item sits in.
    pub warehouse: String,

    /// Slot code inside the warehouse, when the layout is mapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_no: Option<String>,

    /// Box the operator dropped the picked quantity into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_no: Option<String>,

    /// Originating sales order, carried into generated delivery notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_order: Option<String>,
}

/// A pick list: the ordered set of lines an operator walks and picks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickList {
    #[serde(default)]
    pub status: DocStatus,

    #[serde(default)]
    pub locations: Vec<PickLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<DocLock>,

    // Derived metrics, recomputed on save.
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_qty: f64,
    #[serde(default)]
    pub estimated_minutes: f64,

    /// Set once a shipment for a generated delivery note goes out.
    #[serde(default)]
    pub delivered: bool,
}

impl Lockable for PickList {
    fn lock(&self) -> Option<&DocLock> {
        self.lock.as_ref()
    }

    fn lock_mut(&mut self) -> &mut Option<DocLock> {
        &mut self.lock
    }

    fn kind() -> &'static str {
        "pick list"
    }
}

/// Status of a picking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// One operator's run through a pick list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickSession {
    pub pick_list: String,
    pub picker: String,

    /// Whether every pick must be confirmed by a barcode scan.
    #[serde(default)]
    pub scan_mode: bool,

    pub status: SessionStatus,

    /// RFC 3339.
    pub start_time: String,
}
