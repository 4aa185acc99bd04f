pub mod delivery_note;
pub mod item;
pub mod lock;
pub mod package;
pub mod pick_list;
pub mod sales_order;
pub mod settings;
pub mod shipment;
pub mod stock_entry;

pub use delivery_note::{DeliveryItem, DeliveryNote};
pub use item::{BinRecord, Item, ItemBarcode};
pub use lock::{DocLock, LOCK_TTL_MINUTES, Lockable};
pub use package::{PackagePlan, PackedLine, PlannedPackage};
pub use pick_list::{PickList, PickLocation, PickSession, SessionStatus};
pub use sales_order::SalesOrder;
pub use settings::WmsSettings;
pub use shipment::Shipment;
pub use stock_entry::{StockEntry, StockEntryItem};

use serde::{Deserialize, Serialize};

/// Doctype identifiers under which the host stores our documents.
pub mod doctype {
    pub const PICK_LIST: &str = "pick_list";
    pub const DELIVERY_NOTE: &str = "delivery_note";
    pub const SALES_ORDER: &str = "sales_order";
    pub const ITEM: &str = "item";
    pub const ITEM_BARCODE: &str = "item_barcode";
    pub const BIN: &str = "bin";
    pub const STOCK_ENTRY: &str = "stock_entry";
    pub const PICK_SESSION: &str = "pick_session";
    pub const SHIPMENT: &str = "shipment";
    pub const WMS_SETTINGS: &str = "wms_settings";
}

/// Lifecycle state of a work document (pick list or delivery note).
///
/// ```text
/// DRAFT → OPEN → IN_PROGRESS → COMPLETED
///       → CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocStatus {
    Draft,
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for DocStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether the document has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for DocStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
