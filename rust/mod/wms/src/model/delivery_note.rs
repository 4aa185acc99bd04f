use serde::{Deserialize, Serialize};

use super::DocStatus;
use super::lock::{DocLock, Lockable};

/// One line of a delivery note: an item to pack and ship.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItem {
    /// 1-based position.
    pub idx: u32,

    pub item_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,

    /// Quantity to ship.
    pub qty: f64,

    /// Packed so far. Never exceeds `qty`.
    #[serde(default)]
    pub packed_qty: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_no: Option<String>,

    /// Box/package the quantity went into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_no: Option<String>,

    /// Sales order this line fulfils.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub against_sales_order: Option<String>,
}

/// An outbound shipment document tracking packed items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryNote {
    pub customer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub status: DocStatus,

    #[serde(default)]
    pub items: Vec<DeliveryItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<DocLock>,

    /// When set, the note cannot be submitted until every line is packed.
    #[serde(default)]
    pub require_packing: bool,

    // Derived totals, recomputed on save.
    #[serde(default)]
    pub total_weight: f64,
    #[serde(default)]
    pub total_volume: f64,

    /// Pick list this note was generated from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_list: Option<String>,
}

impl Lockable for DeliveryNote {
    fn lock(&self) -> Option<&DocLock> {
        self.lock.as_ref()
    }

    fn lock_mut(&mut self) -> &mut Option<DocLock> {
        &mut self.lock
    }

    fn kind() -> &'static str {
        "delivery note"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_json_roundtrip() {
        let note = DeliveryNote {
            customer: "CUST-1".into(),
            customer_name: Some("Acme".into()),
            status: DocStatus::Open,
            items: vec![DeliveryItem {
                idx: 1,
                item_code: "WIDGET-01".into(),
                item_name: None,
                qty: 4.0,
                packed_qty: 2.0,
                uom: None,
                batch_no: None,
                box_no: Some("BOX-1".into()),
                against_sales_order: Some("SO-1".into()),
            }],
            lock: None,
            require_packing: true,
            total_weight: 6.0,
            total_volume: 0.01,
            pick_list: Some("PL-1".into()),
        };
        let json = serde_json::to_string(&note).unwrap();
        let back: DeliveryNote = serde_json::from_str(&json).unwrap();
        assert_eq!(note, back);
    }
}
