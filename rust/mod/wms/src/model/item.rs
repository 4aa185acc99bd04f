use serde::{Deserialize, Serialize};

/// Item master record. PK = item_code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_code: String,
    pub item_name: String,

    /// Stock unit of measure.
    #[serde(default = "default_uom")]
    pub stock_uom: String,

    /// Per-unit shipping weight (kg).
    #[serde(default)]
    pub weight_per_unit: f64,

    /// Per-unit shipping volume (m³).
    #[serde(default)]
    pub volume_per_unit: f64,

    /// Whether the item is batch-tracked (a batch must be scanned on pick).
    #[serde(default)]
    pub has_batch_no: bool,
}

fn default_uom() -> String {
    "Unit".to_string()
}

/// A barcode registered against an item. PK = barcode.
///
/// Kept as its own document so scans resolve with a single keyed lookup,
/// mirroring the platform's barcode child table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemBarcode {
    pub barcode: String,
    pub item_code: String,
}

/// Per-warehouse stock level for an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BinRecord {
    pub item_code: String,
    pub warehouse: String,

    #[serde(default)]
    pub actual_qty: f64,

    /// Physical slot code inside the warehouse, when the layout is mapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_json_roundtrip() {
        let item = Item {
            item_code: "WIDGET-01".into(),
            item_name: "Widget".into(),
            stock_uom: "Unit".into(),
            weight_per_unit: 1.5,
            volume_per_unit: 0.002,
            has_batch_no: true,
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn item_defaults_apply() {
        let item: Item =
            serde_json::from_str(r#"{"itemCode": "X", "itemName": "X"}"#).unwrap();
        assert_eq!(item.stock_uom, "Unit");
        assert_eq!(item.weight_per_unit, 0.0);
        assert!(!item.has_batch_no);
    }
}
