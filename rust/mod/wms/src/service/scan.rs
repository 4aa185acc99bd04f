use serde::Serialize;

use openwms_host::{DocQuery, FieldValue};

use super::{WmsError, WmsService};

/// Item details resolved from a barcode scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub item_code: String,
    pub item_name: String,
    /// Scans always count a single unit.
    pub qty: f64,
    pub uom: String,
    pub barcode: String,
}

/// Best stocked slot for an item in a warehouse.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLocation {
    pub warehouse: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub actual_qty: f64,
}

/// Result of a stock-entry availability check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCheck {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl WmsService {
    /// Resolve a scanned barcode to an item.
    ///
    /// Tries registered barcodes first, then a direct item-code match —
    /// operators sometimes scan the shelf label instead of the product.
    pub fn scan_barcode(&self, barcode: &str) -> Result<ScanResult, WmsError> {
        let item_code = match self.barcodes.try_get(barcode)? {
            Some(entry) => entry.body.item_code,
            None => barcode.to_string(),
        };

        let item = self.items.try_get(&item_code)?.ok_or_else(|| {
            WmsError::NotFound(format!("no item found for barcode: {}", barcode))
        })?;

        Ok(ScanResult {
            item_code: item.body.item_code,
            item_name: item.body.item_name,
            qty: 1.0,
            uom: item.body.stock_uom,
            barcode: barcode.to_string(),
        })
    }

    /// Best stocked slot for an item in a warehouse, or `None` when the
    /// item isn't on hand there.
    pub fn item_location(
        &self,
        item_code: &str,
        warehouse: &str,
    ) -> Result<Option<BinLocation>, WmsError> {
        let bins = self.bins.query(
            &DocQuery::default()
                .filter("itemCode", FieldValue::Text(item_code.to_string()))
                .filter("warehouse", FieldValue::Text(warehouse.to_string()))
                .order_by("actualQty", true),
        )?;

        Ok(bins
            .into_iter()
            .map(|doc| doc.body)
            .find(|bin| bin.actual_qty > 0.0)
            .map(|bin| BinLocation {
                warehouse: bin.warehouse,
                location: bin.location,
                actual_qty: bin.actual_qty,
            }))
    }

    /// Check that every sourced line of a stock entry is coverable.
    ///
    /// Shortages are reported, not thrown — the caller shows them to the
    /// operator.
    pub fn verify_stock_entry(&self, stock_entry_id: &str) -> Result<StockCheck, WmsError> {
        let entry = self.stock_entries.get(stock_entry_id)?;

        let mut errors = Vec::new();
        for line in &entry.body.items {
            let Some(warehouse) = line.source_warehouse.as_deref() else {
                continue;
            };

            let available = self
                .bins
                .query(
                    &DocQuery::default()
                        .filter("itemCode", FieldValue::Text(line.item_code.clone()))
                        .filter("warehouse", FieldValue::Text(warehouse.to_string()))
                        .limit(1),
                )?
                .first()
                .map(|doc| doc.body.actual_qty)
                .unwrap_or(0.0);

            if available < line.qty {
                errors.push(format!(
                    "row {}: insufficient {} in {}. Available: {}, Required: {}",
                    line.idx, line.item_code, warehouse, available, line.qty
                ));
            }
        }

        Ok(StockCheck {
            valid: errors.is_empty(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{BinRecord, ItemBarcode, StockEntry, StockEntryItem};
    use crate::service::testutil::*;
    use super::*;

    #[test]
    fn scan_resolves_registered_barcode() {
        let (service, _) = make_service();
        service.items.insert("WIDGET-01", &item("WIDGET-01", 1.0, 0.0)).unwrap();
        service
            .barcodes
            .insert(
                "4006381333931",
                &ItemBarcode {
                    barcode: "4006381333931".into(),
                    item_code: "WIDGET-01".into(),
                },
            )
            .unwrap();

        let result = service.scan_barcode("4006381333931").unwrap();
        assert_eq!(result.item_code, "WIDGET-01");
        assert_eq!(result.qty, 1.0);
        assert_eq!(result.barcode, "4006381333931");
    }

    #[test]
    fn scan_falls_back_to_item_code() {
        let (service, _) = make_service();
        service.items.insert("WIDGET-01", &item("WIDGET-01", 1.0, 0.0)).unwrap();

        let result = service.scan_barcode("WIDGET-01").unwrap();
        assert_eq!(result.item_code, "WIDGET-01");
    }

    #[test]
    fn unknown_barcode_is_not_found_with_the_code_in_the_message() {
        let (service, _) = make_service();
        let err = service.scan_barcode("0000000000").unwrap_err();
        assert!(matches!(err, WmsError::NotFound(_)));
        assert!(err.to_string().contains("0000000000"));
    }

    fn bin(id: &str, item: &str, warehouse: &str, qty: f64, slot: Option<&str>) -> (String, BinRecord) {
        (
            id.to_string(),
            BinRecord {
                item_code: item.into(),
                warehouse: warehouse.into(),
                actual_qty: qty,
                location: slot.map(String::from),
            },
        )
    }

    #[test]
    fn item_location_prefers_the_fullest_stocked_bin() {
        let (service, _) = make_service();
        for (id, record) in [
            bin("B1", "WIDGET-01", "WH-A", 3.0, Some("A-10")),
            bin("B2", "WIDGET-01", "WH-A", 9.0, Some("A-22")),
            bin("B3", "WIDGET-01", "WH-B", 50.0, Some("B-01")),
            bin("B4", "OTHER", "WH-A", 99.0, None),
        ] {
            service.bins.insert(&id, &record).unwrap();
        }

        let found = service.item_location("WIDGET-01", "WH-A").unwrap().unwrap();
        assert_eq!(found.location.as_deref(), Some("A-22"));
        assert_eq!(found.actual_qty, 9.0);
    }

    #[test]
    fn item_location_ignores_empty_bins() {
        let (service, _) = make_service();
        let (id, record) = bin("B1", "WIDGET-01", "WH-A", 0.0, Some("A-10"));
        service.bins.insert(&id, &record).unwrap();

        assert!(service.item_location("WIDGET-01", "WH-A").unwrap().is_none());
    }

    #[test]
    fn verify_reports_shortages_per_row() {
        let (service, _) = make_service();
        let (id, record) = bin("B1", "WIDGET-01", "WH-A", 2.0, None);
        service.bins.insert(&id, &record).unwrap();
        service
            .stock_entries
            .insert(
                "SE-1",
                &StockEntry {
                    entry_type: "Material Transfer".into(),
                    items: vec![
                        StockEntryItem {
                            idx: 1,
                            item_code: "WIDGET-01".into(),
                            qty: 5.0,
                            source_warehouse: Some("WH-A".into()),
                            target_warehouse: None,
                        },
                        StockEntryItem {
                            idx: 2,
                            item_code: "WIDGET-01".into(),
                            qty: 1.0,
                            source_warehouse: Some("WH-A".into()),
                            target_warehouse: None,
                        },
                        StockEntryItem {
                            idx: 3,
                            item_code: "NO-SOURCE".into(),
                            qty: 100.0,
                            source_warehouse: None,
                            target_warehouse: None,
                        },
                    ],
                },
            )
            .unwrap();

        let check = service.verify_stock_entry("SE-1").unwrap();
        assert!(!check.valid);
        assert_eq!(check.errors.len(), 1);
        assert!(check.errors[0].contains("row 1"));
        assert!(check.errors[0].contains("Available: 2"));
    }

    #[test]
    fn verify_passes_when_covered() {
        let (service, _) = make_service();
        let (id, record) = bin("B1", "WIDGET-01", "WH-A", 10.0, None);
        service.bins.insert(&id, &record).unwrap();
        service
            .stock_entries
            .insert(
                "SE-1",
                &StockEntry {
                    entry_type: "Material Transfer".into(),
                    items: vec![StockEntryItem {
                        idx: 1,
                        item_code: "WIDGET-01".into(),
                        qty: 5.0,
                        source_warehouse: Some("WH-A".into()),
                        target_warehouse: None,
                    }],
                },
            )
            .unwrap();

        let check = service.verify_stock_entry("SE-1").unwrap();
        assert!(check.valid);
        assert!(check.errors.is_empty());
    }
}
