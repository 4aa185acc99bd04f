//! Bootstrap — optional demo data so a fresh server is drivable.
//!
//! Seeds a few item masters, stocked bins, sales orders and one pick
//! list / delivery note each. Skipped when the demo pick list already
//! exists, so restarting with `--seed-demo` is harmless.

use openwms_host::{DocStore, HostError, RawDoc};
use tracing::info;

const DEMO_PICK_LIST: &str = "PL-DEMO-0001";

fn doc(doctype: &str, id: &str, data: serde_json::Value) -> RawDoc {
    RawDoc {
        doctype: doctype.to_string(),
        id: id.to_string(),
        version: 0,
        data,
    }
}

/// Seed the demo data set. Idempotent.
pub fn seed_demo(store: &dyn DocStore) -> anyhow::Result<()> {
    match store.load("pick_list", DEMO_PICK_LIST) {
        Ok(_) => {
            info!("demo data already present, skipping seed");
            return Ok(());
        }
        Err(HostError::NotFound(_)) => {}
        Err(e) => return Err(anyhow::anyhow!("seed check failed: {}", e)),
    }

    let docs = vec![
        doc("item", "WIDGET-01", serde_json::json!({
            "itemCode": "WIDGET-01", "itemName": "Widget, small",
            "stockUom": "Unit", "weightPerUnit": 1.5, "volumePerUnit": 0.002,
            "hasBatchNo": false,
        })),
        doc("item", "GEARBOX-04", serde_json::json!({
            "itemCode": "GEARBOX-04", "itemName": "Gearbox assembly",
            "stockUom": "Unit", "weightPerUnit": 12.0, "volumePerUnit": 0.03,
            "hasBatchNo": true,
        })),
        doc("item", "BOLT-M8", serde_json::json!({
            "itemCode": "BOLT-M8", "itemName": "Bolt M8 (box of 100)",
            "stockUom": "Box", "weightPerUnit": 0.8, "volumePerUnit": 0.001,
            "hasBatchNo": false,
        })),
        doc("item_barcode", "4006381333931", serde_json::json!({
            "barcode": "4006381333931", "itemCode": "WIDGET-01",
        })),
        doc("item_barcode", "4006381333948", serde_json::json!({
            "barcode": "4006381333948", "itemCode": "GEARBOX-04",
        })),
        doc("bin", "WH-A:WIDGET-01", serde_json::json!({
            "itemCode": "WIDGET-01", "warehouse": "WH-A",
            "actualQty": 120.0, "location": "A-01-03",
        })),
        doc("bin", "WH-A:BOLT-M8", serde_json::json!({
            "itemCode": "BOLT-M8", "warehouse": "WH-A",
            "actualQty": 45.0, "location": "A-02-11",
        })),
        doc("bin", "WH-B:GEARBOX-04", serde_json::json!({
            "itemCode": "GEARBOX-04", "warehouse": "WH-B",
            "actualQty": 8.0, "location": "B-04-01",
        })),
        doc("sales_order", "SO-1001", serde_json::json!({
            "customer": "CUST-ACME", "customerName": "Acme Industries", "status": "OPEN",
        })),
        doc("sales_order", "SO-1002", serde_json::json!({
            "customer": "CUST-NORD", "customerName": "Nordwind Logistik", "status": "OPEN",
        })),
        doc("pick_list", DEMO_PICK_LIST, serde_json::json!({
            "status": "DRAFT",
            "locations": [
                {"idx": 1, "itemCode": "GEARBOX-04", "qty": 2.0, "warehouse": "WH-B",
                 "location": "B-04-01", "salesOrder": "SO-1001"},
                {"idx": 2, "itemCode": "WIDGET-01", "qty": 10.0, "warehouse": "WH-A",
                 "location": "A-01-03", "salesOrder": "SO-1001"},
                {"idx": 3, "itemCode": "BOLT-M8", "qty": 4.0, "warehouse": "WH-A",
                 "location": "A-02-11", "salesOrder": "SO-1002"},
            ],
        })),
        doc("delivery_note", "DN-DEMO-0001", serde_json::json!({
            "customer": "CUST-ACME", "customerName": "Acme Industries",
            "status": "OPEN", "requirePacking": true,
            "items": [
                {"idx": 1, "itemCode": "WIDGET-01", "qty": 10.0},
                {"idx": 2, "itemCode": "GEARBOX-04", "qty": 2.0},
            ],
        })),
        doc("stock_entry", "SE-DEMO-0001", serde_json::json!({
            "entryType": "Material Transfer",
            "items": [
                {"idx": 1, "itemCode": "WIDGET-01", "qty": 20.0, "sourceWarehouse": "WH-A"},
                {"idx": 2, "itemCode": "GEARBOX-04", "qty": 12.0, "sourceWarehouse": "WH-B"},
            ],
        })),
    ];

    let count = docs.len();
    for d in docs {
        store
            .insert(&d)
            .map_err(|e| anyhow::anyhow!("failed to seed {}/{}: {}", d.doctype, d.id, e))?;
    }

    info!("seeded {} demo documents", count);
    Ok(())
}
