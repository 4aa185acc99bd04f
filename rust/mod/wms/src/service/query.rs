use serde::Serialize;

use openwms_core::{ListParams, ListResult};
use openwms_host::{DocQuery, FieldValue};

use crate::model::{DocLock, DocStatus};
use super::{WmsError, WmsService};

/// One pick-list line joined with its item master, ready for the floor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickLineDetail {
    pub idx: u32,
    pub item_code: String,
    pub item_name: String,
    pub qty: f64,
    pub picked_qty: f64,
    pub uom: String,
    pub warehouse: String,
    pub location: String,
    pub batch_no: String,
    pub has_batch_no: bool,
    /// Barcode to match scans against; item code when none registered.
    pub barcode: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickListDetails {
    pub id: String,
    pub status: DocStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<DocLock>,
    pub items: Vec<PickLineDetail>,
    pub total_items: usize,
    pub total_qty: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLineDetail {
    pub idx: u32,
    pub item_code: String,
    pub item_name: String,
    pub qty: f64,
    pub packed_qty: f64,
    pub uom: String,
    pub batch_no: String,
    pub box_no: String,
    /// Line shipping weight (kg), from the item master.
    pub weight: f64,
    /// Line shipping volume (m³), from the item master.
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryNoteDetails {
    pub id: String,
    pub customer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub status: DocStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<DocLock>,
    pub items: Vec<DeliveryLineDetail>,
    pub total_items: usize,
    pub total_qty: f64,
    pub total_weight: f64,
    pub total_volume: f64,
}

/// Delivery note still waiting for packing work.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpackedNote {
    pub id: String,
    pub customer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub status: DocStatus,
    pub item_count: usize,
    /// Total quantity still to pack across all lines.
    pub remaining_qty: f64,
}

impl WmsService {
    /// Everything the picking UI needs for one pick list, with item
    /// masters joined in.
    pub fn pick_list_details(&self, id: &str) -> Result<PickListDetails, WmsError> {
        let doc = self.pick_lists.get(id)?;

        let mut items = Vec::with_capacity(doc.body.locations.len());
        for loc in &doc.body.locations {
            let master = self.items.try_get(&loc.item_code)?.map(|m| m.body);
            let barcode = self
                .barcode_for(&loc.item_code)?
                .unwrap_or_else(|| loc.item_code.clone());

            items.push(PickLineDetail {
                idx: loc.idx,
                item_code: loc.item_code.clone(),
                item_name: loc
                    .item_name
                    .clone()
                    .or_else(|| master.as_ref().map(|m| m.item_name.clone()))
                    .unwrap_or_else(|| loc.item_code.clone()),
                qty: loc.qty,
                picked_qty: loc.picked_qty,
                uom: loc
                    .uom
                    .clone()
                    .or_else(|| master.as_ref().map(|m| m.stock_uom.clone()))
                    .unwrap_or_default(),
                warehouse: loc.warehouse.clone(),
                location: loc.location.clone().unwrap_or_default(),
                batch_no: loc.batch_no.clone().unwrap_or_default(),
                has_batch_no: master.as_ref().is_some_and(|m| m.has_batch_no),
                barcode,
            });
        }

        Ok(PickListDetails {
            id: doc.id,
            status: doc.body.status,
            lock: doc.body.lock,
            total_items: items.len(),
            total_qty: items.iter().map(|i| i.qty).sum(),
            items,
        })
    }

    /// Everything the packing UI needs for one delivery note.
    pub fn delivery_note_details(&self, id: &str) -> Result<DeliveryNoteDetails, WmsError> {
        let doc = self.delivery_notes.get(id)?;

        let mut items = Vec::with_capacity(doc.body.items.len());
        for line in &doc.body.items {
            let master = self.items.try_get(&line.item_code)?.map(|m| m.body);
            let (wpu, vpu) = master
                .as_ref()
                .map(|m| (m.weight_per_unit, m.volume_per_unit))
                .unwrap_or((0.0, 0.0));

            items.push(DeliveryLineDetail {
                idx: line.idx,
                item_code: line.item_code.clone(),
                item_name: line
                    .item_name
                    .clone()
                    .or_else(|| master.as_ref().map(|m| m.item_name.clone()))
                    .unwrap_or_else(|| line.item_code.clone()),
                qty: line.qty,
                packed_qty: line.packed_qty,
                uom: line
                    .uom
                    .clone()
                    .or_else(|| master.as_ref().map(|m| m.stock_uom.clone()))
                    .unwrap_or_default(),
                batch_no: line.batch_no.clone().unwrap_or_default(),
                box_no: line.box_no.clone().unwrap_or_default(),
                weight: wpu * line.qty,
                volume: vpu * line.qty,
            });
        }

        Ok(DeliveryNoteDetails {
            id: doc.id,
            customer: doc.body.customer,
            customer_name: doc.body.customer_name,
            status: doc.body.status,
            lock: doc.body.lock,
            total_items: items.len(),
            total_qty: items.iter().map(|i| i.qty).sum(),
            total_weight: doc.body.total_weight,
            total_volume: doc.body.total_volume,
            items,
        })
    }

    /// Delivery notes with packing work left, oldest first.
    ///
    /// `total` counts all matching notes; `items` is the requested page.
    pub fn unpacked_delivery_notes(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<UnpackedNote>, WmsError> {
        let docs = self.delivery_notes.query(&DocQuery::default())?;

        let matching: Vec<UnpackedNote> = docs
            .into_iter()
            .filter(|doc| !doc.body.status.is_terminal())
            .filter_map(|doc| {
                let remaining: f64 = doc
                    .body
                    .items
                    .iter()
                    .map(|l| (l.qty - l.packed_qty).max(0.0))
                    .sum();
                (remaining > 0.0).then(|| UnpackedNote {
                    id: doc.id,
                    customer: doc.body.customer,
                    customer_name: doc.body.customer_name,
                    status: doc.body.status,
                    item_count: doc.body.items.len(),
                    remaining_qty: remaining,
                })
            })
            .collect();

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(params.offset)
            .take(params.limit)
            .collect();
        Ok(ListResult { items, total })
    }

    /// Primary registered barcode for an item, if any.
    fn barcode_for(&self, item_code: &str) -> Result<Option<String>, WmsError> {
        let entries = self.barcodes.query(
            &DocQuery::default()
                .filter("itemCode", FieldValue::Text(item_code.to_string()))
                .limit(1),
        )?;
        Ok(entries.into_iter().next().map(|doc| doc.body.barcode))
    }
}
