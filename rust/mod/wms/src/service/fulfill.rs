use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use openwms_core::{new_id, now_rfc3339};
use openwms_host::SaveOpts;

use crate::model::{
    DeliveryItem, DeliveryNote, DocStatus, PickLocation, PlannedPackage, Shipment,
};
use super::{Actor, WmsError, WmsService};

/// Delivery notes generated from a completed pick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResult {
    pub delivery_notes: Vec<String>,
}

impl WmsService {
    /// Roll a picked pick list into delivery notes, one per sales order.
    ///
    /// Lines without a sales order are skipped. A failure on any order
    /// aborts the whole run with an error naming that order; notes
    /// already created in the run are left behind (no rollback).
    pub fn create_delivery_notes(
        &self,
        pick_list_id: &str,
        actor: &Actor,
    ) -> Result<ComposeResult, WmsError> {
        let mut doc = self.pick_lists.get(pick_list_id)?;

        // Group lines by sales order, preserving first-seen order.
        let mut order_ids: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<PickLocation>> = HashMap::new();
        for loc in &doc.body.locations {
            let Some(order_id) = loc.sales_order.as_deref().filter(|s| !s.is_empty()) else {
                continue;
            };
            if !groups.contains_key(order_id) {
                order_ids.push(order_id.to_string());
            }
            groups.entry(order_id.to_string()).or_default().push(loc.clone());
        }

        let mut created = Vec::new();
        for order_id in order_ids {
            let note_id = self
                .compose_note(pick_list_id, &order_id, &groups[&order_id])
                .map_err(|e| {
                    WmsError::Validation(format!(
                        "failed to create delivery note for sales order {}: {}",
                        order_id, e
                    ))
                })?;
            created.push(note_id);
        }

        if !created.is_empty() {
            doc.body.status = DocStatus::Completed;
            doc.body.lock = None;
            self.pick_lists
                .save(&mut doc, SaveOpts { bypass_permissions: true })?;
        }

        info!(
            pick_list = pick_list_id,
            user = %actor.user,
            count = created.len(),
            "delivery notes generated"
        );
        Ok(ComposeResult { delivery_notes: created })
    }

    /// Build and insert one delivery note for one sales-order group.
    fn compose_note(
        &self,
        pick_list_id: &str,
        order_id: &str,
        lines: &[PickLocation],
    ) -> Result<String, WmsError> {
        let order = self.sales_orders.get(order_id)?;

        let items = lines
            .iter()
            .enumerate()
            .map(|(i, loc)| DeliveryItem {
                idx: (i + 1) as u32,
                item_code: loc.item_code.clone(),
                item_name: loc.item_name.clone(),
                // Ship what was actually picked; fall back to the
                // requested quantity when picking wasn't recorded.
                qty: if loc.picked_qty > 0.0 { loc.picked_qty } else { loc.qty },
                packed_qty: 0.0,
                uom: loc.uom.clone(),
                batch_no: loc.batch_no.clone(),
                box_no: loc.box_no.clone(),
                against_sales_order: Some(order_id.to_string()),
            })
            .collect();

        let mut note = DeliveryNote {
            customer: order.body.customer.clone(),
            customer_name: order.body.customer_name.clone(),
            status: DocStatus::Draft,
            items,
            lock: None,
            require_packing: false,
            total_weight: 0.0,
            total_volume: 0.0,
            pick_list: Some(pick_list_id.to_string()),
        };
        self.recompute_note_totals(&mut note)?;

        let note_id = new_id();
        self.delivery_notes.insert(&note_id, &note)?;
        Ok(note_id)
    }

    /// Create a shipment from a fully packed delivery note.
    ///
    /// Rejects the request while any line has unpacked quantity left,
    /// listing the offending items. On success the note is completed and
    /// its lock released; a linked pick list is flagged as delivered.
    pub fn create_shipment(
        &self,
        delivery_note_id: &str,
        packages: Vec<PlannedPackage>,
        actor: &Actor,
    ) -> Result<String, WmsError> {
        let mut doc = self.delivery_notes.get(delivery_note_id)?;

        let unpacked: Vec<&str> = doc
            .body
            .items
            .iter()
            .filter(|l| l.packed_qty < l.qty)
            .map(|l| l.item_code.as_str())
            .collect();
        if !unpacked.is_empty() {
            return Err(WmsError::Validation(format!(
                "following items are not fully packed: {}",
                unpacked.join(", ")
            )));
        }

        let shipment_id = new_id();
        self.shipments.insert(
            &shipment_id,
            &Shipment {
                delivery_note: delivery_note_id.to_string(),
                packages,
                status: "OPEN".into(),
                created_by: actor.user.clone(),
                created_at: now_rfc3339(),
            },
        )?;

        doc.body.status = DocStatus::Completed;
        doc.body.lock = None;
        self.delivery_notes
            .save(&mut doc, SaveOpts { bypass_permissions: true })?;

        // Flag the originating pick list. Losing this flag must not fail
        // the shipment, so the error is only logged.
        if let Some(pick_list_id) = doc.body.pick_list.as_deref() {
            match self.pick_lists.try_get(pick_list_id) {
                Ok(Some(mut pick_doc)) => {
                    pick_doc.body.delivered = true;
                    if let Err(e) = self
                        .pick_lists
                        .save(&mut pick_doc, SaveOpts { bypass_permissions: true })
                    {
                        warn!(pick_list = pick_list_id, error = %e, "failed to flag pick list as delivered");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(pick_list = pick_list_id, error = %e, "failed to load linked pick list");
                }
            }
        }

        Ok(shipment_id)
    }
}
