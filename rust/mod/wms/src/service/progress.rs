use serde::Deserialize;

use openwms_host::{Event, SaveOpts};

use crate::model::{DeliveryItem, PickLocation};
use super::{Actor, WmsError, WmsService};

/// Optional per-line fields captured while picking/packing.
///
/// Partial-update semantics: only fields that are present overwrite the
/// stored line; omitted fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverrides {
    /// Slot the quantity was actually taken from.
    pub location: Option<String>,
    /// Batch scanned for batch-tracked items.
    pub batch_no: Option<String>,
    /// Box the quantity went into.
    pub box_no: Option<String>,
}

impl WmsService {
    /// Record picking progress on one pick-list line.
    ///
    /// The line is addressed by its walking-order `idx`. Emits a
    /// `pick_progress_updated` event to the acting user.
    pub fn record_pick_progress(
        &self,
        pick_list_id: &str,
        row_idx: u32,
        picked_qty: f64,
        overrides: ProgressOverrides,
        actor: &Actor,
    ) -> Result<PickLocation, WmsError> {
        let mut doc = self.pick_lists.get(pick_list_id)?;

        let updated = {
            let line = doc
                .body
                .locations
                .iter_mut()
                .find(|l| l.idx == row_idx)
                .ok_or_else(|| {
                    WmsError::NotFound(format!(
                        "row {} not found in pick list {}",
                        row_idx, pick_list_id
                    ))
                })?;

            check_qty(picked_qty, line.qty, row_idx, "picked")?;
            line.picked_qty = picked_qty;
            if let Some(location) = overrides.location {
                line.location = Some(location);
            }
            if let Some(batch_no) = overrides.batch_no {
                line.batch_no = Some(batch_no);
            }
            if let Some(box_no) = overrides.box_no {
                line.box_no = Some(box_no);
            }
            line.clone()
        };

        self.pick_lists
            .save(&mut doc, SaveOpts { bypass_permissions: true })?;

        self.events.emit(Event {
            name: "pick_progress_updated".into(),
            payload: serde_json::json!({
                "pickList": pick_list_id,
                "rowIdx": row_idx,
                "pickedQty": picked_qty,
            }),
            user: Some(actor.user.clone()),
        });

        Ok(updated)
    }

    /// Record packing progress on one delivery-note line.
    ///
    /// Emits a `packing_progress_updated` event to the acting user.
    pub fn record_pack_progress(
        &self,
        delivery_note_id: &str,
        row_idx: u32,
        packed_qty: f64,
        overrides: ProgressOverrides,
        actor: &Actor,
    ) -> Result<DeliveryItem, WmsError> {
        let mut doc = self.delivery_notes.get(delivery_note_id)?;

        let updated = {
            let line = doc
                .body
                .items
                .iter_mut()
                .find(|l| l.idx == row_idx)
                .ok_or_else(|| {
                    WmsError::NotFound(format!(
                        "row {} not found in delivery note {}",
                        row_idx, delivery_note_id
                    ))
                })?;

            check_qty(packed_qty, line.qty, row_idx, "packed")?;
            line.packed_qty = packed_qty;
            if let Some(batch_no) = overrides.batch_no {
                line.batch_no = Some(batch_no);
            }
            if let Some(box_no) = overrides.box_no {
                line.box_no = Some(box_no);
            }
            line.clone()
        };

        self.delivery_notes
            .save(&mut doc, SaveOpts { bypass_permissions: true })?;

        self.events.emit(Event {
            name: "packing_progress_updated".into(),
            payload: serde_json::json!({
                "deliveryNote": delivery_note_id,
                "rowIdx": row_idx,
                "packedQty": packed_qty,
            }),
            user: Some(actor.user.clone()),
        });

        Ok(updated)
    }
}

/// Fulfilled quantity must stay within `0 ..= requested`.
fn check_qty(fulfilled: f64, requested: f64, row_idx: u32, verb: &str) -> Result<(), WmsError> {
    if fulfilled < 0.0 {
        return Err(WmsError::Validation(format!(
            "row {}: {} quantity cannot be negative",
            row_idx, verb
        )));
    }
    if fulfilled > requested {
        return Err(WmsError::Validation(format!(
            "row {}: {} quantity {} exceeds requested {}",
            row_idx, verb, fulfilled, requested
        )));
    }
    Ok(())
}
