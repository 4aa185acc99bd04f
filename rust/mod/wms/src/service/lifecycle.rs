use tracing::warn;

use openwms_host::{DocQuery, FieldValue, SaveOpts};

use crate::model::{DeliveryNote, DocStatus, PickList, SessionStatus};
use super::route::estimate_minutes;
use super::{Actor, WmsError, WmsService};

/// Recompute the derived pick metrics (totals and time estimate).
pub(crate) fn recompute_pick_metrics(pick: &mut PickList) {
    pick.total_items = pick.locations.len() as u32;
    pick.total_qty = pick.locations.iter().map(|l| l.qty).sum();
    pick.estimated_minutes = estimate_minutes(pick.locations.len());
}

/// Every line needs a warehouse before the list can go to the floor.
pub(crate) fn validate_pick_lines(pick: &PickList) -> Result<(), WmsError> {
    for loc in &pick.locations {
        if loc.warehouse.is_empty() {
            return Err(WmsError::Validation(format!(
                "row {}: warehouse is required",
                loc.idx
            )));
        }
    }
    Ok(())
}

impl WmsService {
    /// Submit a pick list: validate lines, refresh metrics, open it for
    /// picking. Optionally auto-creates a picking session.
    pub fn submit_pick_list(&self, id: &str, actor: &Actor) -> Result<PickList, WmsError> {
        let mut doc = self.pick_lists.get(id)?;
        if doc.body.status != DocStatus::Draft {
            return Err(WmsError::Validation(format!(
                "pick list {} cannot be submitted in {} status",
                id, doc.body.status
            )));
        }

        validate_pick_lines(&doc.body)?;
        recompute_pick_metrics(&mut doc.body);
        doc.body.status = DocStatus::Open;
        self.pick_lists.save(&mut doc, SaveOpts::default())?;

        if self.get_settings()?.auto_create_pick_session {
            // Session bookkeeping must not fail the submit.
            if let Err(e) = self.create_pick_session(id, actor, true) {
                warn!(pick_list = id, error = %e, "failed to auto-create picking session");
            }
        }

        Ok(doc.body)
    }

    /// Cancel a pick list and any picking sessions still running on it.
    pub fn cancel_pick_list(&self, id: &str) -> Result<PickList, WmsError> {
        let mut doc = self.pick_lists.get(id)?;
        if doc.body.status == DocStatus::Completed {
            return Err(WmsError::Validation(format!(
                "pick list {} is already completed",
                id
            )));
        }

        doc.body.status = DocStatus::Cancelled;
        doc.body.lock = None;
        self.pick_lists.save(&mut doc, SaveOpts::default())?;

        let open_sessions = self.sessions.query(
            &DocQuery::default()
                .filter("pickList", FieldValue::Text(id.to_string()))
                .filter("status", FieldValue::Text(SessionStatus::InProgress.as_str().into())),
        )?;
        for mut session in open_sessions {
            session.body.status = SessionStatus::Cancelled;
            self.sessions.save(&mut session, SaveOpts::default())?;
        }

        Ok(doc.body)
    }

    /// Submit a delivery note: refresh shipping totals and, when packing
    /// is mandatory, refuse while lines remain unpacked.
    pub fn submit_delivery_note(&self, id: &str) -> Result<DeliveryNote, WmsError> {
        let mut doc = self.delivery_notes.get(id)?;
        if doc.body.status != DocStatus::Draft {
            return Err(WmsError::Validation(format!(
                "delivery note {} cannot be submitted in {} status",
                id, doc.body.status
            )));
        }

        self.recompute_note_totals(&mut doc.body)?;

        if doc.body.require_packing {
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
        }

        doc.body.status = DocStatus::Open;
        self.delivery_notes.save(&mut doc, SaveOpts::default())?;
        Ok(doc.body)
    }

    /// Recompute a note's shipping totals from the item masters.
    pub(crate) fn recompute_note_totals(&self, note: &mut DeliveryNote) -> Result<(), WmsError> {
        let mut weight = 0.0;
        let mut volume = 0.0;
        for line in &note.items {
            if let Some(master) = self.items.try_get(&line.item_code)? {
                weight += master.body.weight_per_unit * line.qty;
                volume += master.body.volume_per_unit * line.qty;
            }
        }
        note.total_weight = weight;
        note.total_volume = volume;
        Ok(())
    }
}
