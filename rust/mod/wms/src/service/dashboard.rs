use serde::Serialize;

use openwms_host::FieldValue;

use crate::model::{DocStatus, SessionStatus};
use super::{WmsError, WmsService};

/// Pick-list counts by lifecycle state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickListCounts {
    pub draft: u64,
    pub open: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub cancelled: u64,
}

/// Aggregated warehouse-floor overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub pick_lists: PickListCounts,
    /// Delivery notes with packing work left.
    pub unpacked_delivery_notes: usize,
    /// Picking sessions currently running.
    pub active_sessions: u64,
    pub shipments: u64,
}

impl WmsService {
    /// Read-only aggregation for the floor dashboard.
    pub fn dashboard(&self) -> Result<DashboardData, WmsError> {
        let by_status = |status: DocStatus| -> Result<u64, WmsError> {
            Ok(self.pick_lists.count(&[(
                "status".to_string(),
                FieldValue::Text(status.as_str().to_string()),
            )])?)
        };

        let pick_lists = PickListCounts {
            draft: by_status(DocStatus::Draft)?,
            open: by_status(DocStatus::Open)?,
            in_progress: by_status(DocStatus::InProgress)?,
            completed: by_status(DocStatus::Completed)?,
            cancelled: by_status(DocStatus::Cancelled)?,
        };

        let active_sessions = self.sessions.count(&[(
            "status".to_string(),
            FieldValue::Text(SessionStatus::InProgress.as_str().to_string()),
        )])?;

        let shipments = self.shipments.count(&[])?;

        Ok(DashboardData {
            pick_lists,
            unpacked_delivery_notes: self
                .unpacked_delivery_notes(&Default::default())?
                .total,
            active_sessions,
            shipments,
        })
    }
}
