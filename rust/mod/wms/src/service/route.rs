use std::collections::HashMap;

use serde::Serialize;

use openwms_host::SaveOpts;

use crate::model::PickLocation;
use super::{WmsError, WmsService, lifecycle};

/// Result of a route optimization, for display to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// Number of stops on the walk.
    pub steps: usize,
    /// Display heuristic, not a hard constraint.
    pub estimated_minutes: f64,
}

/// Rough walking-time estimate: fixed setup plus a constant per stop.
pub(crate) fn estimate_minutes(steps: usize) -> f64 {
    steps as f64 * 0.5 + 2.0
}

/// Reorder pick locations to minimise operator walking.
///
/// Lines are grouped by warehouse in first-seen order (so the area order
/// is stable for a given input), sorted within each group by slot code —
/// falling back to item code where the layout is unmapped — and
/// renumbered from 1. The output is always a permutation of the input.
pub(crate) fn optimize_locations(locations: Vec<PickLocation>) -> Vec<PickLocation> {
    let mut area_order: Vec<String> = Vec::new();
    let mut by_area: HashMap<String, Vec<PickLocation>> = HashMap::new();

    for loc in locations {
        if !by_area.contains_key(&loc.warehouse) {
            area_order.push(loc.warehouse.clone());
        }
        by_area.entry(loc.warehouse.clone()).or_default().push(loc);
    }

    let mut optimized = Vec::new();
    for area in area_order {
        let mut group = by_area.remove(&area).unwrap_or_default();
        group.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        optimized.extend(group);
    }

    for (i, loc) in optimized.iter_mut().enumerate() {
        loc.idx = (i + 1) as u32;
    }
    optimized
}

/// Slot code when mapped, item code otherwise; item code breaks ties.
fn sort_key(loc: &PickLocation) -> (&str, &str) {
    let primary = loc
        .location
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&loc.item_code);
    (primary, &loc.item_code)
}

impl WmsService {
    /// Reorder a pick list's walking sequence and persist it.
    pub fn optimize_pick_route(&self, id: &str) -> Result<RouteSummary, WmsError> {
        let mut doc = self.pick_lists.get(id)?;
        if doc.body.locations.is_empty() {
            return Err(WmsError::Validation("no items to optimize".into()));
        }

        let locations = std::mem::take(&mut doc.body.locations);
        doc.body.locations = optimize_locations(locations);
        lifecycle::recompute_pick_metrics(&mut doc.body);
        self.pick_lists.save(&mut doc, SaveOpts::default())?;

        let steps = doc.body.locations.len();
        Ok(RouteSummary {
            steps,
            estimated_minutes: estimate_minutes(steps),
        })
    }
}
