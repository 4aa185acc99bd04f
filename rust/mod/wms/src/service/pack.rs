use crate::model::{PackagePlan, PackedLine, PlannedPackage};
use super::{WmsError, WmsService};

/// Per-package capacity limits.
#[derive(Debug, Clone, Copy)]
pub struct PackLimits {
    pub max_weight: f64,
    pub max_volume: f64,
}

/// One delivery line with its total shipping weight/volume.
#[derive(Debug, Clone)]
pub(crate) struct PackInput {
    pub item_code: String,
    pub item_name: Option<String>,
    pub qty: f64,
    pub weight: f64,
    pub volume: f64,
}

/// Sequential first-fit packing.
///
/// Items are taken in the given order — deliberately NOT sorted by size
/// — and accumulated into the current package. The moment a line would
/// push either total over its limit, the current package is closed (if
/// non-empty) and a fresh one opened. A line that alone exceeds a limit
/// still ships, alone in its own package; lines are never split.
pub(crate) fn plan_packages(inputs: &[PackInput], limits: &PackLimits) -> PackagePlan {
    let mut packages: Vec<PlannedPackage> = Vec::new();
    let mut current = PlannedPackage::default();

    for input in inputs {
        let over_weight = current.weight + input.weight > limits.max_weight;
        let over_volume = current.volume + input.volume > limits.max_volume;
        if (over_weight || over_volume) && !current.items.is_empty() {
            packages.push(std::mem::take(&mut current));
        }

        current.items.push(PackedLine {
            item_code: input.item_code.clone(),
            item_name: input.item_name.clone(),
            qty: input.qty,
        });
        current.weight += input.weight;
        current.volume += input.volume;
    }

    if !current.items.is_empty() {
        packages.push(current);
    }

    PackagePlan {
        total_packages: packages.len(),
        packages,
    }
}

impl WmsService {
    /// Suggest a package arrangement for a delivery note.
    ///
    /// Weights/volumes come from the item masters; a missing master
    /// contributes zero. Limits come from the module settings. The plan
    /// is a suggestion only — nothing is persisted.
    pub fn optimize_packing(&self, delivery_note_id: &str) -> Result<PackagePlan, WmsError> {
        let doc = self.delivery_notes.get(delivery_note_id)?;
        if doc.body.items.is_empty() {
            return Err(WmsError::Validation("no items to pack".into()));
        }

        let settings = self.get_settings()?;
        let limits = PackLimits {
            max_weight: settings.max_package_weight,
            max_volume: settings.max_package_volume,
        };

        let mut inputs = Vec::with_capacity(doc.body.items.len());
        for line in &doc.body.items {
            let master = self.items.try_get(&line.item_code)?;
            let (wpu, vpu, name) = master
                .map(|m| {
                    (
                        m.body.weight_per_unit,
                        m.body.volume_per_unit,
                        Some(m.body.item_name),
                    )
                })
                .unwrap_or((0.0, 0.0, None));
            inputs.push(PackInput {
                item_code: line.item_code.clone(),
                item_name: line.item_name.clone().or(name),
                qty: line.qty,
                weight: wpu * line.qty,
                volume: vpu * line.qty,
            });
        }

        Ok(plan_packages(&inputs, &limits))
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testutil::*;
    use super::*;

    fn input(code: &str, weight: f64, volume: f64) -> PackInput {
        PackInput {
            item_code: code.into(),
            item_name: None,
            qty: 1.0,
            weight,
            volume,
        }
    }

    const LIMITS: PackLimits = PackLimits {
        max_weight: 25.0,
        max_volume: 0.1,
    };

    #[test]
    fn three_tens_against_twenty_five() {
        let plan = plan_packages(
            &[input("A", 10.0, 0.0), input("B", 10.0, 0.0), input("C", 10.0, 0.0)],
            &LIMITS,
        );

        assert_eq!(plan.total_packages, 2);
        assert_eq!(plan.packages[0].items.len(), 2);
        assert_eq!(plan.packages[0].weight, 20.0);
        assert_eq!(plan.packages[1].items.len(), 1);
        assert_eq!(plan.packages[1].weight, 10.0);
    }

    #[test]
    fn volume_limit_also_closes_packages() {
        let plan = plan_packages(
            &[input("A", 1.0, 0.06), input("B", 1.0, 0.06)],
            &LIMITS,
        );
        assert_eq!(plan.total_packages, 2);
    }

    #[test]
    fn no_package_exceeds_limits_unless_single_item() {
        let plan = plan_packages(
            &[
                input("A", 12.0, 0.01),
                input("B", 30.0, 0.01), // alone exceeds max_weight
                input("C", 12.0, 0.01),
                input("D", 12.0, 0.01),
            ],
            &LIMITS,
        );

        for package in &plan.packages {
            if package.items.len() > 1 {
                assert!(package.weight <= LIMITS.max_weight);
                assert!(package.volume <= LIMITS.max_volume);
            }
        }
        // The oversize line shipped alone.
        let oversize = plan
            .packages
            .iter()
            .find(|p| p.items.iter().any(|i| i.item_code == "B"))
            .unwrap();
        assert_eq!(oversize.items.len(), 1);
        assert_eq!(oversize.weight, 30.0);
    }

    #[test]
    fn keeps_given_order_no_size_sorting() {
        let plan = plan_packages(
            &[input("SMALL", 1.0, 0.0), input("BIG", 24.0, 0.0), input("MID", 10.0, 0.0)],
            &LIMITS,
        );
        let order: Vec<&str> = plan
            .packages
            .iter()
            .flat_map(|p| p.items.iter().map(|i| i.item_code.as_str()))
            .collect();
        assert_eq!(order, vec!["SMALL", "BIG", "MID"]);
    }

    #[test]
    fn empty_input_gives_empty_plan() {
        let plan = plan_packages(&[], &LIMITS);
        assert_eq!(plan.total_packages, 0);
        assert!(plan.packages.is_empty());
    }

    #[test]
    fn service_reads_masters_and_settings() {
        let (service, _) = make_service();
        service.items.insert("HEAVY", &item("HEAVY", 10.0, 0.001)).unwrap();
        service
            .delivery_notes
            .insert(
                "DN-1",
                &delivery_note(vec![
                    delivery_item(1, "HEAVY", 2.0),   // 20 kg
                    delivery_item(2, "HEAVY", 1.0),   // 10 kg -> next package
                    delivery_item(3, "UNKNOWN", 5.0), // no master -> zero weight
                ]),
            )
            .unwrap();

        let plan = service.optimize_packing("DN-1").unwrap();
        assert_eq!(plan.total_packages, 2);
        assert_eq!(plan.packages[0].weight, 20.0);
        assert_eq!(plan.packages[1].weight, 10.0);
        assert_eq!(plan.packages[1].items.len(), 2);
        // Master supplied the display name.
        assert_eq!(plan.packages[0].items[0].item_name.as_deref(), Some("HEAVY name"));
    }

    #[test]
    fn empty_note_is_a_validation_error() {
        let (service, _) = make_service();
        service.delivery_notes.insert("DN-1", &delivery_note(vec![])).unwrap();

        let err = service.optimize_packing("DN-1").unwrap_err();
        assert!(matches!(err, WmsError::Validation(_)));
        assert!(err.to_string().contains("no items to pack"));
    }
}
