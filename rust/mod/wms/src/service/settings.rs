use openwms_core::merge_patch;
use openwms_host::SaveOpts;

use crate::model::WmsSettings;
use super::{WmsError, WmsService};

/// Well-known id of the singleton settings document.
const SETTINGS_ID: &str = "settings";

impl WmsService {
    /// Read the module settings, falling back to defaults when none are
    /// stored yet.
    pub fn get_settings(&self) -> Result<WmsSettings, WmsError> {
        Ok(self
            .settings
            .try_get(SETTINGS_ID)?
            .map(|doc| doc.body)
            .unwrap_or_default())
    }

    /// Apply a JSON merge-patch to the settings and persist them.
    pub fn update_settings(&self, patch: serde_json::Value) -> Result<WmsSettings, WmsError> {
        let current = self.settings.try_get(SETTINGS_ID)?;

        let base = current
            .as_ref()
            .map(|doc| &doc.body)
            .cloned()
            .unwrap_or_default();
        let mut json = serde_json::to_value(&base)
            .map_err(|e| WmsError::Storage(e.to_string()))?;
        merge_patch(&mut json, &patch);
        let updated: WmsSettings = serde_json::from_value(json)
            .map_err(|e| WmsError::Validation(format!("invalid settings patch: {}", e)))?;

        match current {
            Some(mut doc) => {
                doc.body = updated.clone();
                self.settings.save(&mut doc, SaveOpts::default())?;
            }
            None => {
                self.settings.insert(SETTINGS_ID, &updated)?;
            }
        }
        Ok(updated)
    }

    /// Packing station suggested for new packing work, if configured.
    pub fn default_packing_location(&self) -> Result<Option<String>, WmsError> {
        Ok(self.get_settings()?.default_packing_location)
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testutil::*;

    #[test]
    fn defaults_when_nothing_stored() {
        let (service, _) = make_service();
        let settings = service.get_settings().unwrap();
        assert!(settings.enable_barcode_scanning);
        assert_eq!(settings.max_package_weight, 25.0);
        assert_eq!(settings.max_package_volume, 0.1);
        assert!(service.default_packing_location().unwrap().is_none());
    }

    #[test]
    fn patch_creates_then_updates() {
        let (service, _) = make_service();

        let updated = service
            .update_settings(serde_json::json!({"maxPackageWeight": 40.0}))
            .unwrap();
        assert_eq!(updated.max_package_weight, 40.0);
        // Untouched fields keep their defaults.
        assert_eq!(updated.max_package_volume, 0.1);

        let again = service
            .update_settings(serde_json::json!({"defaultPackingLocation": "PACK-01"}))
            .unwrap();
        assert_eq!(again.max_package_weight, 40.0);
        assert_eq!(again.default_packing_location.as_deref(), Some("PACK-01"));

        assert_eq!(
            service.default_packing_location().unwrap().as_deref(),
            Some("PACK-01")
        );
    }

    #[test]
    fn bad_patch_is_a_validation_error() {
        let (service, _) = make_service();
        let err = service
            .update_settings(serde_json::json!({"maxPackageWeight": "heavy"}))
            .unwrap_err();
        assert!(err.to_string().contains("invalid settings patch"));
    }
}
