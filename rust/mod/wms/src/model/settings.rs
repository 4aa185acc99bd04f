use serde::{Deserialize, Serialize};

/// Module settings, stored as a singleton document.
///
/// Reading settings when none are stored yields the defaults below, so
/// the module works on a fresh installation without configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WmsSettings {
    #[serde(default = "default_true")]
    pub enable_barcode_scanning: bool,

    #[serde(default = "default_true")]
    pub enable_route_optimization: bool,

    #[serde(default = "default_true")]
    pub enable_sound: bool,

    #[serde(default = "default_true")]
    pub enable_vibration: bool,

    /// Per-package weight limit (kg).
    #[serde(default = "default_max_weight")]
    pub max_package_weight: f64,

    /// Per-package volume limit (m³).
    #[serde(default = "default_max_volume")]
    pub max_package_volume: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_packing_location: Option<String>,

    /// Start a picking session automatically when a pick list is submitted.
    #[serde(default)]
    pub auto_create_pick_session: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_weight() -> f64 {
    25.0
}

fn default_max_volume() -> f64 {
    0.1
}

impl Default for WmsSettings {
    fn default() -> Self {
        Self {
            enable_barcode_scanning: true,
            enable_route_optimization: true,
            enable_sound: true,
            enable_vibration: true,
            max_package_weight: default_max_weight(),
            max_package_volume: default_max_volume(),
            default_packing_location: None,
            auto_create_pick_session: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let settings: WmsSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, WmsSettings::default());
        assert_eq!(settings.max_package_weight, 25.0);
        assert_eq!(settings.max_package_volume, 0.1);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let settings: WmsSettings =
            serde_json::from_str(r#"{"maxPackageWeight": 40.0, "enableSound": false}"#).unwrap();
        assert_eq!(settings.max_package_weight, 40.0);
        assert!(!settings.enable_sound);
        assert_eq!(settings.max_package_volume, 0.1);
    }
}
