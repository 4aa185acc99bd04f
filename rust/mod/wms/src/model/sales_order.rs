use serde::{Deserialize, Serialize};

/// Sales order header, as far as fulfilment reads it.
///
/// Generated delivery notes copy these fields; order lines, pricing and
/// tax stay with the host platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    pub customer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "OPEN".to_string()
}
