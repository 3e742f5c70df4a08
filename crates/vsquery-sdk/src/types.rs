//! Request types for the Viessmann platform

use serde::{Deserialize, Serialize};
use vsquery_common::{API_BASE_URL, IAM_BASE_URL};

/// Base URLs of the two services the SDK talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Identity provider (authorize and token endpoints)
    pub iam_base_url: String,
    /// Resource API
    pub api_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            iam_base_url: IAM_BASE_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
        }
    }
}

/// Identifies one device whose features are requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureQuery {
    pub installation_id: String,
    pub gateway_id: String,
    /// Device on the gateway, `"0"` for the boiler itself
    pub device_id: String,
}

impl FeatureQuery {
    pub fn new(
        installation_id: impl Into<String>,
        gateway_id: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            installation_id: installation_id.into(),
            gateway_id: gateway_id.into(),
            device_id: device_id.into(),
        }
    }

    /// Path of the features resource, relative to the API base URL
    pub fn path(&self) -> String {
        format!(
            "/iot/v2/features/installations/{}/gateways/{}/devices/{}/features",
            self.installation_id, self.gateway_id, self.device_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_query_path() {
        let query = FeatureQuery::new("12345", "7571381573112225", "0");
        assert_eq!(
            query.path(),
            "/iot/v2/features/installations/12345/gateways/7571381573112225/devices/0/features"
        );
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.iam_base_url, "https://iam.viessmann.com");
        assert_eq!(endpoints.api_base_url, "https://api.viessmann-platform.io");
    }
}
