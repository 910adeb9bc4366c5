use serde::{Deserialize, Serialize};

use super::catalog::ServiceType;
use super::customer::Customer;
use super::material::Material;
use super::record::ServiceRecord;

/// The whole persisted state. All four collections are always present;
/// any key missing in a loaded blob defaults to an empty list, which is
/// the single schema-evolution rule the persistence layer applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub customers: Vec<Customer>,
    pub materials: Vec<Material>,
    pub service_types: Vec<ServiceType>,
    pub services: Vec<ServiceRecord>,
}

impl AppState {
    /// Find-or-none lookups. Cross-entity references are soft: callers
    /// must handle `None` with a placeholder, never assume presence.
    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn find_material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn find_service_type(&self, id: &str) -> Option<&ServiceType> {
        self.service_types.iter().find(|t| t.id == id)
    }

    pub fn find_service(&self, id: &str) -> Option<&ServiceRecord> {
        self.services.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_top_level_keys_default_to_empty() {
        let state: AppState = serde_json::from_str(r#"{"customers":[]}"#).unwrap();
        assert!(state.customers.is_empty());
        assert!(state.materials.is_empty());
        assert!(state.service_types.is_empty());
        assert!(state.services.is_empty());

        let state: AppState = serde_json::from_str("{}").unwrap();
        assert!(state.services.is_empty());
    }

    #[test]
    fn test_blob_keys_are_camel_case() {
        let json = serde_json::to_value(AppState::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["customers", "materials", "serviceTypes", "services"]);
    }
}
