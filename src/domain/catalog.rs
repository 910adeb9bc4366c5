use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::{self, Cents};

pub type ServiceTypeId = String;

/// A reusable price-list entry for labor items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceType {
    pub id: ServiceTypeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "money::units")]
    pub base_value: Cents,
}

impl ServiceType {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description: String::new(),
            base_value: 0,
        }
    }
}
