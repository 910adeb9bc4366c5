use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::{self, Cents};

pub type MaterialId = String;

/// Stock below this shows up in the general restock alert list.
pub const LOW_STOCK_THRESHOLD: i64 = 10;
/// Stock below this gets the urgent highlight. Independent of the
/// general threshold, not a state machine.
pub const CRITICAL_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "money::units")]
    pub purchase_price: Cents,
    #[serde(default, with = "money::units")]
    pub selling_price: Cents,
    /// Manually maintained. Saving a service does NOT decrement stock;
    /// negative values are allowed.
    #[serde(default)]
    pub stock: i64,
}

impl Material {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description: String::new(),
            purchase_price: 0,
            selling_price: 0,
            stock: 0,
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    pub fn is_critical_stock(&self) -> bool {
        self.stock < CRITICAL_STOCK_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_classifications_are_independent() {
        let mut material = Material::new("Cable".into());

        material.stock = 4;
        assert!(material.is_low_stock());
        assert!(material.is_critical_stock());

        material.stock = 7;
        assert!(material.is_low_stock());
        assert!(!material.is_critical_stock());

        material.stock = 10;
        assert!(!material.is_low_stock());
        assert!(!material.is_critical_stock());
    }

    #[test]
    fn test_negative_stock_is_allowed() {
        let mut material = Material::new("Breaker".into());
        material.stock = -3;
        assert!(material.is_low_stock());
        assert!(material.is_critical_stock());
    }
}
