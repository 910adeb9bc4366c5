use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CustomerId = String;

/// Display label used when a service record points at a customer that has
/// since been deleted. References are soft, never enforced on delete.
pub const UNKNOWN_CUSTOMER: &str = "Unknown customer";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    /// Single-line address kept for older blobs and list views. Recomposed
    /// from the components below whenever they are edited together.
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub street: String,
}

impl Customer {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            phone: String::new(),
            address: String::new(),
            cep: String::new(),
            state: String::new(),
            city: String::new(),
            neighborhood: String::new(),
            street: String::new(),
        }
    }

    /// Assemble the single-line address from the components:
    /// "{street}, {neighborhood}, {city}-{state}"
    pub fn compose_address(&self) -> String {
        format!(
            "{}, {}, {}-{}",
            self.street, self.neighborhood, self.city, self.state
        )
    }

    pub fn has_address_components(&self) -> bool {
        !self.street.is_empty()
            || !self.neighborhood.is_empty()
            || !self.city.is_empty()
            || !self.state.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_address() {
        let mut customer = Customer::new("Ana".into());
        customer.street = "Rua das Flores, 12".into();
        customer.neighborhood = "Centro".into();
        customer.city = "Bauru".into();
        customer.state = "SP".into();
        assert_eq!(
            customer.compose_address(),
            "Rua das Flores, 12, Centro, Bauru-SP"
        );
    }

    #[test]
    fn test_new_customer_has_unique_id() {
        let a = Customer::new("Ana".into());
        let b = Customer::new("Ana".into());
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }
}
