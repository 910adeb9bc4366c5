use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::{
    compute_totals, normalize_installments, AppState, Cents, Customer, Labor, Material,
    MaterialItem, PaymentMethod, ServiceRecord, ServiceStatus, ServiceType,
};
use crate::storage::Store;

use super::AppError;

/// Application service holding the canonical in-memory state. Every
/// successful mutation replaces the affected collection and serializes the
/// whole snapshot back to the store; there are no partial patches.
pub struct AppService {
    store: Store,
    state: AppState,
}

/// Form input for creating a customer. Empty address components are fine;
/// when any is set the single-line address is recomposed.
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub cep: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}

/// Partial edit: only `Some` fields change.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub cep: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub street: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialInput {
    pub name: String,
    pub description: String,
    pub purchase_price: Cents,
    pub selling_price: Cents,
    pub stock: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub purchase_price: Option<Cents>,
    pub selling_price: Option<Cents>,
    pub stock: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceTypeInput {
    pub name: String,
    pub description: String,
    pub base_value: Cents,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_value: Option<Cents>,
}

/// Form input for a service record. Labor comes either itemized against
/// the price catalog or as a flat entered value.
#[derive(Debug, Clone)]
pub struct ServiceInput {
    pub customer_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub labor: Labor,
    pub materials: Vec<MaterialItem>,
    pub payment_method: PaymentMethod,
    pub installments: u32,
    pub status: ServiceStatus,
    pub discount: Cents,
}

#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub customer_id: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub labor: Option<Labor>,
    pub materials: Option<Vec<MaterialItem>>,
    pub payment_method: Option<PaymentMethod>,
    pub installments: Option<u32>,
    pub status: Option<ServiceStatus>,
    pub discount: Option<Cents>,
}

impl AppService {
    /// Open the state file at the given path, creating an empty state when
    /// the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let store = Store::new(path);
        let state = store.load()?;
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn persist(&self) -> Result<(), AppError> {
        self.store.save(&self.state)?;
        Ok(())
    }

    // ========================
    // Customer operations
    // ========================

    pub fn create_customer(&mut self, input: CustomerInput) -> Result<Customer, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::NameRequired("Customer"));
        }

        let mut customer = Customer::new(input.name.trim().to_string());
        customer.phone = input.phone;
        customer.cep = input.cep;
        customer.state = input.state;
        customer.city = input.city;
        customer.neighborhood = input.neighborhood;
        customer.street = input.street;
        if customer.has_address_components() {
            customer.address = customer.compose_address();
        }

        self.state.customers.push(customer.clone());
        self.persist()?;
        Ok(customer)
    }

    pub fn update_customer(&mut self, id: &str, patch: CustomerPatch) -> Result<Customer, AppError> {
        let idx = self
            .state
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;

        let mut customer = self.state.customers[idx].clone();
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::NameRequired("Customer"));
            }
            customer.name = name.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            customer.phone = phone;
        }
        if let Some(cep) = patch.cep {
            customer.cep = cep;
        }
        let address_edited = patch.state.is_some()
            || patch.city.is_some()
            || patch.neighborhood.is_some()
            || patch.street.is_some();
        if let Some(state) = patch.state {
            customer.state = state;
        }
        if let Some(city) = patch.city {
            customer.city = city;
        }
        if let Some(neighborhood) = patch.neighborhood {
            customer.neighborhood = neighborhood;
        }
        if let Some(street) = patch.street {
            customer.street = street;
        }
        if address_edited {
            customer.address = customer.compose_address();
        }

        self.state.customers[idx] = customer.clone();
        self.persist()?;
        Ok(customer)
    }

    /// Remove a customer. Service records that reference it are left
    /// untouched; the dangling reference resolves to a placeholder at
    /// display time.
    pub fn delete_customer(&mut self, id: &str) -> Result<Customer, AppError> {
        let idx = self
            .state
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;

        let removed = self.state.customers.remove(idx);
        self.persist()?;
        Ok(removed)
    }

    pub fn get_customer(&self, id: &str) -> Result<&Customer, AppError> {
        self.state
            .find_customer(id)
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))
    }

    pub fn list_customers(&self) -> &[Customer] {
        &self.state.customers
    }

    // ========================
    // Material operations
    // ========================

    pub fn create_material(&mut self, input: MaterialInput) -> Result<Material, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::NameRequired("Material"));
        }

        let mut material = Material::new(input.name.trim().to_string());
        material.description = input.description;
        material.purchase_price = input.purchase_price;
        material.selling_price = input.selling_price;
        material.stock = input.stock;

        self.state.materials.push(material.clone());
        self.persist()?;
        Ok(material)
    }

    pub fn update_material(&mut self, id: &str, patch: MaterialPatch) -> Result<Material, AppError> {
        let idx = self
            .state
            .materials
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::MaterialNotFound(id.to_string()))?;

        let mut material = self.state.materials[idx].clone();
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::NameRequired("Material"));
            }
            material.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            material.description = description;
        }
        if let Some(purchase_price) = patch.purchase_price {
            material.purchase_price = purchase_price;
        }
        if let Some(selling_price) = patch.selling_price {
            material.selling_price = selling_price;
        }
        if let Some(stock) = patch.stock {
            material.stock = stock;
        }

        self.state.materials[idx] = material.clone();
        self.persist()?;
        Ok(material)
    }

    pub fn delete_material(&mut self, id: &str) -> Result<Material, AppError> {
        let idx = self
            .state
            .materials
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::MaterialNotFound(id.to_string()))?;

        let removed = self.state.materials.remove(idx);
        self.persist()?;
        Ok(removed)
    }

    pub fn get_material(&self, id: &str) -> Result<&Material, AppError> {
        self.state
            .find_material(id)
            .ok_or_else(|| AppError::MaterialNotFound(id.to_string()))
    }

    pub fn list_materials(&self) -> &[Material] {
        &self.state.materials
    }

    // ========================
    // Service-type (price catalog) operations
    // ========================

    pub fn create_service_type(&mut self, input: ServiceTypeInput) -> Result<ServiceType, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::NameRequired("Service type"));
        }

        let mut service_type = ServiceType::new(input.name.trim().to_string());
        service_type.description = input.description;
        service_type.base_value = input.base_value;

        self.state.service_types.push(service_type.clone());
        self.persist()?;
        Ok(service_type)
    }

    pub fn update_service_type(
        &mut self,
        id: &str,
        patch: ServiceTypePatch,
    ) -> Result<ServiceType, AppError> {
        let idx = self
            .state
            .service_types
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::ServiceTypeNotFound(id.to_string()))?;

        let mut service_type = self.state.service_types[idx].clone();
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::NameRequired("Service type"));
            }
            service_type.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            service_type.description = description;
        }
        if let Some(base_value) = patch.base_value {
            service_type.base_value = base_value;
        }

        self.state.service_types[idx] = service_type.clone();
        self.persist()?;
        Ok(service_type)
    }

    pub fn delete_service_type(&mut self, id: &str) -> Result<ServiceType, AppError> {
        let idx = self
            .state
            .service_types
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::ServiceTypeNotFound(id.to_string()))?;

        let removed = self.state.service_types.remove(idx);
        self.persist()?;
        Ok(removed)
    }

    pub fn list_service_types(&self) -> &[ServiceType] {
        &self.state.service_types
    }

    // ========================
    // Service record operations
    // ========================

    pub fn create_service(&mut self, input: ServiceInput) -> Result<ServiceRecord, AppError> {
        let record = self.build_record(ServiceRecord::new_id(), input)?;
        self.state.services.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    pub fn update_service(&mut self, id: &str, patch: ServicePatch) -> Result<ServiceRecord, AppError> {
        let idx = self
            .state
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))?;

        let current = &self.state.services[idx];
        // Reconstruct the labor mode from the stored record: itemized when
        // line items exist, flat otherwise.
        let labor = patch.labor.unwrap_or_else(|| {
            if current.service_items.is_empty() {
                Labor::Flat(current.service_value)
            } else {
                Labor::Itemized(current.service_items.clone())
            }
        });
        let input = ServiceInput {
            customer_id: patch.customer_id.unwrap_or_else(|| current.customer_id.clone()),
            description: patch.description.unwrap_or_else(|| current.description.clone()),
            date: patch.date.unwrap_or(current.date),
            labor,
            materials: patch.materials.unwrap_or_else(|| current.materials.clone()),
            payment_method: patch.payment_method.unwrap_or(current.payment_method),
            installments: patch.installments.unwrap_or(current.installments),
            status: patch.status.unwrap_or(current.status),
            discount: patch.discount.unwrap_or(current.discount),
        };

        let record = self.build_record(current.id.clone(), input)?;
        self.state.services[idx] = record.clone();
        self.persist()?;
        Ok(record)
    }

    pub fn delete_service(&mut self, id: &str) -> Result<ServiceRecord, AppError> {
        let idx = self
            .state
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))?;

        let removed = self.state.services.remove(idx);
        self.persist()?;
        Ok(removed)
    }

    pub fn get_service(&self, id: &str) -> Result<&ServiceRecord, AppError> {
        self.state
            .find_service(id)
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))
    }

    pub fn list_services(&self) -> &[ServiceRecord] {
        &self.state.services
    }

    /// Validate and assemble a record from form input. Totals are derived
    /// here against the current catalog; stock is deliberately NOT
    /// decremented by material consumption.
    fn build_record(&self, id: String, input: ServiceInput) -> Result<ServiceRecord, AppError> {
        if input.customer_id.is_empty() {
            return Err(AppError::CustomerRequired);
        }
        if self.state.find_customer(&input.customer_id).is_none() {
            return Err(AppError::CustomerNotFound(input.customer_id));
        }

        let itemized_ok = match &input.labor {
            Labor::Itemized(items) => items.iter().all(|i| i.quantity >= 1),
            Labor::Flat(_) => true,
        };
        if !itemized_ok || input.materials.iter().any(|m| m.quantity < 1) {
            return Err(AppError::InvalidQuantity);
        }

        let totals = compute_totals(
            &input.labor,
            &input.materials,
            input.discount,
            &self.state.service_types,
            &self.state.materials,
        );
        let service_items = match input.labor {
            Labor::Itemized(items) => items,
            Labor::Flat(_) => Vec::new(),
        };

        Ok(ServiceRecord {
            id,
            customer_id: input.customer_id,
            description: input.description,
            date: input.date,
            service_items,
            materials: input.materials,
            installments: normalize_installments(input.payment_method, input.installments),
            payment_method: input.payment_method,
            status: input.status,
            service_value: totals.labor,
            discount: input.discount,
            total_value: totals.total,
        })
    }
}
