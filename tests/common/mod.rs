// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use gestor::application::{
    AppService, CustomerInput, MaterialInput, ServiceInput, ServiceTypeInput,
};
use gestor::domain::{Labor, MaterialItem, PaymentMethod, ServiceItem, ServiceStatus};
use tempfile::TempDir;

/// Helper to create a test service backed by a temporary state file
pub fn test_service() -> Result<(AppService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("gestor.json");
    let service = AppService::open(&path)?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: a small catalog plus one customer
pub struct StandardCatalog {
    pub customer_id: String,
    pub material_id: String,
    pub service_type_id: String,
}

impl StandardCatalog {
    /// Create customer "Ana Lima", material "2.5mm Cable" (sells for 10.00,
    /// 3 units in stock) and service type "Outlet Installation" (100.00)
    pub fn create(service: &mut AppService) -> Result<Self> {
        let customer = service.create_customer(CustomerInput {
            name: "Ana Lima".into(),
            phone: "(14) 98888-7777".into(),
            ..Default::default()
        })?;
        let material = service.create_material(MaterialInput {
            name: "2.5mm Cable".into(),
            purchase_price: 600,
            selling_price: 1000,
            stock: 3,
            ..Default::default()
        })?;
        let service_type = service.create_service_type(ServiceTypeInput {
            name: "Outlet Installation".into(),
            base_value: 10000,
            ..Default::default()
        })?;
        Ok(Self {
            customer_id: customer.id,
            material_id: material.id,
            service_type_id: service_type.id,
        })
    }

    /// Record one completed service: 1x the service type, `material_qty`
    /// units of the material, paid via PIX with the given discount
    pub fn record_service(
        &self,
        service: &mut AppService,
        on: NaiveDate,
        material_qty: u32,
        discount: i64,
    ) -> Result<String> {
        let record = service.create_service(ServiceInput {
            customer_id: self.customer_id.clone(),
            description: String::new(),
            date: on,
            labor: Labor::Itemized(vec![ServiceItem {
                service_type_id: self.service_type_id.clone(),
                quantity: 1,
            }]),
            materials: if material_qty > 0 {
                vec![MaterialItem {
                    material_id: self.material_id.clone(),
                    quantity: material_qty,
                }]
            } else {
                vec![]
            },
            payment_method: PaymentMethod::Pix,
            installments: 1,
            status: ServiceStatus::Completed,
            discount,
        })?;
        Ok(record.id)
    }
}
