use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::{ServiceType, ServiceTypeId};
use super::material::{Material, MaterialId};
use super::money::{self, Cents};

pub type ServiceId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "PIX")]
    Pix,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Pix,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "pix" => Ok(PaymentMethod::Pix),
            "credit" | "credit card" => Ok(PaymentMethod::CreditCard),
            "debit" | "debit card" => Ok(PaymentMethod::DebitCard),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(format!(
                "unknown payment method '{}' (expected pix, credit, debit or cash)",
                other
            )),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "Awaiting Approval")]
    AwaitingApproval,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 3] = [
        ServiceStatus::AwaitingApproval,
        ServiceStatus::InProgress,
        ServiceStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::AwaitingApproval => "Awaiting Approval",
            ServiceStatus::InProgress => "In Progress",
            ServiceStatus::Completed => "Completed",
        }
    }
}

impl std::str::FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "awaiting" | "awaiting approval" => Ok(ServiceStatus::AwaitingApproval),
            "progress" | "in progress" => Ok(ServiceStatus::InProgress),
            "completed" | "done" => Ok(ServiceStatus::Completed),
            other => Err(format!(
                "unknown status '{}' (expected awaiting, progress or completed)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A labor line item: a catalog reference plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub service_type_id: ServiceTypeId,
    pub quantity: u32,
}

/// A material line item: a stock-catalog reference plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialItem {
    pub material_id: MaterialId,
    pub quantity: u32,
}

/// One work order / receipt for a customer on a given date.
/// `customer_id` and the line-item ids are soft references: they must
/// resolve at save time but may dangle afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub customer_id: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub service_items: Vec<ServiceItem>,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
    pub payment_method: PaymentMethod,
    #[serde(default = "default_installments")]
    pub installments: u32,
    pub status: ServiceStatus,
    /// Labor subtotal only, never materials or discount.
    #[serde(default, with = "money::units")]
    pub service_value: Cents,
    /// Flat currency amount, not a percentage.
    #[serde(default, with = "money::units")]
    pub discount: Cents,
    /// Labor + materials - discount, clamped at zero.
    #[serde(default, with = "money::units")]
    pub total_value: Cents,
}

fn default_installments() -> u32 {
    1
}

impl ServiceRecord {
    pub fn new_id() -> ServiceId {
        Uuid::new_v4().to_string()
    }

    /// Last 6 characters of the id, uppercased. Shown on receipts.
    pub fn short_id(&self) -> String {
        let start = self.id.len().saturating_sub(6);
        self.id[start..].to_uppercase()
    }
}

/// How the labor subtotal is entered on the form: itemized against the
/// price catalog or a single flat value typed directly.
#[derive(Debug, Clone)]
pub enum Labor {
    Itemized(Vec<ServiceItem>),
    Flat(Cents),
}

/// Derived monetary totals for a record, recomputed from scratch on every
/// edit. Never maintained incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub labor: Cents,
    pub materials: Cents,
    pub total: Cents,
}

/// Sum of quantity x base value over the labor items. A serviceTypeId that
/// no longer resolves contributes zero.
pub fn labor_subtotal(items: &[ServiceItem], catalog: &[ServiceType]) -> Cents {
    items.iter().fold(0, |acc, item| {
        let base = catalog
            .iter()
            .find(|t| t.id == item.service_type_id)
            .map(|t| t.base_value)
            .unwrap_or(0);
        acc + base * item.quantity as Cents
    })
}

/// Sum of quantity x selling price over the material items. A materialId
/// that no longer resolves contributes zero.
pub fn materials_subtotal(items: &[MaterialItem], materials: &[Material]) -> Cents {
    items.iter().fold(0, |acc, item| {
        let price = materials
            .iter()
            .find(|m| m.id == item.material_id)
            .map(|m| m.selling_price)
            .unwrap_or(0);
        acc + price * item.quantity as Cents
    })
}

/// Compute the derived totals for a record from current form state.
/// `total = max(0, labor + materials - discount)`; excess discount is
/// silently absorbed, negative discount passes through.
pub fn compute_totals(
    labor: &Labor,
    material_items: &[MaterialItem],
    discount: Cents,
    catalog: &[ServiceType],
    materials: &[Material],
) -> Totals {
    let labor = match labor {
        Labor::Itemized(items) => labor_subtotal(items, catalog),
        Labor::Flat(value) => *value,
    };
    let materials = materials_subtotal(material_items, materials);
    Totals {
        labor,
        materials,
        total: (labor + materials - discount).max(0),
    }
}

/// Add a labor item, accumulating quantity when the same catalog entry is
/// already present instead of creating a duplicate row.
pub fn add_service_item(items: &mut Vec<ServiceItem>, service_type_id: &str, quantity: u32) {
    match items.iter_mut().find(|i| i.service_type_id == service_type_id) {
        Some(existing) => existing.quantity += quantity,
        None => items.push(ServiceItem {
            service_type_id: service_type_id.to_string(),
            quantity,
        }),
    }
}

/// Add a material item, accumulating quantity on duplicates.
pub fn add_material_item(items: &mut Vec<MaterialItem>, material_id: &str, quantity: u32) {
    match items.iter_mut().find(|i| i.material_id == material_id) {
        Some(existing) => existing.quantity += quantity,
        None => items.push(MaterialItem {
            material_id: material_id.to_string(),
            quantity,
        }),
    }
}

/// Installments are only meaningful for credit card payments. Every other
/// method is forced to a single installment regardless of what was entered.
pub fn normalize_installments(method: PaymentMethod, entered: u32) -> u32 {
    match method {
        PaymentMethod::CreditCard => entered.max(1),
        _ => 1,
    }
}
