use chrono::NaiveDate;

use crate::config::BusinessProfile;
use crate::domain::{
    format_brl, AppState, Cents, PaymentMethod, ServiceRecord, ServiceStatus, UNKNOWN_CUSTOMER,
};

/// One row of the receipt table.
#[derive(Debug, Clone)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub subtotal: Cents,
}

/// A fully resolved receipt: every soft reference has already been looked
/// up (or replaced by a placeholder), so renderers never touch the state.
#[derive(Debug, Clone)]
pub struct ReceiptView {
    pub business_name: String,
    pub tagline: String,
    pub owner: String,
    pub business_phone: String,
    pub document_title: String,
    pub number: String,
    pub date: NaiveDate,
    pub customer_name: String,
    pub customer_street: String,
    pub customer_neighborhood: String,
    pub customer_city: String,
    pub customer_state: String,
    pub customer_cep: String,
    pub description: String,
    pub service_lines: Vec<ReceiptLine>,
    pub material_lines: Vec<ReceiptLine>,
    pub discount: Cents,
    pub total: Cents,
    pub payment_method: PaymentMethod,
    pub installments: u32,
    pub status: ServiceStatus,
}

/// Resolve a service record into a receipt view. Deleted customers become
/// a placeholder; deleted catalog entries keep their row with a generic
/// label and the zero subtotal they contributed to the stored total.
pub fn build_receipt(
    state: &AppState,
    profile: &BusinessProfile,
    record: &ServiceRecord,
) -> ReceiptView {
    let customer = state.find_customer(&record.customer_id);

    let service_lines = record
        .service_items
        .iter()
        .map(|item| {
            let service_type = state.find_service_type(&item.service_type_id);
            ReceiptLine {
                name: service_type
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "Service".to_string()),
                quantity: item.quantity,
                subtotal: service_type.map(|t| t.base_value).unwrap_or(0)
                    * item.quantity as Cents,
            }
        })
        .collect();

    let material_lines = record
        .materials
        .iter()
        .map(|item| {
            let material = state.find_material(&item.material_id);
            ReceiptLine {
                name: material
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| "Material".to_string()),
                quantity: item.quantity,
                subtotal: material.map(|m| m.selling_price).unwrap_or(0)
                    * item.quantity as Cents,
            }
        })
        .collect();

    ReceiptView {
        business_name: profile.name.clone(),
        tagline: profile.tagline.clone(),
        owner: profile.owner.clone(),
        business_phone: profile.phone.clone(),
        document_title: profile.document_title.clone(),
        number: record.short_id(),
        date: record.date,
        customer_name: customer
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
        customer_street: customer.map(|c| c.street.clone()).unwrap_or_default(),
        customer_neighborhood: customer
            .map(|c| c.neighborhood.clone())
            .unwrap_or_default(),
        customer_city: customer.map(|c| c.city.clone()).unwrap_or_default(),
        customer_state: customer.map(|c| c.state.clone()).unwrap_or_default(),
        customer_cep: customer.map(|c| c.cep.clone()).unwrap_or_default(),
        description: record.description.clone(),
        service_lines,
        material_lines,
        discount: record.discount,
        total: record.total_value,
        payment_method: record.payment_method,
        installments: record.installments,
        status: record.status,
    }
}

/// Plain-text summary for external message sharing. The structure is fixed
/// for interoperability with recipients of the previous implementation.
pub fn receipt_text(view: &ReceiptView) -> String {
    let mut out = String::new();
    out.push_str(&view.business_name);
    out.push('\n');
    out.push_str(&format!("{} #{}\n", view.document_title, view.number));
    out.push_str(&format!("Client: {}\n", view.customer_name));
    out.push_str(&format!("Date: {}\n", view.date.format("%d/%m/%Y")));

    out.push_str("Services:\n");
    for line in &view.service_lines {
        out.push_str(&format!(
            "• {}x {} - {}\n",
            line.quantity,
            line.name,
            format_brl(line.subtotal)
        ));
    }
    out.push_str("Materials:\n");
    for line in &view.material_lines {
        out.push_str(&format!(
            "• {}x {} - {}\n",
            line.quantity,
            line.name,
            format_brl(line.subtotal)
        ));
    }

    out.push_str(&format!("Total: {}\n", format_brl(view.total)));
    out.push_str(&format!("Payment: {}", view.payment_method));
    if view.payment_method == PaymentMethod::CreditCard && view.installments > 1 {
        out.push_str(&format!(" ({} installments)", view.installments));
    }
    out.push('\n');
    out
}
