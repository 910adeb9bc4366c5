use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::{format_cents, AppState, UNKNOWN_CUSTOMER};

/// Exporter for backups and CSV extracts of the current state snapshot.
pub struct Exporter<'a> {
    state: &'a AppState,
}

impl<'a> Exporter<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Default backup file name with the current date embedded.
    pub fn backup_file_name(today: NaiveDate) -> String {
        format!("backup_gestor_{}.json", today.format("%Y-%m-%d"))
    }

    /// Write the full state blob, byte-compatible with the persisted file.
    pub fn write_backup<W: Write>(&self, mut writer: W) -> Result<()> {
        let json = serde_json::to_string_pretty(self.state)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Export service records to CSV, with customer names resolved
    /// defensively.
    pub fn export_services_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "customer",
            "status",
            "payment_method",
            "installments",
            "service_value",
            "discount",
            "total_value",
        ])?;

        let mut count = 0;
        for service in &self.state.services {
            let customer_name = self
                .state
                .find_customer(&service.customer_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());

            csv_writer.write_record([
                service.id.clone(),
                service.date.format("%Y-%m-%d").to_string(),
                customer_name,
                service.status.as_str().to_string(),
                service.payment_method.as_str().to_string(),
                service.installments.to_string(),
                format_cents(service.service_value),
                format_cents(service.discount),
                format_cents(service.total_value),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    pub fn export_customers_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "name", "phone", "address", "cep", "city", "state"])?;

        let mut count = 0;
        for customer in &self.state.customers {
            csv_writer.write_record([
                &customer.id,
                &customer.name,
                &customer.phone,
                &customer.address,
                &customer.cep,
                &customer.city,
                &customer.state,
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    pub fn export_materials_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "name",
            "description",
            "purchase_price",
            "selling_price",
            "stock",
        ])?;

        let mut count = 0;
        for material in &self.state.materials {
            csv_writer.write_record([
                material.id.clone(),
                material.name.clone(),
                material.description.clone(),
                format_cents(material.purchase_price),
                format_cents(material.selling_price),
                material.stock.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}
