use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use genpdf::{elements, style, Element};

use crate::domain::format_brl;

use super::receipt::ReceiptView;

/// Renders a resolved receipt view into a paginated PDF document. This is
/// the document-renderer collaborator: it is handed only resolved data and
/// never touches the application state.
pub struct PdfRenderer {
    font_dir: PathBuf,
}

impl PdfRenderer {
    pub fn new(font_dir: impl Into<PathBuf>) -> Self {
        Self {
            font_dir: font_dir.into(),
        }
    }

    /// Render the receipt to `output`. The document is built fully in
    /// memory first, so a failed render leaves no partial file behind.
    pub fn render(&self, view: &ReceiptView, output: &Path) -> Result<()> {
        let font_family = genpdf::fonts::from_files(&self.font_dir, "LiberationSans", None)
            .map_err(|e| {
                anyhow!(
                    "Failed to load fonts from {}: {} (expected LiberationSans .ttf files)",
                    self.font_dir.display(),
                    e
                )
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} #{}", view.document_title, view.number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(15);
        doc.set_page_decorator(decorator);

        // Header
        doc.push(
            elements::Paragraph::new(view.business_name.to_uppercase())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        if !view.tagline.is_empty() {
            doc.push(
                elements::Paragraph::new(view.tagline.clone())
                    .styled(style::Style::new().with_font_size(9)),
            );
        }
        if !view.owner.is_empty() {
            doc.push(
                elements::Paragraph::new(format!("Technician: {}", view.owner))
                    .styled(style::Style::new().with_font_size(9)),
            );
        }
        if !view.business_phone.is_empty() {
            doc.push(
                elements::Paragraph::new(format!("Contact: {}", view.business_phone))
                    .styled(style::Style::new().with_font_size(9)),
            );
        }
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!(
                "{} #{}",
                view.document_title.to_uppercase(),
                view.number
            ))
            .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Date: {}",
            view.date.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!("Status: {}", view.status)));
        doc.push(elements::Break::new(1.5));

        // Client block
        doc.push(elements::Paragraph::new("CLIENT").styled(style::Style::new().bold()));
        doc.push(elements::Paragraph::new(view.customer_name.clone()));
        if !view.customer_street.is_empty() {
            doc.push(elements::Paragraph::new(view.customer_street.clone()));
        }
        let city_line = [
            view.customer_neighborhood.as_str(),
            view.customer_city.as_str(),
            view.customer_state.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
        if !city_line.is_empty() {
            doc.push(elements::Paragraph::new(city_line));
        }
        if !view.customer_cep.is_empty() {
            doc.push(elements::Paragraph::new(format!("CEP: {}", view.customer_cep)));
        }
        doc.push(elements::Break::new(1.5));

        if !view.description.is_empty() {
            doc.push(elements::Paragraph::new("WORK REPORT").styled(style::Style::new().bold()));
            doc.push(elements::Paragraph::new(view.description.clone()));
            doc.push(elements::Break::new(1.5));
        }

        // Line-item table: description / qty / subtotal
        let mut table = elements::TableLayout::new(vec![4, 1, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Description").styled(bold))
            .element(elements::Paragraph::new("Qty").styled(bold))
            .element(elements::Paragraph::new("Subtotal").styled(bold))
            .push()
            .map_err(|e| anyhow!("Failed to build receipt table: {}", e))?;

        for line in view.service_lines.iter().chain(&view.material_lines) {
            table
                .row()
                .element(elements::Paragraph::new(line.name.clone()))
                .element(elements::Paragraph::new(line.quantity.to_string()))
                .element(elements::Paragraph::new(format_brl(line.subtotal)))
                .push()
                .map_err(|e| anyhow!("Failed to build receipt table: {}", e))?;
        }

        if view.discount > 0 {
            table
                .row()
                .element(elements::Paragraph::new("Discount").styled(bold))
                .element(elements::Paragraph::new(""))
                .element(elements::Paragraph::new(format!(
                    "- {}",
                    format_brl(view.discount)
                )))
                .push()
                .map_err(|e| anyhow!("Failed to build receipt table: {}", e))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1));

        let mut total = elements::Paragraph::new(format!("TOTAL: {}", format_brl(view.total)));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(13)));

        let mut payment = elements::Paragraph::new(match view.installments {
            n if n > 1 => format!("Payment: {} ({} installments)", view.payment_method, n),
            _ => format!("Payment: {}", view.payment_method),
        });
        payment.set_alignment(genpdf::Alignment::Right);
        doc.push(payment);

        // Signature block
        doc.push(elements::Break::new(4));
        for (label, name) in [
            ("TECHNICAL RESPONSIBLE", view.business_name.as_str()),
            ("CLIENT SIGNATURE", view.customer_name.as_str()),
        ] {
            doc.push(elements::Paragraph::new(
                "_________________________________________",
            ));
            doc.push(
                elements::Paragraph::new(format!("{} - {}", label, name))
                    .styled(style::Style::new().with_font_size(9)),
            );
            doc.push(elements::Break::new(2));
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| anyhow!("Failed to render receipt PDF: {}", e))?;
        fs::write(output, buffer)
            .with_context(|| format!("Failed to write PDF to {}", output.display()))?;
        Ok(())
    }
}
