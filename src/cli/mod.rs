use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::application::reporting;
use crate::application::{
    AppService, CustomerInput, CustomerPatch, MaterialInput, MaterialPatch, ServiceInput,
    ServicePatch, ServiceTypeInput, ServiceTypePatch,
};
use crate::config::BusinessProfile;
use crate::domain::{
    add_material_item, add_service_item, format_brl, parse_cents, Labor, MaterialItem,
    PaymentMethod, ServiceItem, ServiceStatus, UNKNOWN_CUSTOMER,
};
use crate::io::{build_receipt, receipt_text, Exporter, PdfRenderer};
use crate::lookup::{
    AddressLookup, GeminiInsights, IbgeLocalidades, InsightProvider, RegionLookup, ViaCep,
    INSIGHT_FALLBACK,
};

/// Gestor - Service-order manager for a small electrical business
#[derive(Parser)]
#[command(name = "gestor")]
#[command(about = "A local-first service-order and inventory manager")]
#[command(version)]
pub struct Cli {
    /// State file path
    #[arg(short, long, default_value = "gestor.json")]
    pub file: String,

    /// Business profile (TOML) path
    #[arg(long, default_value = "gestor.toml")]
    pub config: String,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Customer management commands
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Material/stock catalog commands
    #[command(subcommand)]
    Material(MaterialCommands),

    /// Service-type price catalog commands
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Service record (work order) commands
    #[command(subcommand)]
    Service(ServiceCommands),

    /// Show revenue, counts, stock alerts and recent activity
    Dashboard,

    /// Month grid of scheduled services
    Calendar {
        /// Month to show (YYYY-MM, defaults to current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Write a dated backup of the full state blob
    Backup {
        /// Output file (defaults to backup_gestor_<date>.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Export data to CSV: services, customers, materials
    Export {
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List region codes and names
    Regions,

    /// List city names within a region
    Cities {
        /// Region code (e.g. SP)
        region: String,
    },

    /// AI commentary over the current state
    Insight,
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Register a new customer
    Add {
        /// Customer name
        name: String,

        /// Phone / WhatsApp number
        #[arg(long)]
        phone: Option<String>,

        /// Postal code; resolves street/neighborhood/city/state when
        /// they are not given explicitly
        #[arg(long)]
        cep: Option<String>,

        #[arg(long)]
        street: Option<String>,

        #[arg(long)]
        neighborhood: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// Region/state code (e.g. SP)
        #[arg(long)]
        state: Option<String>,
    },

    /// List all customers
    List,

    /// Edit a customer (only the given fields change)
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        cep: Option<String>,

        #[arg(long)]
        street: Option<String>,

        #[arg(long)]
        neighborhood: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        state: Option<String>,
    },

    /// Remove a customer (service records keep their reference)
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum MaterialCommands {
    /// Register a new material
    Add {
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Purchase price (e.g. "12.50")
        #[arg(long)]
        purchase: Option<String>,

        /// Selling price (e.g. "19.90")
        #[arg(long)]
        price: Option<String>,

        /// Units in stock
        #[arg(long, default_value_t = 0)]
        stock: i64,
    },

    /// List materials
    List {
        /// Only materials below the restock threshold
        #[arg(long)]
        low: bool,
    },

    /// Edit a material (only the given fields change)
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        purchase: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        stock: Option<i64>,
    },

    /// Remove a material
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Add a price-list entry for labor
    Add {
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Base labor value (e.g. "100.00")
        #[arg(long)]
        value: Option<String>,
    },

    /// List the price catalog
    List,

    /// Edit a price-list entry
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        value: Option<String>,
    },

    /// Remove a price-list entry
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum ServiceCommands {
    /// Record a new service
    Add {
        /// Customer id
        #[arg(long)]
        customer: String,

        /// Service date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Itemized labor: TYPE_ID:QTY (repeatable; duplicates accumulate)
        #[arg(long = "item", conflicts_with = "labor")]
        items: Vec<String>,

        /// Flat labor value instead of itemized entries (e.g. "150.00")
        #[arg(long)]
        labor: Option<String>,

        /// Material usage: MATERIAL_ID:QTY (repeatable; duplicates accumulate)
        #[arg(long = "material")]
        materials: Vec<String>,

        /// Payment method: pix, credit, debit, cash
        #[arg(long, default_value = "pix")]
        payment: String,

        /// Number of installments (credit card only; forced to 1 otherwise)
        #[arg(long, default_value_t = 1)]
        installments: u32,

        /// Status: awaiting, progress, completed
        #[arg(long, default_value = "completed")]
        status: String,

        /// Flat discount amount (e.g. "5.00")
        #[arg(long, default_value = "0")]
        discount: String,

        /// Work report / notes
        #[arg(long)]
        description: Option<String>,
    },

    /// List service records, most recent first
    List {
        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one service record in detail
    Show { id: String },

    /// Print the shareable receipt text, optionally rendering a PDF
    Receipt {
        id: String,

        /// Also write a PDF to this path
        #[arg(long)]
        pdf: Option<String>,

        /// Directory with the LiberationSans .ttf files for the PDF
        #[arg(long, default_value = "./fonts")]
        fonts: String,
    },

    /// Edit a service record (only the given fields change)
    Edit {
        id: String,

        #[arg(long)]
        customer: Option<String>,

        #[arg(long)]
        date: Option<String>,

        /// Replace labor items: TYPE_ID:QTY (repeatable)
        #[arg(long = "item", conflicts_with = "labor")]
        items: Vec<String>,

        /// Replace labor with a flat value
        #[arg(long)]
        labor: Option<String>,

        /// Replace material items: MATERIAL_ID:QTY (repeatable)
        #[arg(long = "material")]
        materials: Vec<String>,

        #[arg(long)]
        payment: Option<String>,

        #[arg(long)]
        installments: Option<u32>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        discount: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a service record
    Remove { id: String },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Customer(cmd) => {
                let mut service = AppService::open(&self.file)?;
                run_customer_command(&mut service, cmd, self.yes).await?;
            }

            Commands::Material(cmd) => {
                let mut service = AppService::open(&self.file)?;
                run_material_command(&mut service, cmd, self.yes)?;
            }

            Commands::Catalog(cmd) => {
                let mut service = AppService::open(&self.file)?;
                run_catalog_command(&mut service, cmd, self.yes)?;
            }

            Commands::Service(cmd) => {
                let mut service = AppService::open(&self.file)?;
                let profile = BusinessProfile::load(self.config.as_ref())?;
                run_service_command(&mut service, &profile, cmd, self.yes)?;
            }

            Commands::Dashboard => {
                let service = AppService::open(&self.file)?;
                run_dashboard_command(&service)?;
            }

            Commands::Calendar { month } => {
                let service = AppService::open(&self.file)?;
                run_calendar_command(&service, month.as_deref())?;
            }

            Commands::Backup { output } => {
                let service = AppService::open(&self.file)?;
                let path = output
                    .unwrap_or_else(|| Exporter::backup_file_name(Local::now().date_naive()));
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create backup file {}", path))?;
                Exporter::new(service.state()).write_backup(file)?;
                println!("Backup written: {}", path);
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = AppService::open(&self.file)?;
                run_export_command(&service, &export_type, output.as_deref())?;
            }

            Commands::Regions => {
                let regions = IbgeLocalidades::new()
                    .regions()
                    .await
                    .context("Failed to fetch the region list")?;
                for region in regions {
                    println!("{}  {}", region.code, region.name);
                }
            }

            Commands::Cities { region } => {
                let cities = IbgeLocalidades::new()
                    .cities(&region)
                    .await
                    .with_context(|| format!("Failed to fetch cities for region {}", region))?;
                for city in cities {
                    println!("{}", city);
                }
            }

            Commands::Insight => {
                let service = AppService::open(&self.file)?;
                run_insight_command(&service).await;
            }
        }

        Ok(())
    }
}

async fn run_customer_command(
    service: &mut AppService,
    cmd: CustomerCommands,
    assume_yes: bool,
) -> Result<()> {
    match cmd {
        CustomerCommands::Add {
            name,
            phone,
            cep,
            street,
            neighborhood,
            city,
            state,
        } => {
            let mut input = CustomerInput {
                name,
                phone: phone.unwrap_or_default(),
                cep: cep.clone().unwrap_or_default(),
                state: state.unwrap_or_default(),
                city: city.unwrap_or_default(),
                neighborhood: neighborhood.unwrap_or_default(),
                street: street.unwrap_or_default(),
            };
            if let Some(cep) = cep {
                enrich_from_postal(&mut input, &cep).await;
            }

            let customer = service.create_customer(input)?;
            println!("Created customer: {} ({})", customer.name, customer.id);
        }

        CustomerCommands::List => {
            for customer in service.list_customers() {
                let phone = if customer.phone.is_empty() {
                    "-"
                } else {
                    customer.phone.as_str()
                };
                let address = if customer.address.is_empty() {
                    "-"
                } else {
                    customer.address.as_str()
                };
                println!("{}  {:<24} {:<16} {}", customer.id, customer.name, phone, address);
            }
            if service.list_customers().is_empty() {
                println!("No customers registered yet.");
            }
        }

        CustomerCommands::Edit {
            id,
            name,
            phone,
            cep,
            street,
            neighborhood,
            city,
            state,
        } => {
            let mut patch = CustomerPatch {
                name,
                phone,
                cep: cep.clone(),
                state,
                city,
                neighborhood,
                street,
            };
            // Same enrichment as the add form: a new postal code fills in
            // the components that were not typed explicitly.
            if let Some(cep) = cep {
                enrich_patch_from_postal(&mut patch, &cep).await;
            }

            let customer = service.update_customer(&id, patch)?;
            println!("Updated customer: {} ({})", customer.name, customer.id);
        }

        CustomerCommands::Remove { id } => {
            let name = service.get_customer(&id)?.name.clone();
            if !confirm(&format!("Remove customer '{}'?", name), assume_yes)? {
                println!("Aborted.");
                return Ok(());
            }
            service.delete_customer(&id)?;
            println!("Removed customer: {}", name);
        }
    }
    Ok(())
}

fn run_material_command(
    service: &mut AppService,
    cmd: MaterialCommands,
    assume_yes: bool,
) -> Result<()> {
    match cmd {
        MaterialCommands::Add {
            name,
            description,
            purchase,
            price,
            stock,
        } => {
            let material = service.create_material(MaterialInput {
                name,
                description: description.unwrap_or_default(),
                purchase_price: parse_money_arg(purchase.as_deref())?,
                selling_price: parse_money_arg(price.as_deref())?,
                stock,
            })?;
            println!("Created material: {} ({})", material.name, material.id);
        }

        MaterialCommands::List { low } => {
            let mut shown = 0;
            for material in service.list_materials() {
                if low && !material.is_low_stock() {
                    continue;
                }
                let flag = if material.is_critical_stock() {
                    " !!"
                } else if material.is_low_stock() {
                    " !"
                } else {
                    ""
                };
                println!(
                    "{}  {:<24} sell {:<12} stock {}{}",
                    material.id,
                    material.name,
                    format_brl(material.selling_price),
                    material.stock,
                    flag
                );
                shown += 1;
            }
            if shown == 0 {
                println!("No materials to show.");
            }
        }

        MaterialCommands::Edit {
            id,
            name,
            description,
            purchase,
            price,
            stock,
        } => {
            let material = service.update_material(
                &id,
                MaterialPatch {
                    name,
                    description,
                    purchase_price: parse_money_opt(purchase.as_deref())?,
                    selling_price: parse_money_opt(price.as_deref())?,
                    stock,
                },
            )?;
            println!("Updated material: {} ({})", material.name, material.id);
        }

        MaterialCommands::Remove { id } => {
            let name = service.get_material(&id)?.name.clone();
            if !confirm(&format!("Remove material '{}'?", name), assume_yes)? {
                println!("Aborted.");
                return Ok(());
            }
            service.delete_material(&id)?;
            println!("Removed material: {}", name);
        }
    }
    Ok(())
}

fn run_catalog_command(
    service: &mut AppService,
    cmd: CatalogCommands,
    assume_yes: bool,
) -> Result<()> {
    match cmd {
        CatalogCommands::Add {
            name,
            description,
            value,
        } => {
            let service_type = service.create_service_type(ServiceTypeInput {
                name,
                description: description.unwrap_or_default(),
                base_value: parse_money_arg(value.as_deref())?,
            })?;
            println!(
                "Created service type: {} ({})",
                service_type.name, service_type.id
            );
        }

        CatalogCommands::List => {
            for service_type in service.list_service_types() {
                println!(
                    "{}  {:<24} {}",
                    service_type.id,
                    service_type.name,
                    format_brl(service_type.base_value)
                );
            }
            if service.list_service_types().is_empty() {
                println!("The price catalog is empty.");
            }
        }

        CatalogCommands::Edit {
            id,
            name,
            description,
            value,
        } => {
            let service_type = service.update_service_type(
                &id,
                ServiceTypePatch {
                    name,
                    description,
                    base_value: parse_money_opt(value.as_deref())?,
                },
            )?;
            println!(
                "Updated service type: {} ({})",
                service_type.name, service_type.id
            );
        }

        CatalogCommands::Remove { id } => {
            let name = service
                .list_service_types()
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.name.clone())
                .context("Service type not found")?;
            if !confirm(&format!("Remove service type '{}'?", name), assume_yes)? {
                println!("Aborted.");
                return Ok(());
            }
            service.delete_service_type(&id)?;
            println!("Removed service type: {}", name);
        }
    }
    Ok(())
}

fn run_service_command(
    service: &mut AppService,
    profile: &BusinessProfile,
    cmd: ServiceCommands,
    assume_yes: bool,
) -> Result<()> {
    match cmd {
        ServiceCommands::Add {
            customer,
            date,
            items,
            labor,
            materials,
            payment,
            installments,
            status,
            discount,
            description,
        } => {
            let record = service.create_service(ServiceInput {
                customer_id: customer,
                description: description.unwrap_or_default(),
                date: parse_date_or_today(date.as_deref())?,
                labor: parse_labor(&items, labor.as_deref())?,
                materials: collect_material_items(&materials)?,
                payment_method: parse_payment(&payment)?,
                installments,
                status: parse_status(&status)?,
                discount: parse_money_arg(Some(discount.as_str()))?,
            })?;
            println!(
                "Recorded service #{}: {} on {} ({})",
                record.short_id(),
                format_brl(record.total_value),
                record.date.format("%d/%m/%Y"),
                record.id
            );
        }

        ServiceCommands::List { limit } => {
            let records = reporting::recent_services(service.state(), limit.unwrap_or(usize::MAX));
            for record in &records {
                let customer = service
                    .state()
                    .find_customer(&record.customer_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or(UNKNOWN_CUSTOMER);
                println!(
                    "{}  {}  {:<24} {:<18} {}",
                    record.short_id(),
                    record.date.format("%d/%m/%Y"),
                    customer,
                    record.status.as_str(),
                    format_brl(record.total_value)
                );
            }
            if records.is_empty() {
                println!("No services recorded yet.");
            }
        }

        ServiceCommands::Show { id } => {
            let view = {
                let record = service.get_service(&id)?;
                build_receipt(service.state(), profile, record)
            };
            println!("{} #{}", view.document_title, view.number);
            println!("Client:  {}", view.customer_name);
            println!("Date:    {}", view.date.format("%d/%m/%Y"));
            println!("Status:  {}", view.status);
            if !view.description.is_empty() {
                println!("Report:  {}", view.description);
            }
            for line in view.service_lines.iter().chain(&view.material_lines) {
                println!(
                    "  {}x {:<24} {}",
                    line.quantity,
                    line.name,
                    format_brl(line.subtotal)
                );
            }
            if view.discount > 0 {
                println!("Discount: -{}", format_brl(view.discount));
            }
            println!("Total:   {}", format_brl(view.total));
            match view.installments {
                n if n > 1 => println!("Payment: {} ({} installments)", view.payment_method, n),
                _ => println!("Payment: {}", view.payment_method),
            }
        }

        ServiceCommands::Receipt { id, pdf, fonts } => {
            let view = {
                let record = service.get_service(&id)?;
                build_receipt(service.state(), profile, record)
            };
            print!("{}", receipt_text(&view));
            if let Some(path) = pdf {
                PdfRenderer::new(fonts).render(&view, path.as_ref())?;
                println!("Receipt PDF written: {}", path);
            }
        }

        ServiceCommands::Edit {
            id,
            customer,
            date,
            items,
            labor,
            materials,
            payment,
            installments,
            status,
            discount,
            description,
        } => {
            let labor_patch = if !items.is_empty() {
                Some(Labor::Itemized(collect_service_items(&items)?))
            } else {
                labor
                    .as_deref()
                    .map(|value| parse_cents(value).map(Labor::Flat))
                    .transpose()
                    .context("Invalid labor value. Use '150.00' or '150'")?
            };
            let record = service.update_service(
                &id,
                ServicePatch {
                    customer_id: customer,
                    description,
                    date: date.as_deref().map(parse_date).transpose()?,
                    labor: labor_patch,
                    materials: if materials.is_empty() {
                        None
                    } else {
                        Some(collect_material_items(&materials)?)
                    },
                    payment_method: payment.as_deref().map(parse_payment).transpose()?,
                    installments,
                    status: status.as_deref().map(parse_status).transpose()?,
                    discount: parse_money_opt(discount.as_deref())?,
                },
            )?;
            println!(
                "Updated service #{}: total {}",
                record.short_id(),
                format_brl(record.total_value)
            );
        }

        ServiceCommands::Remove { id } => {
            let short = service.get_service(&id)?.short_id();
            if !confirm(&format!("Remove service record #{}?", short), assume_yes)? {
                println!("Aborted.");
                return Ok(());
            }
            service.delete_service(&id)?;
            println!("Removed service record #{}", short);
        }
    }
    Ok(())
}

fn run_dashboard_command(service: &AppService) -> Result<()> {
    let state = service.state();
    let stats = reporting::dashboard_stats(state);

    println!("Total revenue:   {}", format_brl(stats.total_revenue));
    println!("Customers:       {}", stats.customer_count);
    println!("Services:        {}", stats.service_count);
    println!("Stock alerts:    {}", stats.low_stock_count);

    println!("\nRecent services:");
    let recent = reporting::recent_services(state, 5);
    for record in &recent {
        let customer = state
            .find_customer(&record.customer_id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CUSTOMER);
        println!(
            "  {}  {:<24} {:<18} {}",
            record.date.format("%d/%m/%Y"),
            customer,
            record.status.as_str(),
            format_brl(record.total_value)
        );
    }
    if recent.is_empty() {
        println!("  none yet");
    }

    println!("\nLow stock (< 10):");
    let low = reporting::low_stock(state);
    for material in &low {
        let flag = if material.is_critical_stock() {
            "  URGENT"
        } else {
            ""
        };
        println!("  {:<24} {} un{}", material.name, material.stock, flag);
    }
    if low.is_empty() {
        println!("  stock is healthy");
    }

    Ok(())
}

fn run_calendar_command(service: &AppService, month: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let (year, month) = match month {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };

    let days = reporting::services_in_month(service.state(), year, month);
    let first = NaiveDate::from_ymd_opt(year, month, 1).context("Invalid month")?;
    let days_in_month = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    }
    .map(|next| next.signed_duration_since(first).num_days() as u32)
    .context("Invalid month")?;

    println!("{}", first.format("%B %Y"));
    println!("Sun   Mon   Tue   Wed   Thu   Fri   Sat");

    let mut line = String::new();
    for _ in 0..first.weekday().num_days_from_sunday() {
        line.push_str("      ");
    }
    for day in 1..=days_in_month {
        let date = NaiveDate::from_ymd_opt(year, month, day).context("Invalid month")?;
        let count = days.get(&date).map(|records| records.len()).unwrap_or(0);
        if count > 0 {
            line.push_str(&format!("{:>2}({})", day, count));
        } else {
            line.push_str(&format!("{:>2}   ", day));
        }
        line.push(' ');
        if date.weekday().num_days_from_sunday() == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }

    for (date, records) in &days {
        println!("\n{}:", date.format("%d/%m/%Y"));
        for record in records {
            let customer = service
                .state()
                .find_customer(&record.customer_id)
                .map(|c| c.name.as_str())
                .unwrap_or(UNKNOWN_CUSTOMER);
            println!("  {:<24} [{}]", customer, record.status);
        }
    }

    Ok(())
}

fn run_export_command(service: &AppService, export_type: &str, output: Option<&str>) -> Result<()> {
    let exporter = Exporter::new(service.state());

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create file {}", path))?,
        ),
        None => Box::new(io::stdout()),
    };

    let count = match export_type {
        "services" => exporter.export_services_csv(writer)?,
        "customers" => exporter.export_customers_csv(writer)?,
        "materials" => exporter.export_materials_csv(writer)?,
        other => anyhow::bail!(
            "Unknown export type '{}'. Use services, customers or materials",
            other
        ),
    };

    if let Some(path) = output {
        println!("Exported {} {} to {}", count, export_type, path);
    }
    Ok(())
}

async fn run_insight_command(service: &AppService) {
    let Some(provider) = GeminiInsights::from_env() else {
        println!("The AI analysis needs a GEMINI_API_KEY configured in the environment.");
        return;
    };

    println!("Generating analysis...");
    match provider.summarize(service.state()).await {
        Ok(text) => println!("\n{}", text),
        Err(err) => {
            warn!(%err, "insight generation failed");
            println!("\n{}", INSIGHT_FALLBACK);
        }
    }
}

async fn enrich_from_postal(input: &mut CustomerInput, cep: &str) {
    if !input.street.is_empty() && !input.city.is_empty() {
        return;
    }
    match ViaCep::new().resolve_postal(cep).await {
        Ok(resolved) => {
            if input.street.is_empty() {
                input.street = resolved.street;
            }
            if input.neighborhood.is_empty() {
                input.neighborhood = resolved.neighborhood;
            }
            if input.city.is_empty() {
                input.city = resolved.city;
            }
            if input.state.is_empty() {
                input.state = resolved.state;
            }
        }
        // Best effort only: the address fields stay as typed.
        Err(err) => warn!(%err, cep, "postal lookup failed"),
    }
}

async fn enrich_patch_from_postal(patch: &mut CustomerPatch, cep: &str) {
    if patch.street.is_some() && patch.city.is_some() {
        return;
    }
    match ViaCep::new().resolve_postal(cep).await {
        Ok(resolved) => {
            patch.street.get_or_insert(resolved.street);
            patch.neighborhood.get_or_insert(resolved.neighborhood);
            patch.city.get_or_insert(resolved.city);
            patch.state.get_or_insert(resolved.state);
        }
        Err(err) => warn!(%err, cep, "postal lookup failed"),
    }
}

/// Blocking yes/no prompt used by every delete.
fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn parse_labor(items: &[String], flat: Option<&str>) -> Result<Labor> {
    if !items.is_empty() {
        return Ok(Labor::Itemized(collect_service_items(items)?));
    }
    let value = match flat {
        Some(raw) => parse_cents(raw).context("Invalid labor value. Use '150.00' or '150'")?,
        None => 0,
    };
    Ok(Labor::Flat(value))
}

fn collect_service_items(specs: &[String]) -> Result<Vec<ServiceItem>> {
    let mut items = Vec::new();
    for spec in specs {
        let (id, quantity) = parse_line_item(spec)?;
        add_service_item(&mut items, &id, quantity);
    }
    Ok(items)
}

fn collect_material_items(specs: &[String]) -> Result<Vec<MaterialItem>> {
    let mut items = Vec::new();
    for spec in specs {
        let (id, quantity) = parse_line_item(spec)?;
        add_material_item(&mut items, &id, quantity);
    }
    Ok(items)
}

/// Parse an "ID:QTY" line-item spec; the quantity defaults to 1.
fn parse_line_item(spec: &str) -> Result<(String, u32)> {
    let (id, quantity) = match spec.rsplit_once(':') {
        Some((id, raw_qty)) => {
            let quantity: u32 = raw_qty
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", spec))?;
            (id.to_string(), quantity)
        }
        None => (spec.to_string(), 1),
    };
    if id.is_empty() || quantity == 0 {
        anyhow::bail!("Invalid line item '{}'. Use ID:QTY with QTY >= 1", spec);
    }
    Ok((id, quantity))
}

fn parse_payment(raw: &str) -> Result<PaymentMethod> {
    raw.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn parse_status(raw: &str) -> Result<ServiceStatus> {
    raw.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
}

fn parse_date_or_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", raw))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", raw))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", raw))?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Invalid month '{}'. Use YYYY-MM", raw);
    }
    Ok((year, month))
}

fn parse_money_arg(raw: Option<&str>) -> Result<i64> {
    match raw {
        Some(raw) => parse_cents(raw).context("Invalid amount format. Use '50.00' or '50'"),
        None => Ok(0),
    }
}

fn parse_money_opt(raw: Option<&str>) -> Result<Option<i64>> {
    raw.map(|raw| parse_cents(raw).context("Invalid amount format. Use '50.00' or '50'"))
        .transpose()
}
