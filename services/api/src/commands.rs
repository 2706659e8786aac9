use crate::infra::catalog_source;
use crate::routes::plan_summaries;
use clap::Args;
use costsheet::config::AppConfig;
use costsheet::error::AppError;
use costsheet::progress::TracingProgress;
use costsheet::workflows::catalog::{
    available_units, find_project, search_units, sorted_projects, CatalogRecord, HandoffStore,
    InventoryUnit, UnitRoute,
};
use costsheet::workflows::costing::{
    prepare_cost_sheet, AmountRow, CostSheet, CostSheetView, CostingOutcome, PlanId,
    RawUnitAttributes,
};
use costsheet::workflows::export::{
    cost_sheet_document, inventory_document, DocumentExporter, ExportError, TabularDocument,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ProjectsArgs {
    /// Show details for the named project instead of the listing
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Read projects from a spreadsheet CSV export instead of the live catalog
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InventoryArgs {
    /// Only show units of this project
    #[arg(long)]
    pub(crate) project: Option<String>,
    /// Keep units with any field containing this text
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Read inventory from a spreadsheet CSV export instead of the live catalog
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Also write the listing as a PDF into EXPORT_DIR
    #[arg(long)]
    pub(crate) pdf: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CostingArgs {
    /// Unit size as listed, e.g. "150" or "150 SqYD"
    #[arg(long)]
    pub(crate) size: String,
    /// Base rate per area unit
    #[arg(long)]
    pub(crate) rate: String,
    /// PLC rate per area unit
    #[arg(long)]
    pub(crate) plc: Option<String>,
    /// Costing plan label as it appears in the inventory sheet; all configured
    /// plans are shown when omitted
    #[arg(long)]
    pub(crate) plan: Option<String>,
    #[arg(long)]
    pub(crate) project: Option<String>,
    #[arg(long)]
    pub(crate) unit: Option<String>,
    #[arg(long = "type")]
    pub(crate) unit_type: Option<String>,
    /// Also write the cost sheet as a PDF into EXPORT_DIR
    #[arg(long)]
    pub(crate) pdf: bool,
}

impl CostingArgs {
    fn raw_attributes(&self, plan_label: &str) -> RawUnitAttributes {
        RawUnitAttributes {
            project_name: self.project.clone().unwrap_or_default(),
            unit_no: self.unit.clone().unwrap_or_default(),
            unit_size: self.size.clone(),
            unit_type: self.unit_type.clone().unwrap_or_default(),
            price_rate: self.rate.clone(),
            plc_rate: self.plc.clone().unwrap_or_default(),
            costing_plan: plan_label.to_string(),
        }
    }
}

pub(crate) fn run_plans() {
    println!("Configured costing plans");
    for summary in plan_summaries() {
        println!(
            "\n{} (per {}) -> {}",
            summary.label, summary.area_unit, summary.page
        );
        println!("  Selected by: {}", summary.selector_keys.join(", "));
        for milestone in &summary.milestones {
            println!("  - {milestone}");
        }
    }
}

pub(crate) async fn run_projects(config: &AppConfig, args: ProjectsArgs) -> Result<(), AppError> {
    let catalog = catalog_source(config, args.catalog_csv.as_deref(), None)?;
    let records = catalog.projects().await;

    if let Some(name) = args.name {
        match find_project(&records, &name) {
            Some(detail) => {
                println!("{}", detail.name);
                for attribute in &detail.attributes {
                    println!("  {}: {}", attribute.label, attribute.value);
                }
                match &detail.brochure_url {
                    Some(url) => println!("  Brochure: {url}"),
                    None => println!("  Brochure: N/A"),
                }
                for url in &detail.gallery {
                    println!("  Image: {url}");
                }
            }
            None => println!("Project Not Found"),
        }
        return Ok(());
    }

    let cards = sorted_projects(&records);
    if cards.is_empty() {
        println!("No projects found.");
        return Ok(());
    }
    for card in &cards {
        println!("- {} [{}] {} ({})", card.name, card.tag(), card.location, card.chip());
    }
    Ok(())
}

pub(crate) async fn run_inventory(config: &AppConfig, args: InventoryArgs) -> Result<(), AppError> {
    let catalog = catalog_source(config, None, args.catalog_csv.as_deref())?;
    let records = catalog.inventory().await;
    let project = args.project.unwrap_or_default();

    let available = available_units(&records, Some(project.as_str()));
    let query = args.search.as_deref().unwrap_or_default();
    let rows: Vec<CatalogRecord> = search_units(&available, query)
        .into_iter()
        .cloned()
        .collect();

    if project.is_empty() {
        println!("Inventory");
    } else {
        println!("{project} - Inventory");
    }
    render_inventory(&rows, &project, &config.support_contact);

    if args.pdf {
        let exporter = DocumentExporter::from_config(&config.export);
        export_document(&exporter, &inventory_document(&project, &rows)).await?;
    }
    Ok(())
}

fn render_inventory(rows: &[CatalogRecord], project: &str, contact: &str) {
    if rows.is_empty() {
        println!("No units");
        return;
    }

    println!(
        "{:<12} {:<10} {:<12} {:<16} {:<14} Cost sheet",
        "Unit No", "Size", "Type", "Possession", "Payment"
    );
    for record in rows {
        let unit = InventoryUnit::from_record(record);
        let mut handoff = HandoffStore::default();
        handoff.select_unit(record, project);
        let route = match handoff.route(contact) {
            UnitRoute::CostSheet { page, .. } => page.to_string(),
            UnitRoute::NotConfigured(_) => "not configured".to_string(),
        };
        println!(
            "{:<12} {:<10} {:<12} {:<16} {:<14} {}",
            unit.unit_no, unit.size, unit.unit_type, unit.possession, unit.payment, route
        );
    }
}

pub(crate) async fn run_costing(config: &AppConfig, args: CostingArgs) -> Result<(), AppError> {
    let exporter = DocumentExporter::from_config(&config.export);

    let views = match args.plan.as_deref() {
        Some(label) => {
            let attributes = args.raw_attributes(label).coerce();
            match prepare_cost_sheet(attributes, &config.support_contact, &TracingProgress) {
                CostingOutcome::Ready(sheet) => vec![CostSheetView::from_sheet(&sheet)],
                CostingOutcome::NotConfigured(notice) => {
                    println!("{}", notice.message());
                    return Ok(());
                }
            }
        }
        None => PlanId::ordered()
            .into_iter()
            .map(|plan| {
                let attributes = args.raw_attributes(plan.label()).coerce();
                CostSheetView::from_sheet(&CostSheet::compute(plan, attributes))
            })
            .collect(),
    };

    for view in &views {
        render_cost_sheet(view);
        if args.pdf {
            export_document(&exporter, &cost_sheet_document(view)).await?;
        }
    }
    Ok(())
}

fn render_amounts(heading: &str, rows: &[AmountRow]) {
    println!("\n{:<56} {:>14}", heading, "Amount");
    for row in rows {
        println!("{:<56} {:>14}", row.label, row.display);
    }
}

pub(crate) fn render_cost_sheet(view: &CostSheetView) {
    println!("\n{} | {} ({})", view.project_name, view.plan_label, view.page);
    println!(
        "Unit No {} | Size {} | Type {}",
        view.unit.unit_no, view.unit.size, view.unit.unit_type
    );

    let mut particulars = view.rates.clone();
    particulars.extend(view.breakdown.iter().cloned());
    particulars.push(view.grand_total.clone());
    render_amounts("Particulars", &particulars);

    render_amounts("Milestone", &view.schedule);
    println!(
        "{:<56} {:>14}",
        view.schedule_total.label, view.schedule_total.display
    );
}

/// Writes the document; an unavailable renderer is reported without failing
/// the command.
async fn export_document(
    exporter: &DocumentExporter,
    document: &TabularDocument,
) -> Result<(), AppError> {
    match exporter.export(document, &TracingProgress).await {
        Ok(receipt) => {
            println!(
                "\nSaved {} ({} bytes, {})",
                receipt.path.display(),
                receipt.bytes,
                receipt.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            Ok(())
        }
        Err(ExportError::RendererUnavailable { reason }) => {
            println!("\nCould not create PDF: {reason}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
