//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod convert;
pub mod table;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::{debug, info};

use ordex_core::conversion::load_table;
use ordex_core::models::config::PdfConfig;
use ordex_core::{
    ConversionTable, OrderReport, OrdexConfig, PdfExtractor, PdfProcessor, PlainText, TextSource,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV order sheet
    Csv,
    /// JSON report
    Json,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

/// Load the config given with `--config`, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<OrdexConfig> {
    if let Some(path) = config_path {
        return Ok(OrdexConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(OrdexConfig::from_file(&default_path)?)
    } else {
        Ok(OrdexConfig::default())
    }
}

/// Load the conversion table from `--table` or the configured path.
///
/// With neither, every code resolves to UNMAPPED.
pub fn load_conversion_table(
    table: Option<&Path>,
    config: &OrdexConfig,
) -> anyhow::Result<ConversionTable> {
    let path = table.or(config.conversion.table_path.as_deref());

    match path {
        Some(path) => Ok(load_table(path, &config.conversion)?),
        None => {
            eprintln!(
                "{} No conversion table given, all codes will be UNMAPPED",
                style("!").yellow()
            );
            Ok(ConversionTable::new())
        }
    }
}

/// True for the input types the converter reads.
pub fn is_supported_input(path: &Path) -> bool {
    matches!(input_extension(path).as_str(), "pdf" | "txt")
}

fn input_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Open an input document as a text source.
///
/// `.txt` files are taken as already-extracted text, one page.
pub fn open_source(path: &Path, pdf: &PdfConfig) -> anyhow::Result<Box<dyn TextSource>> {
    let extension = input_extension(path);

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::new().with_max_pages(pdf.max_pages);
            extractor.load(&data)?;
            info!("{}: {} pages", path.display(), extractor.page_count());
            Ok(Box::new(extractor))
        }
        "txt" => Ok(Box::new(PlainText::new(fs::read_to_string(path)?))),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Render one report in the requested format.
pub fn format_report(report: &OrderReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &OrderReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(OrderReport::COLUMNS)?;
    for row in &report.rows {
        wtr.write_record(row.fields())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &OrderReport) -> String {
    let header = &report.header;
    let mut output = String::new();

    output.push_str(&format!("Order:    {}\n", header.order_number));
    output.push_str(&format!("Date:     {}\n", header.order_date));
    output.push_str(&format!("Delivery: {}\n", header.delivery_date));
    output.push_str(&format!("Supplier: {}\n", header.supplier_name));
    output.push('\n');

    output.push_str(&format!("Items ({}):\n", report.item_count()));
    for row in &report.rows {
        output.push_str(&format!(
            "  {:<12} {:<12} {:>6} {:<12} {}\n",
            row.customer_code, row.internal_code, row.quantity, row.unit_of_measure, row.description
        ));
    }

    if !report.summary.unmapped_codes.is_empty() {
        output.push_str(&format!(
            "\nUnmapped codes: {}\n",
            report.summary.unmapped_codes.join(", ")
        ));
    }

    output
}

/// Output file name for a converted document.
///
/// Uses the PO number when asked to and one was found, else the input stem.
pub fn output_file_name(
    input: &Path,
    report: &OrderReport,
    by_order_number: bool,
    format: OutputFormat,
) -> String {
    let order_number = report.header.order_number.trim();
    let stem = if by_order_number && !order_number.is_empty() {
        format!("PO_{}", order_number)
    } else {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("order")
            .to_string()
    };

    format!("{}.{}", stem, format.extension())
}

/// Path of the extracted-text dump for an output (or input) file.
pub fn debug_text_path(next_to: &Path) -> PathBuf {
    let stem = next_to
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("order");
    next_to.with_file_name(format!("{}_debug.txt", stem))
}
