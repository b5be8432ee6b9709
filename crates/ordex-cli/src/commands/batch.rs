//! Batch command - convert many purchase orders in parallel.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use ordex_core::models::config::{OutputConfig, PdfConfig};
use ordex_core::{
    ConversionTable, DocumentOutcome, DocumentStatus, OrderConverter, PurchaseOrderParser,
    TextSource,
};

use super::{
    debug_text_path, format_report, load_config, load_conversion_table, open_source,
    is_supported_input, output_file_name, OutputFormat,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "orders/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Conversion table (CSV, XLSX or JSON)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'd', long, default_value = "output")]
    output_dir: PathBuf,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Stop at the first document that cannot be converted
    #[arg(long)]
    fail_fast: bool,

    /// Also write the extracted text of each document as <name>_debug.txt
    #[arg(long)]
    dump_text: bool,
}

/// One converted input and the text it was read from.
struct ConvertedFile {
    path: PathBuf,
    outcome: DocumentOutcome,
    text: Option<String>,
    elapsed_ms: u64,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    source: &'a str,
    status: &'a str,
    order_number: &'a str,
    items: usize,
    unmapped: usize,
    processing_time_ms: u64,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_input(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to convert",
        style("ℹ").blue(),
        files.len()
    );

    let table = Arc::new(load_conversion_table(args.table.as_deref(), &config)?);
    let parser = PurchaseOrderParser::from_config(config.parser.clone())?;
    let min_text_length = config.pdf.min_text_length;
    let dump_text = args.dump_text || config.output.dump_text;

    fs::create_dir_all(&args.output_dir)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let semaphore = Arc::clone(&semaphore);
        let table = Arc::clone(&table);
        let parser = parser.clone();
        let pdf = config.pdf.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let converted = tokio::task::spawn_blocking(move || {
                convert_file(path, &table, parser, &pdf, min_text_length)
            })
            .await?;
            Ok::<_, anyhow::Error>(converted)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    let mut pending = handles.into_iter();

    while let Some(handle) = pending.next() {
        let converted = handle.await??;
        overall_pb.inc(1);

        if converted.outcome.status == DocumentStatus::Failed {
            let message = converted.outcome.error.clone().unwrap_or_default();
            if args.fail_fast {
                for rest in pending {
                    rest.abort();
                }
                overall_pb.abandon();
                error!("Failed to convert {}: {}", converted.path.display(), message);
                anyhow::bail!("Conversion failed: {}", message);
            }
            warn!("Failed to convert {}: {}", converted.path.display(), message);
        }

        results.push(converted);
    }

    overall_pb.finish_with_message("Complete");

    let mut used_names = HashSet::new();
    for converted in &results {
        write_outputs(converted, &args, &config.output, dump_text, &mut used_names)?;
    }

    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_report(&results, start);

    Ok(())
}

/// Read and convert one file. Never fails; problems land in the outcome.
fn convert_file(
    path: PathBuf,
    table: &ConversionTable,
    parser: PurchaseOrderParser,
    pdf: &PdfConfig,
    min_text_length: usize,
) -> ConvertedFile {
    let file_start = Instant::now();
    let source_name = path.display().to_string();
    let converter = OrderConverter::new(table)
        .with_parser(parser)
        .with_min_text_length(min_text_length);

    let text = open_source(&path, pdf)
        .and_then(|source| source.full_text().map_err(anyhow::Error::from));

    let (outcome, text) = match text {
        Ok(text) => (converter.convert_text(&source_name, &text), Some(text)),
        Err(e) => {
            error!("{}: {}", source_name, e);
            (DocumentOutcome::failed(source_name, e.to_string()), None)
        }
    };

    ConvertedFile {
        path,
        outcome,
        text,
        elapsed_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_outputs(
    converted: &ConvertedFile,
    args: &BatchArgs,
    output: &OutputConfig,
    dump_text: bool,
    used_names: &mut HashSet<String>,
) -> anyhow::Result<()> {
    let outcome = &converted.outcome;
    if outcome.status != DocumentStatus::Converted {
        return Ok(());
    }

    let mut name = output_file_name(
        &converted.path,
        &outcome.report,
        output.name_by_order_number,
        args.format,
    );
    if used_names.contains(&name) {
        // Two documents with one PO number: fall back to the input name.
        name = output_file_name(&converted.path, &outcome.report, false, args.format);
    }
    let name = claim_name(name, used_names);

    let output_path = args.output_dir.join(&name);
    fs::write(&output_path, format_report(&outcome.report, args.format)?)?;
    debug!("Wrote output to {}", output_path.display());

    if dump_text {
        if let Some(text) = &converted.text {
            fs::write(debug_text_path(&output_path), text)?;
        }
    }

    Ok(())
}

/// Reserve `name`, adding `_2`, `_3`, ... before the extension while it is taken.
fn claim_name(name: String, used_names: &mut HashSet<String>) -> String {
    let mut candidate = name.clone();
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) => (stem, format!(".{}", extension)),
        None => (name.as_str(), String::new()),
    };

    let mut n = 2;
    while used_names.contains(&candidate) {
        candidate = format!("{}_{}{}", stem, n, extension);
        n += 1;
    }

    if candidate != name {
        warn!("Output {} already written, using {}", name, candidate);
    }
    used_names.insert(candidate.clone());
    candidate
}

fn write_summary(path: &Path, results: &[ConvertedFile]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for converted in results {
        let outcome = &converted.outcome;
        wtr.serialize(SummaryRow {
            source: &outcome.source,
            status: outcome.status.as_str(),
            order_number: &outcome.report.header.order_number,
            items: outcome.item_count(),
            unmapped: outcome.unmapped_count(),
            processing_time_ms: converted.elapsed_ms,
            error: outcome.error.as_deref().unwrap_or(""),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

fn print_report(results: &[ConvertedFile], start: Instant) {
    let outcomes: Vec<&DocumentOutcome> = results.iter().map(|c| &c.outcome).collect();
    let count = |status: DocumentStatus| outcomes.iter().filter(|o| o.status == status).count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} converted, {} without items, {} failed",
        style(count(DocumentStatus::Converted)).green(),
        style(count(DocumentStatus::NoItems)).yellow(),
        style(count(DocumentStatus::Failed)).red()
    );

    let unmapped: Vec<_> = outcomes.iter().filter(|o| o.unmapped_count() > 0).collect();
    if !unmapped.is_empty() {
        println!();
        println!("{}", style("Unmapped codes:").yellow());
        for outcome in unmapped {
            println!(
                "  - {}: {} of {} ({})",
                outcome.source,
                outcome.unmapped_count(),
                outcome.item_count(),
                outcome.report.summary.unmapped_codes.join(", ")
            );
        }
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in failed {
            println!(
                "  - {}: {}",
                outcome.source,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_name_adds_suffix() {
        let mut used = HashSet::new();

        assert_eq!(claim_name("order.csv".into(), &mut used), "order.csv");
        assert_eq!(claim_name("order.csv".into(), &mut used), "order_2.csv");
        assert_eq!(claim_name("order.csv".into(), &mut used), "order_3.csv");
        assert_eq!(claim_name("order_2.csv".into(), &mut used), "order_2_2.csv");
        assert_eq!(claim_name("notes".into(), &mut used), "notes");
        assert_eq!(claim_name("notes".into(), &mut used), "notes_2");
        assert_eq!(used.len(), 6);
    }
}
