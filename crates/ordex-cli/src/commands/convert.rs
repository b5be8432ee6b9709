//! Convert command - turn a single purchase order into an order sheet.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ordex_core::{DocumentStatus, OrderConverter, PurchaseOrderParser, TextSource};

use super::{
    debug_text_path, format_report, load_config, load_conversion_table, open_source, OutputFormat,
};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input file (PDF, or already-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Conversion table (CSV, XLSX or JSON)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Also write the extracted text as <stem>_debug.txt
    #[arg(long)]
    dump_text: bool,
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Converting file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading conversion table...");
    pb.set_position(10);
    let table = load_conversion_table(args.table.as_deref(), &config)?;

    pb.set_message("Extracting text...");
    pb.set_position(30);
    let source = open_source(&args.input, &config.pdf)?;
    let text = source.full_text()?;

    if args.dump_text || config.output.dump_text {
        let dump_path = debug_text_path(args.output.as_deref().unwrap_or(args.input.as_path()));
        fs::write(&dump_path, &text)?;
        debug!("Wrote extracted text to {}", dump_path.display());
    }

    pb.set_message("Parsing order...");
    pb.set_position(60);

    let parser = PurchaseOrderParser::from_config(config.parser.clone())?;
    let converter = OrderConverter::new(&table)
        .with_parser(parser)
        .with_min_text_length(config.pdf.min_text_length);

    let source_name = args.input.display().to_string();
    let outcome = converter.convert_text(&source_name, &text);

    pb.set_position(100);
    pb.finish_and_clear();

    if outcome.status == DocumentStatus::Failed {
        anyhow::bail!(
            "Could not convert {}: {}",
            source_name,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    for warning in &outcome.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let output = format_report(&outcome.report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    let summary = &outcome.report.summary;
    if summary.unmapped > 0 {
        eprintln!(
            "{} {} of {} items unmapped: {}",
            style("!").yellow(),
            summary.unmapped,
            summary.total,
            summary.unmapped_codes.join(", ")
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
