//! Table command - load a conversion table and show what it holds.

use std::path::PathBuf;

use clap::Args;
use console::style;

use ordex_core::conversion::load_table;

use super::load_config;

/// Arguments for the table command.
#[derive(Args)]
pub struct TableArgs {
    /// Conversion table (CSV, XLSX or JSON)
    #[arg(required = true)]
    path: PathBuf,

    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "10")]
    limit: usize,

    /// Look up a single customer code
    #[arg(short, long)]
    lookup: Option<String>,
}

pub async fn run(args: TableArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let table = load_table(&args.path, &config.conversion)?;

    println!(
        "{} {} entries in {}",
        style("✓").green(),
        table.len(),
        args.path.display()
    );

    if let Some(code) = &args.lookup {
        let code = ordex_core::models::order::normalize_code(code);
        println!("{} -> {}", code, table.lookup(&code));
        return Ok(());
    }

    let entries = table.entries();
    for (customer, internal) in entries.iter().take(args.limit) {
        println!("  {:<16} {}", customer, internal);
    }
    if entries.len() > args.limit {
        println!("  ... {} more", entries.len() - args.limit);
    }

    Ok(())
}
