//! Conversion table loading from CSV, XLSX and JSON files.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use super::ConversionTable;
use crate::error::ConversionError;
use crate::models::config::ConversionConfig;

/// Supported conversion table file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
    Json,
}

impl TableFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" | "txt" | "tsv" => Some(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(TableFormat::Xlsx),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }
}

/// Load a conversion table, picking the format from the file extension.
pub fn load_table(path: &Path, config: &ConversionConfig) -> Result<ConversionTable, ConversionError> {
    let format = TableFormat::from_path(path)
        .ok_or_else(|| ConversionError::UnsupportedFormat(path.display().to_string()))?;

    let table = match format {
        TableFormat::Csv => {
            let file = std::fs::File::open(path).map_err(|source| ConversionError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            load_csv(file, config)?
        }
        TableFormat::Xlsx => load_xlsx(path, config)?,
        TableFormat::Json => {
            let content =
                std::fs::read_to_string(path).map_err(|source| ConversionError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            load_json(&content)?
        }
    };

    info!(
        "Loaded conversion table from {} ({} entries)",
        path.display(),
        table.len()
    );
    Ok(table)
}

/// Load a table from CSV data.
pub fn load_csv<R: Read>(reader: R, config: &ConversionConfig) -> Result<ConversionTable, ConversionError> {
    let delimiter = u8::try_from(config.delimiter).unwrap_or(b',');
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(config.has_headers)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = ConversionTable::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let row = idx + 1;
        let customer = record.get(config.customer_column).ok_or(ConversionError::MissingColumn {
            row,
            column: config.customer_column,
        })?;
        let internal = record.get(config.internal_column).ok_or(ConversionError::MissingColumn {
            row,
            column: config.internal_column,
        })?;

        table.insert(customer, internal)?;
    }

    Ok(table)
}

/// Load a table from a spreadsheet (first sheet unless one is configured).
pub fn load_xlsx(path: &Path, config: &ConversionConfig) -> Result<ConversionTable, ConversionError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ConversionError::Spreadsheet(format!("failed to open {}: {e}", path.display())))?;

    let sheet_name = match &config.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ConversionError::Spreadsheet("workbook has no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ConversionError::Spreadsheet(format!("sheet '{sheet_name}' not readable: {e}")))?;

    debug!("Reading sheet '{}' ({:?} cells)", sheet_name, range.get_size());

    let skip = usize::from(config.has_headers);
    let mut table = ConversionTable::new();

    for row in range.rows().skip(skip) {
        let customer = row.get(config.customer_column).and_then(cell_as_string);
        let internal = row.get(config.internal_column).and_then(cell_as_string);

        if let (Some(customer), Some(internal)) = (customer, internal) {
            table.insert(&customer, &internal)?;
        }
    }

    Ok(table)
}

/// Load a table from a JSON object of `"customer": "internal"` pairs.
pub fn load_json(content: &str) -> Result<ConversionTable, ConversionError> {
    let pairs: BTreeMap<String, String> = serde_json::from_str(content)?;
    ConversionTable::from_pairs(pairs)
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        // Numeric codes come back as floats: 274077.0 -> "274077"
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}
