use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

pub const DATE_COLUMN: &str = "ProdDate";
pub const PRODUCT_COLUMN: &str = "Product";
pub const BOXES_COLUMN: &str = "NoofBoxes";
pub const RM_COLUMN: &str = "RMCons";
pub const SCRAP_COLUMN: &str = "scrap";

#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }
}

pub fn load_records(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        bail!("Input file not found: {}", path.display());
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => load_csv(path),
        Some("xlsx") | Some("xls") => load_excel(path),
        other => bail!(
            "Unsupported input format: {} (expected .csv, .xlsx or .xls)",
            other.unwrap_or("none")
        ),
    }
}

fn load_csv(path: &Path) -> Result<RawTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV row")?;
        let mut row = HashMap::new();

        for (index, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(index) {
                row.insert(header.clone(), value.trim().to_string());
            }
        }

        if row.values().all(|value| value.is_empty()) {
            continue;
        }

        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn load_excel(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Workbook contains no worksheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read worksheet: {sheet_name}"))?;

    let mut cells = range.rows();
    let headers = cells
        .next()
        .context("Worksheet is empty")?
        .iter()
        .map(cell_to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for row_cells in cells {
        let mut row = HashMap::new();

        for (index, cell) in row_cells.iter().enumerate() {
            if let Some(header) = headers.get(index) {
                row.insert(header.clone(), cell_to_string(cell));
            }
        }

        if row.values().all(|value| value.is_empty()) {
            continue;
        }

        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => {
            if value.fract() == 0.0 {
                format!("{}", *value as i64)
            } else {
                value.to_string()
            }
        }
        Data::Bool(value) => value.to_string(),
        // Date cells are rendered to ISO strings so every backend hands the
        // filter the same textual shape.
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| datetime.date().format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(value) => value.clone(),
        Data::DurationIso(value) => value.clone(),
    }
}
