use crate::source::{self, RawTable};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("required column missing from input: {0}")]
    MissingColumn(&'static str),

    #[error("no production records found for {0}")]
    NoData(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRecord {
    pub date: NaiveDate,
    pub product: String,
    pub boxes: u64,
    pub rm_kg: f64,
    pub scrap_kg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySlice {
    pub date: NaiveDate,
    pub scrap_present: bool,
    pub records: Vec<ProductionRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductAggregate {
    pub product: String,
    pub total_boxes: u64,
    pub total_rm_kg: f64,
    pub total_scrap_kg: f64,
    pub yield_boxes_per_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_boxes: u64,
    pub total_rm_kg: f64,
    pub total_scrap_kg: f64,
    pub average_yield: Option<f64>,
}

const REQUIRED_COLUMNS: [&str; 4] = [
    source::DATE_COLUMN,
    source::PRODUCT_COLUMN,
    source::BOXES_COLUMN,
    source::RM_COLUMN,
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

pub fn select_day(table: &RawTable, target: NaiveDate) -> Result<DaySlice, SummaryError> {
    for column in REQUIRED_COLUMNS {
        if !table.has_column(column) {
            return Err(SummaryError::MissingColumn(column));
        }
    }

    let scrap_present = table.has_column(source::SCRAP_COLUMN);
    let mut dropped = 0_usize;

    let records = table
        .rows
        .iter()
        .filter_map(|row| {
            let record = parse_record(row, scrap_present);
            if record.is_none() {
                dropped += 1;
            }
            record
        })
        .filter(|record| record.date == target)
        .collect::<Vec<_>>();

    if dropped > 0 {
        warn!(dropped, "skipped rows with missing or malformed required fields");
    }

    if records.is_empty() {
        return Err(SummaryError::NoData(target));
    }

    Ok(DaySlice {
        date: target,
        scrap_present,
        records,
    })
}

pub fn aggregate(slice: &DaySlice) -> (DaySummary, Vec<ProductAggregate>) {
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ProductAggregate> = Vec::new();

    for record in &slice.records {
        let index = *group_index.entry(record.product.clone()).or_insert_with(|| {
            groups.push(ProductAggregate {
                product: record.product.clone(),
                total_boxes: 0,
                total_rm_kg: 0.0,
                total_scrap_kg: 0.0,
                yield_boxes_per_kg: None,
            });
            groups.len() - 1
        });

        let group = &mut groups[index];
        group.total_boxes += record.boxes;
        group.total_rm_kg += record.rm_kg;
        if slice.scrap_present {
            group.total_scrap_kg += record.scrap_kg;
        }
    }

    for group in &mut groups {
        group.yield_boxes_per_kg = yield_ratio(group.total_boxes, group.total_rm_kg);
    }

    // Stable sort keeps first-encountered order between equal box counts.
    groups.sort_by(|left, right| right.total_boxes.cmp(&left.total_boxes));

    let defined_yields = groups
        .iter()
        .filter_map(|group| group.yield_boxes_per_kg)
        .collect::<Vec<_>>();
    let average_yield = (!defined_yields.is_empty())
        .then(|| defined_yields.iter().sum::<f64>() / defined_yields.len() as f64);

    let summary = DaySummary {
        date: slice.date,
        total_boxes: groups.iter().map(|group| group.total_boxes).sum(),
        total_rm_kg: groups.iter().map(|group| group.total_rm_kg).sum(),
        total_scrap_kg: groups.iter().map(|group| group.total_scrap_kg).sum(),
        average_yield,
    };

    (summary, groups)
}

fn parse_record(row: &HashMap<String, String>, scrap_present: bool) -> Option<ProductionRecord> {
    let date = parse_prod_date(row.get(source::DATE_COLUMN)?)?;

    let product = row.get(source::PRODUCT_COLUMN)?.trim();
    if product.is_empty() {
        return None;
    }

    let boxes = parse_boxes(row.get(source::BOXES_COLUMN)?)?;
    let rm_kg = parse_quantity(row.get(source::RM_COLUMN)?)?;

    // Schema-level absence is carried on the slice; a blank cell in a tracked
    // scrap column counts as zero scrap for that row.
    let scrap_kg = if scrap_present {
        row.get(source::SCRAP_COLUMN)
            .and_then(|value| parse_quantity(value))
            .unwrap_or(0.0)
    } else {
        0.0
    };

    Some(ProductionRecord {
        date,
        product: product.to_string(),
        boxes,
        rm_kg,
        scrap_kg,
    })
}

pub fn parse_prod_date(raw: &str) -> Option<NaiveDate> {
    // Datetime cells arrive as "YYYY-MM-DD HH:MM:SS"; the date part is enough.
    let value = raw.trim().split_whitespace().next()?;

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_boxes(raw: &str) -> Option<u64> {
    let value = raw.trim().replace(',', "");

    if let Ok(parsed) = value.parse::<u64>() {
        return Some(parsed);
    }

    // Spreadsheet exports often render whole counts as "100.0".
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite() && *parsed >= 0.0 && parsed.fract() == 0.0)
        .map(|parsed| parsed as u64)
}

fn parse_quantity(raw: &str) -> Option<f64> {
    let value = raw.trim().replace(',', "");
    if value.is_empty() {
        return None;
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite() && *parsed >= 0.0)
}

fn yield_ratio(boxes: u64, rm_kg: f64) -> Option<f64> {
    (rm_kg != 0.0).then(|| boxes as f64 / rm_kg)
}
