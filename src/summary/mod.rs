pub mod aggregate;
pub mod assemble;
pub mod render;

use crate::source::RawTable;
use crate::summary::aggregate::{DaySummary, ProductAggregate};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ProductionReport {
    pub date: NaiveDate,
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
    pub summary: DaySummary,
    pub products: Vec<ProductAggregate>,
}

pub fn compose_report(table: &RawTable, date: NaiveDate) -> Result<ProductionReport> {
    let slice = aggregate::select_day(table, date)?;
    let (summary, products) = aggregate::aggregate(&slice);

    let report_date = date.format(assemble::REPORT_DATE_FORMAT).to_string();
    let figures = assemble::SummaryFigures::from_summary(&summary);
    let efficiency_note = render::efficiency_note(&summary);
    let text_table = render::text_table(&products);
    let html_table = render::html_table(&products);

    info!(
        date = %date,
        records = slice.records.len(),
        products = products.len(),
        "daily production summary composed"
    );

    Ok(ProductionReport {
        date,
        subject: assemble::subject_line(&report_date),
        plain_body: assemble::plain_body(&figures, &text_table, &efficiency_note, &report_date),
        html_body: assemble::html_body(&figures, &html_table, &efficiency_note, &report_date),
        summary,
        products,
    })
}
