use crate::summary::aggregate::DaySummary;
use crate::summary::render;

pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

const CLOSING_NOTE: &str = "Note: Please verify all scrap entries for accuracy.";

/// Summary metrics formatted exactly once, so the plain and HTML bodies can
/// never disagree on a digit.
#[derive(Debug, Clone)]
pub struct SummaryFigures {
    pub total_boxes: String,
    pub total_rm_kg: String,
    pub total_scrap_kg: String,
}

impl SummaryFigures {
    pub fn from_summary(summary: &DaySummary) -> Self {
        Self {
            total_boxes: render::group_thousands(summary.total_boxes),
            total_rm_kg: render::format_kg_grouped(summary.total_rm_kg),
            total_scrap_kg: render::format_kg_grouped(summary.total_scrap_kg),
        }
    }
}

pub fn subject_line(report_date: &str) -> String {
    format!("Production Summary - {report_date}")
}

pub fn plain_body(
    figures: &SummaryFigures,
    text_table: &str,
    efficiency_note: &str,
    report_date: &str,
) -> String {
    format!(
        "Production Summary - {report_date}\n\
         \n\
         Total Output      : {} box(es)\n\
         Raw Material Used : {} kg\n\
         Scrap Generated   : {} kg\n\
         \n\
         {text_table}\n\
         \n\
         {efficiency_note}\n\
         \n\
         {CLOSING_NOTE}\n",
        figures.total_boxes, figures.total_rm_kg, figures.total_scrap_kg,
    )
}

pub fn html_body(
    figures: &SummaryFigures,
    html_table: &str,
    efficiency_note: &str,
    report_date: &str,
) -> String {
    let note_paragraph = efficiency_note.replace('\n', "<br>\n    ");

    format!(
        "<html>\n\
         <body>\n\
         \x20   <h2>Production Summary - {report_date}</h2>\n\
         \x20   <p><b>Total Output</b>: {} box(es)</p>\n\
         \x20   <p><b>Raw Material Used</b>: {} kg</p>\n\
         \x20   <p><b>Scrap Generated</b>: {} kg</p>\n\
         {html_table}\n\
         \x20   <p>{note_paragraph}</p>\n\
         \x20   <p><i>{CLOSING_NOTE}</i></p>\n\
         </body>\n\
         </html>\n",
        figures.total_boxes, figures.total_rm_kg, figures.total_scrap_kg,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn summary() -> DaySummary {
        DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            total_boxes: 1_500,
            total_rm_kg: 150.5,
            total_scrap_kg: 2.25,
            average_yield: Some(9.97),
        }
    }

    #[test]
    fn subject_carries_the_report_date() {
        assert_eq!(subject_line("01-05-2024"), "Production Summary - 01-05-2024");
    }

    #[test]
    fn figures_are_formatted_once() {
        let figures = SummaryFigures::from_summary(&summary());

        assert_eq!(figures.total_boxes, "1,500");
        assert_eq!(figures.total_rm_kg, "150.50");
        assert_eq!(figures.total_scrap_kg, "2.25");
    }

    #[test]
    fn both_bodies_present_identical_metrics() {
        let figures = SummaryFigures::from_summary(&summary());
        let note = "Efficiency Insight:\nAverage material yield is 9.97 boxes per kg of raw material.";

        let plain = plain_body(&figures, "(table)", note, "01-05-2024");
        let html = html_body(&figures, "(table)", note, "01-05-2024");

        for value in ["01-05-2024", "1,500", "150.50", "2.25", "9.97"] {
            assert!(plain.contains(value), "plain missing {value}");
            assert!(html.contains(value), "html missing {value}");
        }
    }

    #[test]
    fn plain_body_ends_with_the_advisory_note() {
        let figures = SummaryFigures::from_summary(&summary());

        let plain = plain_body(&figures, "(table)", "(note)", "01-05-2024");

        assert!(plain.trim_end().ends_with("Note: Please verify all scrap entries for accuracy."));
    }

    #[test]
    fn html_body_is_a_full_document() {
        let figures = SummaryFigures::from_summary(&summary());

        let html = html_body(&figures, "<table></table>", "(note)", "01-05-2024");

        assert!(html.starts_with("<html>"));
        assert!(html.contains("<h2>Production Summary - 01-05-2024</h2>"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
