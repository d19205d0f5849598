use crate::summary::aggregate::{DaySummary, ProductAggregate};

pub const PRODUCT_WIDTH: usize = 33;
pub const NUMERIC_WIDTH: usize = 10;

const TEXT_TABLE_TITLE: &str = "Product-wise Performance:";
const HTML_TABLE_TITLE: &str = "Product-wise Performance";
const YIELD_PLACEHOLDER: &str = "n/a";

pub fn text_table(products: &[ProductAggregate]) -> String {
    let border = border_row();
    let mut lines = Vec::with_capacity(products.len() + 5);

    lines.push(TEXT_TABLE_TITLE.to_string());
    lines.push(border.clone());
    lines.push(table_row("Product", "Boxes", "RM Used", "Scrap", "Boxes/kg"));
    lines.push(border.clone());

    for group in products {
        lines.push(table_row(
            &truncate_product(&group.product),
            &group_thousands(group.total_boxes),
            &format_kg(group.total_rm_kg),
            &format_kg(group.total_scrap_kg),
            &format_yield(group.yield_boxes_per_kg),
        ));
    }

    lines.push(border);
    lines.join("\n")
}

pub fn html_table(products: &[ProductAggregate]) -> String {
    let rows = products
        .iter()
        .map(|group| {
            format!(
                "        <tr>\n            <td>{}</td>\n            <td align=\"right\">{}</td>\n            <td align=\"right\">{}</td>\n            <td align=\"right\">{}</td>\n            <td align=\"right\">{}</td>\n        </tr>",
                escape_html(&group.product),
                group_thousands(group.total_boxes),
                format_kg(group.total_rm_kg),
                format_kg(group.total_scrap_kg),
                format_yield(group.yield_boxes_per_kg),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<h3>{HTML_TABLE_TITLE}</h3>\n\
         <table border=\"1\" cellpadding=\"5\" cellspacing=\"0\" style=\"border-collapse: collapse;\">\n\
         \x20   <thead>\n\
         \x20       <tr>\n\
         \x20           <th>Product</th>\n\
         \x20           <th>Boxes</th>\n\
         \x20           <th>RM Used</th>\n\
         \x20           <th>Scrap</th>\n\
         \x20           <th>Boxes/kg</th>\n\
         \x20       </tr>\n\
         \x20   </thead>\n\
         \x20   <tbody>\n\
         {rows}\n\
         \x20   </tbody>\n\
         </table>"
    )
}

pub fn efficiency_note(summary: &DaySummary) -> String {
    match summary.average_yield {
        Some(average) => format!(
            "Efficiency Insight:\n\
             Average material yield is {average:.2} boxes per kg of raw material.\n\
             Higher Boxes/kg and lower scrap indicate good production efficiency."
        ),
        None => "Efficiency Insight:\n\
                 Average material yield is undefined because no raw material usage was recorded."
            .to_string(),
    }
}

pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

pub fn format_kg(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_kg_grouped(value: f64) -> String {
    let rounded = format!("{value:.2}");

    match rounded.split_once('.') {
        Some((integer, fraction)) => format!("{}.{fraction}", group_digits(integer)),
        None => group_digits(&rounded),
    }
}

pub fn format_yield(value: Option<f64>) -> String {
    value
        .map(|ratio| format!("{ratio:.2}"))
        .unwrap_or_else(|| YIELD_PLACEHOLDER.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

fn table_row(product: &str, boxes: &str, rm: &str, scrap: &str, yield_ratio: &str) -> String {
    format!(
        "|{product:<product_width$}|{boxes:>width$}|{rm:>width$}|{scrap:>width$}|{yield_ratio:>width$}|",
        product_width = PRODUCT_WIDTH,
        width = NUMERIC_WIDTH,
    )
}

fn border_row() -> String {
    let mut border = String::new();

    for width in [
        PRODUCT_WIDTH,
        NUMERIC_WIDTH,
        NUMERIC_WIDTH,
        NUMERIC_WIDTH,
        NUMERIC_WIDTH,
    ] {
        border.push('+');
        border.push_str(&"-".repeat(width));
    }

    border.push('+');
    border
}

fn truncate_product(name: &str) -> String {
    name.chars().take(PRODUCT_WIDTH).collect()
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn group(product: &str, boxes: u64, rm_kg: f64, scrap_kg: f64) -> ProductAggregate {
        ProductAggregate {
            product: product.to_string(),
            total_boxes: boxes,
            total_rm_kg: rm_kg,
            total_scrap_kg: scrap_kg,
            yield_boxes_per_kg: (rm_kg != 0.0).then(|| boxes as f64 / rm_kg),
        }
    }

    fn summary(average_yield: Option<f64>) -> DaySummary {
        DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            total_boxes: 150,
            total_rm_kg: 15.0,
            total_scrap_kg: 1.5,
            average_yield,
        }
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234), "1,234");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn grouped_kg_keeps_two_decimals() {
        assert_eq!(format_kg_grouped(15.0), "15.00");
        assert_eq!(format_kg_grouped(1234.567), "1,234.57");
    }

    #[test]
    fn table_lines_share_one_width() {
        let table = text_table(&[group("Alpha", 1200, 100.0, 2.5), group("Beta", 50, 5.0, 0.0)]);
        let expected = PRODUCT_WIDTH + 4 * NUMERIC_WIDTH + 6;

        for line in table.lines().skip(1) {
            assert_eq!(line.chars().count(), expected, "line: {line}");
        }
    }

    #[test]
    fn table_has_one_row_per_product() {
        let table = text_table(&[group("Alpha", 100, 10.0, 1.0), group("Beta", 50, 5.0, 0.5)]);

        // title + 3 borders + header + 2 data rows
        assert_eq!(table.lines().count(), 7);
    }

    #[test]
    fn long_product_names_are_truncated() {
        let name = "A very long product name that exceeds the column";
        let table = text_table(&[group(name, 10, 1.0, 0.0)]);
        let truncated = name.chars().take(PRODUCT_WIDTH).collect::<String>();

        assert!(table.contains(&truncated));
        assert!(!table.contains(name));
    }

    #[test]
    fn rows_keep_aggregator_order() {
        let products = [group("Beta", 50, 5.0, 0.5), group("Alpha", 100, 10.0, 1.0)];

        for table in [text_table(&products), html_table(&products)] {
            let beta_at = table.find("Beta").expect("Beta rendered");
            let alpha_at = table.find("Alpha").expect("Alpha rendered");
            assert!(beta_at < alpha_at);
        }
    }

    #[test]
    fn both_renderings_carry_the_same_values() {
        let products = [group("Alpha", 1200, 100.0, 2.5), group("Beta", 50, 5.0, 0.0)];

        let text = text_table(&products);
        let html = html_table(&products);

        for group in &products {
            for value in [
                group_thousands(group.total_boxes),
                format_kg(group.total_rm_kg),
                format_kg(group.total_scrap_kg),
                format_yield(group.yield_boxes_per_kg),
            ] {
                assert!(text.contains(&value), "text missing {value}");
                assert!(html.contains(&value), "html missing {value}");
            }
        }
    }

    #[test]
    fn undefined_yield_renders_as_placeholder_in_both() {
        let products = [group("Alpha", 100, 0.0, 0.0)];

        assert!(text_table(&products).contains("n/a"));
        assert!(html_table(&products).contains("n/a"));
    }

    #[test]
    fn html_products_are_escaped() {
        let html = html_table(&[group("Berries <500g>", 10, 1.0, 0.0)]);

        assert!(html.contains("Berries &lt;500g&gt;"));
        assert!(!html.contains("<500g>"));
    }

    #[test]
    fn efficiency_note_substitutes_two_decimals() {
        let note = efficiency_note(&summary(Some(10.0)));

        assert!(note.contains("10.00 boxes per kg"));
    }

    #[test]
    fn efficiency_note_handles_undefined_average() {
        let note = efficiency_note(&summary(None));

        assert!(note.contains("undefined"));
    }
}
