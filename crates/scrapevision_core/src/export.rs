//! CSV rendering of a result snapshot.

use crate::record::ResultRecord;

pub const CSV_HEADER: &str = "URL,Star Rating,Sentiment Label,Confidence,Summary";
pub const EXPORT_FILENAME: &str = "results.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Serialize records as CSV, one row per record in input order.
///
/// Text columns are always quoted with embedded quotes doubled, so commas,
/// quotes and line breaks inside a summary survive a parse. Confidence is
/// written bare with three decimals. Every row ends with `\n`.
pub fn to_csv(records: &[ResultRecord]) -> String {
    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 96);
    csv.push_str(CSV_HEADER);
    csv.push('\n');
    for record in records {
        let row = [
            quote(&record.url),
            quote(record.star_label.as_str()),
            quote(record.sentiment_label.as_str()),
            record.confidence_display(),
            quote(&record.summary),
        ]
        .join(",");
        csv.push_str(&row);
        csv.push('\n');
    }
    csv
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
