//! Plain-text rendering of a job snapshot for the terminal.

use scrapevision_core::{
    ActiveView, FilterCriteria, JobSnapshot, JobState, Label, ResultRecord, StarConfidence,
    StarCount,
};

const BAR_WIDTH: usize = 40;
const SUMMARY_WIDTH: usize = 60;
pub const NO_MATCHES: &str = "No results match the filters.";

pub fn render_view(view: ActiveView, snapshot: &JobSnapshot, criteria: &FilterCriteria) -> String {
    let body = match view {
        ActiveView::Table => render_table(&snapshot.filtered(criteria)),
        ActiveView::StarHistogram => render_histogram(&snapshot.histogram()),
        ActiveView::ConfidenceChart => render_confidence(&snapshot.average_confidence()),
    };
    format!("{}\n{}\n{}", view.title(), "=".repeat(view.title().len()), body)
}

/// One status line per snapshot change while a job runs.
pub fn progress_line(snapshot: &JobSnapshot) -> String {
    let job = snapshot.job_id.as_deref().unwrap_or("-");
    match snapshot.state {
        JobState::Polling => format!(
            "{} job {} | check {} | {} results so far",
            snapshot.state,
            job,
            snapshot.poll_attempts,
            snapshot.results.len()
        ),
        JobState::Failed => format!(
            "{} job {}: {}",
            snapshot.state,
            job,
            snapshot.last_error.as_deref().unwrap_or("unknown error")
        ),
        _ => format!("{} job {} | {} results", snapshot.state, job, snapshot.results.len()),
    }
}

pub fn render_table(rows: &[&ResultRecord]) -> String {
    if rows.is_empty() {
        return NO_MATCHES.to_string();
    }

    let header = ["URL", "Star Rating", "Sentiment", "Confidence", "Summary"];
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|record| {
            [
                record.url.clone(),
                record.star_label.as_str().to_string(),
                record.sentiment_label.as_str().to_string(),
                record.confidence_percent(),
                truncate(&record.summary, SUMMARY_WIDTH),
            ]
        })
        .collect();

    let mut widths = header.map(|title| title.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

pub fn render_histogram(buckets: &[StarCount; 5]) -> String {
    let max = buckets.iter().map(|bucket| bucket.count).max().unwrap_or(0);
    let mut out = String::new();
    for bucket in buckets {
        let bar = if max == 0 {
            0
        } else {
            bucket.count * BAR_WIDTH / max
        };
        out.push_str(&format!(
            "{:<8} | {:<width$} {}\n",
            bucket.star.as_str(),
            "#".repeat(bar),
            bucket.count,
            width = BAR_WIDTH
        ));
    }
    out
}

pub fn render_confidence(buckets: &[StarConfidence; 5]) -> String {
    let mut out = String::new();
    for bucket in buckets {
        let bar = (bucket.average_confidence.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "{:<8} | {:<width$} {}\n",
            bucket.star.as_str(),
            "#".repeat(bar),
            bucket.percent(),
            width = BAR_WIDTH
        ));
    }
    out
}

fn push_row(out: &mut String, row: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let kept: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
