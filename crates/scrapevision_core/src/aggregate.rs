//! Per-star-rating chart data derived from a result snapshot.
//!
//! Both views always produce one bucket per star label, in ascending order,
//! so charts render empty categories instead of omitting them. Records whose
//! star label is not recognized contribute to no bucket.

use crate::record::{format_percent, ResultRecord, StarLabel};

const STARS: [StarLabel; 5] = [
    StarLabel::One,
    StarLabel::Two,
    StarLabel::Three,
    StarLabel::Four,
    StarLabel::Five,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarCount {
    pub star: StarLabel,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarConfidence {
    pub star: StarLabel,
    /// Mean sentiment score in `[0, 1]`; exactly `0.0` when no record has this label.
    pub average_confidence: f64,
}

impl StarConfidence {
    pub fn percent(&self) -> String {
        format_percent(self.average_confidence)
    }
}

pub fn compute_star_histogram(records: &[ResultRecord]) -> [StarCount; 5] {
    let mut counts = [0usize; 5];
    for star in records.iter().filter_map(ResultRecord::star) {
        counts[star.index()] += 1;
    }
    STARS.map(|star| StarCount {
        star,
        count: counts[star.index()],
    })
}

pub fn compute_average_confidence(records: &[ResultRecord]) -> [StarConfidence; 5] {
    let mut totals = [(0.0f64, 0usize); 5];
    for record in records {
        if let Some(star) = record.star() {
            let slot = &mut totals[star.index()];
            slot.0 += record.sentiment_score;
            slot.1 += 1;
        }
    }
    STARS.map(|star| {
        let (total, count) = totals[star.index()];
        let average_confidence = if count > 0 {
            total / count as f64
        } else {
            0.0
        };
        StarConfidence {
            star,
            average_confidence,
        }
    })
}

