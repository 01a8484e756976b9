use std::fmt;

use crate::record::{Label, LabelValue, ResultRecord, SentimentLabel, StarLabel};

/// One side of a filter: everything, or exactly one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion<L> {
    #[default]
    All,
    Only(L),
}

impl<L: Label> Criterion<L> {
    /// Parse `"all"` or a label spelling (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Some(Criterion::All);
        }
        L::parse(raw).map(Criterion::Only)
    }

    /// Unrecognized labels only pass the `All` criterion.
    pub fn accepts(&self, value: &LabelValue<L>) -> bool {
        match self {
            Criterion::All => true,
            Criterion::Only(wanted) => value.known() == Some(*wanted),
        }
    }
}

impl<L: Label> fmt::Display for Criterion<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::All => f.write_str("all"),
            Criterion::Only(label) => f.write_str(label.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub star: Criterion<StarLabel>,
    pub sentiment: Criterion<SentimentLabel>,
}

impl FilterCriteria {
    pub fn new(star: Criterion<StarLabel>, sentiment: Criterion<SentimentLabel>) -> Self {
        Self { star, sentiment }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.star, Criterion::All) && matches!(self.sentiment, Criterion::All)
    }

    pub fn matches(&self, record: &ResultRecord) -> bool {
        self.star.accepts(&record.star_label) && self.sentiment.accepts(&record.sentiment_label)
    }
}

/// Records matching both criteria, in their original order.
pub fn filter<'a>(records: &'a [ResultRecord], criteria: &FilterCriteria) -> Vec<&'a ResultRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .collect()
}
