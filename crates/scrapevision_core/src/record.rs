use std::fmt;

/// A closed label set the remote service classifies pages into.
pub trait Label: Copy + Eq + fmt::Debug + 'static {
    /// Every member, in display order.
    const ALL: &'static [Self];

    /// Canonical wire/display spelling.
    fn as_str(self) -> &'static str;

    /// Case-insensitive, whitespace-tolerant lookup of the canonical spelling.
    fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(trimmed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StarLabel {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl StarLabel {
    pub const fn stars(self) -> u8 {
        match self {
            StarLabel::One => 1,
            StarLabel::Two => 2,
            StarLabel::Three => 3,
            StarLabel::Four => 4,
            StarLabel::Five => 5,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self.stars() as usize - 1
    }
}

impl Label for StarLabel {
    const ALL: &'static [Self] = &[
        StarLabel::One,
        StarLabel::Two,
        StarLabel::Three,
        StarLabel::Four,
        StarLabel::Five,
    ];

    fn as_str(self) -> &'static str {
        match self {
            StarLabel::One => "1 star",
            StarLabel::Two => "2 stars",
            StarLabel::Three => "3 stars",
            StarLabel::Four => "4 stars",
            StarLabel::Five => "5 stars",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl Label for SentimentLabel {
    const ALL: &'static [Self] = &[
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
    ];

    fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }
}

/// A label as received: either a member of the closed set or the raw text
/// the service sent instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LabelValue<L> {
    Known(L),
    Unrecognized(String),
}

impl<L: Label> LabelValue<L> {
    pub fn from_raw(raw: &str) -> Self {
        match L::parse(raw) {
            Some(label) => LabelValue::Known(label),
            None => LabelValue::Unrecognized(raw.to_string()),
        }
    }

    pub fn known(&self) -> Option<L> {
        match self {
            LabelValue::Known(label) => Some(*label),
            LabelValue::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LabelValue::Known(label) => label.as_str(),
            LabelValue::Unrecognized(raw) => raw,
        }
    }
}

impl<L: Label> From<L> for LabelValue<L> {
    fn from(label: L) -> Self {
        LabelValue::Known(label)
    }
}

impl<L: Label> fmt::Display for LabelValue<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored page returned by an analysis job.
///
/// Records are built once on ingest and never patched; a new poll response
/// replaces the whole list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub url: String,
    pub star_label: LabelValue<StarLabel>,
    pub sentiment_label: LabelValue<SentimentLabel>,
    pub sentiment_score: f64,
    pub summary: String,
}

impl ResultRecord {
    /// Normalize raw wire fields into a record.
    ///
    /// Labels are matched case-insensitively; a score that is absent, not
    /// finite, or outside `[0, 1]` becomes `0.0`.
    pub fn from_raw(
        url: impl Into<String>,
        star_label: &str,
        sentiment_label: &str,
        sentiment_score: Option<f64>,
        summary: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            star_label: LabelValue::from_raw(star_label),
            sentiment_label: LabelValue::from_raw(sentiment_label),
            sentiment_score: normalize_score(sentiment_score),
            summary: summary.unwrap_or_default(),
        }
    }

    pub fn star(&self) -> Option<StarLabel> {
        self.star_label.known()
    }

    pub fn sentiment(&self) -> Option<SentimentLabel> {
        self.sentiment_label.known()
    }

    /// Confidence as shown in the results table, e.g. `0.870`.
    pub fn confidence_display(&self) -> String {
        format!("{:.3}", self.sentiment_score)
    }

    /// Confidence as a percentage, e.g. `87.0%`.
    pub fn confidence_percent(&self) -> String {
        format_percent(self.sentiment_score)
    }
}

pub(crate) fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn normalize_score(score: Option<f64>) -> f64 {
    match score {
        Some(value) if value.is_finite() && (0.0..=1.0).contains(&value) => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(StarLabel::parse(" 4 STARS "), Some(StarLabel::Four));
        assert_eq!(StarLabel::parse("1 star"), Some(StarLabel::One));
        assert_eq!(StarLabel::parse("6 stars"), None);
        assert_eq!(SentimentLabel::parse("positive"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse("Neutral"), Some(SentimentLabel::Neutral));
    }

    #[test]
    fn ingest_normalizes_labels_and_scores() {
        let record = ResultRecord::from_raw("http://a", "2 Stars", "negative", Some(1.5), None);
        assert_eq!(record.star(), Some(StarLabel::Two));
        assert_eq!(record.sentiment_label.as_str(), "NEGATIVE");
        assert_eq!(record.sentiment_score, 0.0);
        assert_eq!(record.summary, "");

        let nan = ResultRecord::from_raw("http://b", "3 stars", "NEUTRAL", Some(f64::NAN), None);
        assert_eq!(nan.sentiment_score, 0.0);
    }

    #[test]
    fn unrecognized_labels_keep_raw_text() {
        let record = ResultRecord::from_raw("http://a", "ten stars", "meh", Some(0.4), None);
        assert_eq!(record.star(), None);
        assert_eq!(record.star_label.as_str(), "ten stars");
        assert_eq!(record.sentiment_label.as_str(), "meh");
    }

    #[test]
    fn confidence_formats() {
        let record = ResultRecord::from_raw("http://a", "4 stars", "POSITIVE", Some(0.87), None);
        assert_eq!(record.confidence_display(), "0.870");
        assert_eq!(record.confidence_percent(), "87.0%");
    }
}
