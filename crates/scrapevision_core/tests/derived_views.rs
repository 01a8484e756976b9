use pretty_assertions::assert_eq;
use scrapevision_core::{
    compute_average_confidence, compute_star_histogram, filter, Criterion, FilterCriteria,
    ResultRecord, SentimentLabel, StarLabel,
};

fn record(url: &str, star: &str, sentiment: &str, score: Option<f64>) -> ResultRecord {
    ResultRecord::from_raw(url, star, sentiment, score, Some(format!("summary of {url}")))
}

fn sample() -> Vec<ResultRecord> {
    vec![
        record("http://a", "5 stars", "POSITIVE", Some(0.6)),
        record("http://b", "1 star", "negative", Some(0.9)),
        record("http://c", "5 stars", "Positive", Some(0.8)),
        record("http://d", "3 stars", "NEUTRAL", None),
        record("http://e", "unrated", "POSITIVE", Some(0.5)),
        record("http://f", "4 stars", "mixed", Some(0.7)),
    ]
}

#[test]
fn histogram_always_has_five_buckets() {
    let empty = compute_star_histogram(&[]);
    assert_eq!(empty.len(), 5);
    assert!(empty.iter().all(|bucket| bucket.count == 0));
    assert_eq!(
        empty.iter().map(|bucket| bucket.star).collect::<Vec<_>>(),
        vec![
            StarLabel::One,
            StarLabel::Two,
            StarLabel::Three,
            StarLabel::Four,
            StarLabel::Five
        ]
    );
}

#[test]
fn histogram_counts_recognized_labels_only() {
    let records = sample();
    let histogram = compute_star_histogram(&records);
    let counts: Vec<usize> = histogram.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, vec![1, 0, 1, 1, 2]);

    let recognized = records.iter().filter(|r| r.star().is_some()).count();
    assert_eq!(counts.iter().sum::<usize>(), recognized);
}

#[test]
fn aggregation_does_not_mutate_input() {
    let records = sample();
    let before = records.clone();
    let first = compute_average_confidence(&records);
    let second = compute_average_confidence(&records);
    assert_eq!(records, before);
    assert_eq!(first, second);
}

#[test]
fn average_confidence_for_two_five_star_records() {
    let records = vec![
        record("http://a", "5 stars", "POSITIVE", Some(0.6)),
        record("http://b", "5 stars", "POSITIVE", Some(0.8)),
    ];
    let buckets = compute_average_confidence(&records);
    let five = buckets[4];
    assert_eq!(five.star, StarLabel::Five);
    assert!((five.average_confidence - 0.7).abs() < 1e-9);
    assert_eq!(five.percent(), "70.0%");
}

#[test]
fn empty_buckets_average_exactly_zero() {
    let buckets = compute_average_confidence(&sample());
    assert_eq!(buckets[1].star, StarLabel::Two);
    assert_eq!(buckets[1].average_confidence, 0.0);
    // Missing score was normalized to zero on ingest.
    assert_eq!(buckets[2].average_confidence, 0.0);
    for bucket in buckets {
        assert!(!bucket.average_confidence.is_nan());
        assert!((0.0..=1.0).contains(&bucket.average_confidence));
    }
}

#[test]
fn filter_is_conjunction_and_keeps_order() {
    let records = sample();
    let criteria = FilterCriteria::new(
        Criterion::Only(StarLabel::Five),
        Criterion::Only(SentimentLabel::Positive),
    );
    let urls: Vec<&str> = filter(&records, &criteria)
        .into_iter()
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(urls, vec!["http://a", "http://c"]);
}

#[test]
fn identity_filter_keeps_everything_including_unrecognized() {
    let records = sample();
    let criteria = FilterCriteria::default();
    assert!(criteria.is_identity());
    assert_eq!(filter(&records, &criteria).len(), records.len());
}

#[test]
fn unrecognized_labels_never_match_specific_criteria() {
    let records = sample();
    let positive = FilterCriteria::new(Criterion::All, Criterion::Only(SentimentLabel::Positive));
    let urls: Vec<&str> = filter(&records, &positive)
        .into_iter()
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(urls, vec!["http://a", "http://c", "http://e"]);
}

#[test]
fn empty_filter_result_is_valid() {
    let records = sample();
    let criteria = FilterCriteria::new(Criterion::Only(StarLabel::Two), Criterion::All);
    assert!(filter(&records, &criteria).is_empty());
}

#[test]
fn filtering_is_idempotent() {
    let records = sample();
    let all_criteria = [
        FilterCriteria::default(),
        FilterCriteria::new(Criterion::Only(StarLabel::Five), Criterion::All),
        FilterCriteria::new(Criterion::All, Criterion::Only(SentimentLabel::Negative)),
        FilterCriteria::new(
            Criterion::Only(StarLabel::Three),
            Criterion::Only(SentimentLabel::Neutral),
        ),
    ];
    for criteria in all_criteria {
        let once: Vec<ResultRecord> = filter(&records, &criteria).into_iter().cloned().collect();
        let twice: Vec<ResultRecord> = filter(&once, &criteria).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }
}

#[test]
fn criteria_parse_from_shell_input() {
    assert_eq!(Criterion::<StarLabel>::parse("ALL"), Some(Criterion::All));
    assert_eq!(
        Criterion::<StarLabel>::parse("4 stars"),
        Some(Criterion::Only(StarLabel::Four))
    );
    assert_eq!(
        Criterion::<SentimentLabel>::parse("neutral"),
        Some(Criterion::Only(SentimentLabel::Neutral))
    );
    assert_eq!(Criterion::<SentimentLabel>::parse("angry"), None);
    assert_eq!(Criterion::Only(StarLabel::One).to_string(), "1 star");
}
