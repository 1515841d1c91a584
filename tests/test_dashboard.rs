//! End-to-end dashboard tests over the sample CSV.

mod common;

use chrono::NaiveDate;
use supermarket_insights::{
    City, CustomerType, FilterCriteria, Gender, InsightsError, RankMetric, RuleSet, Segment,
};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn universal_criteria_returns_full_dataset() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let criteria = insights.universal_criteria();
    assert_eq!(criteria.date_range.start, date(1, 5));
    assert_eq!(criteria.date_range.end, date(3, 25));

    let query = insights.query(criteria);
    assert_eq!(query.filtered(), insights.dataset().transactions());
}

#[test]
fn city_and_membership_filter() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let criteria = insights
        .universal_criteria()
        .with_cities([City::Yangon])
        .with_customer_types([CustomerType::Member]);

    let query = insights.query(criteria);
    assert_eq!(
        common::ids(query.filtered()),
        vec!["750-67-8428", "123-19-1176", "355-53-5943", "665-32-9167"]
    );
}

#[test]
fn date_range_filter() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let criteria = insights.universal_criteria().with_date_range(date(2, 1), date(2, 28));

    let query = insights.query(criteria);
    assert_eq!(
        common::ids(query.filtered()),
        vec!["373-73-7910", "355-53-5943", "315-22-5665", "692-92-5582"]
    );
}

#[test]
fn unsatisfiable_criteria_give_no_data() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);

    let inverted = insights.universal_criteria().with_date_range(date(3, 1), date(1, 1));
    let query = insights.query(inverted);
    assert!(query.filtered().is_empty());
    assert!(query.metrics().is_empty());
    assert_eq!(query.metrics().display_average_rating(), "no data");
    assert!(query.ranking(RankMetric::Total).is_empty());
    assert!(query.segment("High-risk").unwrap().rows.is_empty());

    let no_gender = insights.universal_criteria().with_genders(Vec::<Gender>::new());
    assert!(insights.query(no_gender).filtered().is_empty());
}

// ---------------------------------------------------------------------------
// Metrics and rankings
// ---------------------------------------------------------------------------

#[test]
fn headline_metrics() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let metrics = insights.query(insights.universal_criteria()).metrics();

    assert_eq!(metrics.transactions, 10);
    assert!(common::approx(metrics.total_sales.unwrap(), 4175.724));
    assert!(common::approx(metrics.gross_income.unwrap(), 198.844));
    assert!(common::approx(metrics.average_rating.unwrap(), 6.54));
    assert_eq!(metrics.display_total_sales(), "$4176");
    assert_eq!(metrics.display_gross_income(), "$199");
    assert_eq!(metrics.display_average_rating(), "6.54");
}

#[test]
fn rankings_by_each_metric() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let query = insights.query(insights.universal_criteria());

    let names = |metric| -> Vec<String> {
        query
            .ranking(metric)
            .entries
            .into_iter()
            .map(|e| e.product_line)
            .collect()
    };

    assert_eq!(
        names(RankMetric::Total),
        vec![
            "Electronic accessories",
            "Health and beauty",
            "Home and lifestyle",
            "Sports and travel",
            "Food and beverages"
        ]
    );
    assert_eq!(
        names(RankMetric::GrossIncome),
        vec![
            "Electronic accessories",
            "Health and beauty",
            "Home and lifestyle",
            "Sports and travel",
            "Food and beverages"
        ]
    );
    assert_eq!(
        names(RankMetric::Rating),
        vec![
            "Health and beauty",
            "Home and lifestyle",
            "Food and beverages",
            "Sports and travel",
            "Electronic accessories"
        ]
    );

    let sales = query.ranking(RankMetric::Total);
    assert!(common::approx(sales.best().unwrap().value, 1141.5285));
    assert_eq!(sales.worst_marker(), None);
    assert_eq!(query.rankings().len(), 3);
}

// ---------------------------------------------------------------------------
// Trend and word cloud
// ---------------------------------------------------------------------------

#[test]
fn monthly_trend_by_customer_type() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let trend = insights.query(insights.universal_criteria()).trend();

    assert_eq!(trend.months, vec![date(1, 1), date(2, 1), date(3, 1)]);
    let member = &trend.series[0];
    let normal = &trend.series[1];
    assert_eq!(member.customer_type, CustomerType::Member);
    assert_eq!(normal.customer_type, CustomerType::Normal);

    let expected_member = [1114.1655, 1378.818, 0.0];
    let expected_normal = [0.0, 634.3785, 1048.362];
    for i in 0..3 {
        assert!(common::approx(member.values[i], expected_member[i]));
        assert!(common::approx(normal.values[i], expected_normal[i]));
    }
}

#[test]
fn filtered_trend_differs_from_global() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let query = insights.query(insights.universal_criteria().with_cities([City::Mandalay]));

    let trend = query.trend();
    assert_eq!(trend.months, vec![date(2, 1)]);
    assert_eq!(query.trend_global().months.len(), 3);
}

#[test]
fn word_frequencies_cover_whole_dataset() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let query = insights.query(insights.universal_criteria().with_cities([City::Mandalay]));

    let words = query.word_frequencies();
    let health = words.iter().find(|w| w.word == "Health").unwrap();
    assert_eq!(health.count, 3);
    assert!(words.iter().all(|w| !w.word.eq_ignore_ascii_case("and")));
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

#[test]
fn median_segments_over_full_dataset() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let query = insights.query(insights.universal_criteria());

    // median(quantity) = 6.5, median(total) = 461.37
    let low = query.segment("Low-value customers").unwrap();
    assert_eq!(low.segment, Segment::LowValue);
    assert_eq!(common::ids(&low.rows), vec!["631-41-3108"]);

    let high = query.segment("High-value").unwrap();
    assert_eq!(common::ids(&high.rows), vec!["123-19-1176"]);

    let risk = query.segment("High-risk customers").unwrap();
    assert_eq!(common::ids(&risk.rows), vec!["699-14-3026"]);
    assert!(!risk.description.is_empty());
}

#[test]
fn quartile_segments_over_full_dataset() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Quartile);
    let query = insights.query(insights.universal_criteria());

    let all = query.segment("Total Customer").unwrap();
    assert_eq!(all.rows.len(), 10);
    assert_eq!(all.rows[0].invoice_id, "315-22-5665");
    assert!(all.rows.windows(2).all(|w| w[0].total >= w[1].total));

    let sensitive = query.segment("Sensitive Customer").unwrap();
    assert_eq!(common::ids(&sensitive.rows), vec!["315-22-5665"]);

    let risk = query.segment("Risk Customer").unwrap();
    assert_eq!(common::ids(&risk.rows), vec!["226-31-3081"]);
}

#[test]
fn segment_thresholds_follow_the_filter() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let query = insights.query(insights.universal_criteria().with_cities([City::Naypyitaw]));

    // Among 80.22, 627.6165 and 772.38 the median total is 627.6165, so the
    // 627.6165 sale is no longer above it.
    assert!(query.segment("High-risk").unwrap().rows.is_empty());
    assert_eq!(
        common::ids(&query.segment_global("High-risk").unwrap().rows),
        vec!["699-14-3026"]
    );
}

#[test]
fn unknown_segment_fails_fast() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let query = insights.query(insights.universal_criteria());

    assert!(matches!(
        query.segment("Risk Customer"),
        Err(InsightsError::UnknownSegmentName { .. })
    ));
    assert!(matches!(
        query.snapshot("Loyal"),
        Err(InsightsError::UnknownSegmentName { .. })
    ));
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[test]
fn snapshot_serializes_every_panel() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let criteria: FilterCriteria = insights.universal_criteria();
    let dashboard = insights.query(criteria).snapshot("High-risk").unwrap();

    assert_eq!(dashboard.rankings.len(), 3);
    assert_eq!(dashboard.segment.rows.len(), 1);

    let json = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(json["metrics"]["transactions"], 10);
    assert_eq!(json["segment"]["segment"], "high_risk");
    assert_eq!(json["segment"]["rule_set"], "median");
    assert_eq!(json["rankings"][2]["metric"], "rating");
    assert_eq!(json["trend"]["months"][0], "2019-01-01");
    assert_eq!(json["criteria"]["cities"][0], "Yangon");
}

#[test]
fn snapshot_trend_ignores_the_selection() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let query = insights.query(insights.universal_criteria().with_cities([City::Mandalay]));
    let dashboard = query.snapshot("High-risk").unwrap();

    assert_eq!(dashboard.metrics.transactions, 1);
    assert_eq!(query.trend().months, vec![date(2, 1)]);
    assert_eq!(dashboard.trend, query.trend_global());
    assert_eq!(dashboard.trend.months, vec![date(1, 1), date(2, 1), date(3, 1)]);
    assert!(common::approx(dashboard.trend.series[0].values[0], 1114.1655));
}

#[test]
fn dataset_is_shared_across_threads() {
    let (insights, _tmp) = common::sample_insights(RuleSet::Median);
    let dataset = insights.dataset().clone();
    let criteria = insights.universal_criteria().with_genders([Gender::Male]);

    let handle = std::thread::spawn(move || {
        let query = supermarket_insights::DashboardQuery::new(
            &dataset,
            criteria,
            supermarket_insights::Classifier::new(RuleSet::Median),
        );
        query.filtered().len()
    });
    assert_eq!(handle.join().unwrap(), 4);
}
