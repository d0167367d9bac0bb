//! Aggregation tests: grouping, sums, ordering, passthrough.

mod common;

use spend_analytics::{
    AggregatedRow, Aggregation, Aggregator, AnalyticsError, Dimension, MetricKey, Record,
    SpendMetric, SpendRow,
};
use std::collections::HashSet;

fn by_sector(metrics: &[MetricKey]) -> Aggregator {
    Aggregator::new(&[Dimension::Sector], metrics)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn single_record_grouped_by_sector() {
    let records = vec![common::scenario_record()];
    let rows = by_sector(&[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        serde_json::to_value(&rows[0]).unwrap(),
        serde_json::json!({
            "sector": "retail",
            "mySpend": {
                "current": 120000.0,
                "reference": 100000.0,
                "absoluteChange": 20000.0,
                "percentChange": 20.0
            }
        })
    );
}

#[test]
fn empty_grouping_returns_input_unchanged() {
    let records = common::sample_records();
    let aggregation = Aggregator::new(&[], &MetricKey::ALL).aggregate(&records);

    assert!(aggregation.is_passthrough());
    match aggregation {
        Aggregation::Passthrough(rows) => assert!(std::ptr::eq(rows, records.as_slice())),
        Aggregation::Grouped(_) => panic!("expected passthrough"),
    }
}

#[test]
fn two_records_in_one_sector_sum() {
    let mut a = common::scenario_record();
    let mut b = common::scenario_record();
    a.my_spend = Some(SpendMetric::new(100.0, 0.0, 0.0, 0.0));
    b.my_spend = Some(SpendMetric::new(50.0, 0.0, 0.0, 0.0));
    let records = vec![a, b];

    let rows = by_sector(&[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].metric(MetricKey::MySpend).unwrap().current, 150.0);
}

// ---------------------------------------------------------------------------
// Sums
// ---------------------------------------------------------------------------

#[test]
fn every_sub_field_is_summed() {
    let records = common::sample_records();
    let aggregation = by_sector(&[MetricKey::MySpend, MetricKey::LostStoreSpend]).aggregate(&records);
    let rows = aggregation.grouped().unwrap();

    let retail = &rows[0];
    assert_eq!(retail.dimension(Dimension::Sector), Some("retail"));
    assert_eq!(
        retail.metric(MetricKey::MySpend),
        Some(&SpendMetric::new(575.0, 540.0, 35.0, 75.0))
    );
    assert_eq!(
        retail.metric(MetricKey::LostStoreSpend),
        Some(&SpendMetric::new(60_000.0, 80_000.0, -20_000.0, -100.0))
    );

    let hospitality = &rows[1];
    assert_eq!(
        hospitality.metric(MetricKey::MySpend),
        Some(&SpendMetric::new(200.0, 250.0, -50.0, -20.0))
    );
}

#[test]
fn sum_matches_members_for_every_group() {
    let records = common::sample_records();
    let group_by = [Dimension::Country, Dimension::City];
    let rows = Aggregator::new(&group_by, &[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();

    for row in &rows {
        let members: Vec<&Record> = records
            .iter()
            .filter(|r| {
                group_by.iter().all(|&d| {
                    r.dimension(d).unwrap().to_lowercase() == row.dimension(d).unwrap()
                })
            })
            .collect();
        assert!(!members.is_empty());

        let expected = members.iter().fold(SpendMetric::default(), |mut acc, r| {
            acc.accumulate(r.my_spend.as_ref().unwrap());
            acc
        });
        assert_eq!(row.metric(MetricKey::MySpend), Some(&expected));
    }
}

#[test]
fn percent_change_is_summed_not_recomputed() {
    let mut a = common::scenario_record();
    let mut b = common::scenario_record();
    a.my_spend = Some(SpendMetric::new(110.0, 100.0, 10.0, 10.0));
    b.my_spend = Some(SpendMetric::new(300.0, 200.0, 100.0, 50.0));
    let records = vec![a, b];

    let rows = by_sector(&[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();
    // 110/300 of 410/300 would be 36.67%; the naive sum is 60.
    assert_eq!(rows[0].metric(MetricKey::MySpend).unwrap().percent_change, 60.0);
}

#[test]
fn missing_metric_is_skipped_per_row() {
    let records = common::sample_records();
    let rows = by_sector(&[MetricKey::MySpend, MetricKey::SameStoreSpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();

    assert_eq!(rows[0].metric(MetricKey::MySpend).unwrap().current, 575.0);
    assert_eq!(
        rows[0].metric(MetricKey::SameStoreSpend),
        Some(&SpendMetric::default())
    );
}

#[test]
fn unselected_metrics_are_not_carried() {
    let records = common::sample_records();
    let rows = by_sector(&[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();
    assert!(rows[0].metric(MetricKey::LostStoreSpend).is_none());
    assert_eq!(rows[0].metrics().len(), 1);
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn groups_are_case_normalized() {
    let records = common::sample_records();
    let rows = Aggregator::new(&[Dimension::City, Dimension::Sector], &[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();

    // "Mumbai/Retail" and "mumbai/RETAIL" share a group
    let mumbai = rows
        .iter()
        .find(|r| r.dimension(Dimension::City) == Some("mumbai"))
        .unwrap();
    assert_eq!(mumbai.dimension(Dimension::Sector), Some("retail"));
    assert_eq!(mumbai.metric(MetricKey::MySpend).unwrap().current, 175.0);
    assert_eq!(rows.len(), 4);
}

#[test]
fn groups_keep_first_seen_order() {
    let records = common::sample_records();
    let rows = Aggregator::new(&[Dimension::City], &[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();

    let labels: Vec<String> = rows.iter().map(AggregatedRow::label).collect();
    assert_eq!(
        labels,
        vec!["mumbai", "bengaluru", "san francisco", "new york city"]
    );
}

#[test]
fn dimension_columns_follow_grouping_order() {
    let records = common::sample_records();
    let rows = Aggregator::new(&[Dimension::Sector, Dimension::Country], &[])
        .aggregate(&records)
        .into_grouped()
        .unwrap();

    let dims: Vec<Dimension> = rows[0].dimensions().iter().map(|(d, _)| *d).collect();
    assert_eq!(dims, vec![Dimension::Sector, Dimension::Country]);
    assert_eq!(rows[0].label(), "retail | india");
}

#[test]
fn grouping_preserves_distinct_combinations() {
    let records = common::sample_records();
    let group_by = [Dimension::Country, Dimension::Sector, Dimension::Category];
    let rows = Aggregator::new(&group_by, &[MetricKey::MySpend])
        .aggregate(&records)
        .into_grouped()
        .unwrap();

    let expected: HashSet<Vec<String>> = records
        .iter()
        .map(|r| {
            group_by
                .iter()
                .map(|&d| r.dimension(d).unwrap().to_lowercase())
                .collect()
        })
        .collect();
    let actual: HashSet<Vec<String>> = rows
        .iter()
        .map(|row| row.dimensions().iter().map(|(_, v)| v.clone()).collect())
        .collect();

    assert_eq!(rows.len(), expected.len());
    assert_eq!(actual, expected);
}

#[test]
fn grouping_result_is_order_independent() {
    let records = common::sample_records();
    let mut reversed = records.clone();
    reversed.reverse();

    let aggregator = Aggregator::new(&[Dimension::Sector], &[MetricKey::MySpend]);
    let mut forward = aggregator.aggregate(&records).into_grouped().unwrap();
    let mut backward = aggregator.aggregate(&reversed).into_grouped().unwrap();
    forward.sort_by_key(AggregatedRow::label);
    backward.sort_by_key(AggregatedRow::label);
    assert_eq!(forward, backward);
}

#[test]
fn aggregating_an_aggregated_row_is_idempotent() {
    let records = vec![common::scenario_record()];
    let aggregator = Aggregator::new(
        &[Dimension::Sector, Dimension::Category],
        &[MetricKey::MySpend, MetricKey::LostStoreSpend],
    );
    let once = aggregator.aggregate(&records).into_grouped().unwrap();
    let twice = aggregator.aggregate(&once).into_grouped().unwrap();

    assert_eq!(once.len(), 1);
    assert_eq!(twice, once);
}

#[test]
fn empty_input_produces_no_groups() {
    let records: Vec<Record> = Vec::new();
    let aggregation = by_sector(&[MetricKey::MySpend]).aggregate(&records);
    assert!(!aggregation.is_passthrough());
    assert!(aggregation.is_empty());
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn duplicate_selections_are_dropped() {
    let aggregator = Aggregator::new(
        &[Dimension::Sector, Dimension::Sector],
        &[MetricKey::MySpend, MetricKey::MySpend],
    );
    assert_eq!(aggregator.group_by(), &[Dimension::Sector]);
    assert_eq!(aggregator.metrics(), &[MetricKey::MySpend]);

    let mut records = vec![common::scenario_record()];
    records[0].my_spend = Some(SpendMetric::new(10.0, 0.0, 0.0, 0.0));
    let rows = aggregator.aggregate(&records).into_grouped().unwrap();
    assert_eq!(rows[0].metric(MetricKey::MySpend).unwrap().current, 10.0);
}

#[test]
fn from_names_skips_unknown_metrics() {
    let aggregator =
        Aggregator::from_names(&["Sector", "city"], &["My Spend", "Bogus Spend", "lostStoreSpend"])
            .unwrap();
    assert_eq!(aggregator.group_by(), &[Dimension::Sector, Dimension::City]);
    assert_eq!(
        aggregator.metrics(),
        &[MetricKey::MySpend, MetricKey::LostStoreSpend]
    );
}

#[test]
fn from_names_rejects_unknown_attribute() {
    let err = Aggregator::from_names(&["Planet"], &["My Spend"]).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidArgument(_)));
}
