//! Property tests for cleaning and grouping over generated daily series.

use chrono::{Datelike, Duration, NaiveDate};
use pageview_charts::charts::ChartPlotter;
use pageview_charts::data::{CalendarMonth, DataProcessor, Record, Series};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Dates advancing by the given gaps from 2015-01-01, zipped with values.
fn build_series(gaps: &[i64], values: &[f64]) -> Series {
    let mut date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let records: Vec<Record> = gaps
        .iter()
        .zip(values)
        .map(|(gap, value)| {
            date += Duration::days(*gap);
            Record::new(date, *value)
        })
        .collect();
    Series::from_records(records)
}

fn series_strategy() -> impl Strategy<Value = Series> {
    (1usize..300)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(1i64..20, n),
                prop::collection::vec(0.0f64..50_000.0, n),
            )
        })
        .prop_map(|(gaps, values)| build_series(&gaps, &values))
}

/// Series whose values are pairwise distinct, in random order.
fn distinct_series_strategy() -> impl Strategy<Value = Series> {
    prop::collection::btree_set(0u32..1_000_000, 2..300)
        .prop_map(|set| set.into_iter().map(f64::from).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_flat_map(|values| {
            let n = values.len();
            (prop::collection::vec(1i64..20, n), Just(values))
        })
        .prop_map(|(gaps, values)| build_series(&gaps, &values))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cleaned_is_subset_within_bounds(series in series_strategy()) {
        let cleaned = DataProcessor::clean_default(&series);
        let bounds = cleaned.bounds().unwrap();

        prop_assert_eq!(cleaned.len() + cleaned.removed_count(), series.len());
        for record in cleaned.records() {
            prop_assert!(series.records().contains(record));
            prop_assert!(bounds.contains(record.value));
        }
        for record in series.records() {
            if bounds.contains(record.value) {
                prop_assert!(cleaned.records().contains(record));
            }
        }
    }

    #[test]
    fn distinct_spread_excludes_some_but_not_all(series in distinct_series_strategy()) {
        let cleaned = DataProcessor::clean_default(&series);
        prop_assert!(cleaned.removed_count() >= 1);
        prop_assert!(cleaned.len() >= 1);
    }

    #[test]
    fn bar_legend_always_in_calendar_order(series in series_strategy()) {
        let chart = ChartPlotter::bar_chart(&DataProcessor::clean_default(&series));
        let legend: Vec<&str> = chart.legend.iter().map(|e| e.label.as_str()).collect();
        let expected: Vec<&str> = CalendarMonth::ALL.iter().map(|m| m.name()).collect();
        prop_assert_eq!(legend, expected);
        for group in &chart.groups {
            prop_assert_eq!(group.heights.len(), 12);
        }
    }

    #[test]
    fn group_counts_follow_the_data(series in series_strategy()) {
        let cleaned = DataProcessor::clean_default(&series);
        let distinct_years: BTreeSet<i32> =
            cleaned.records().iter().map(|r| r.date.year()).collect();

        let years = DataProcessor::year_groups(&cleaned);
        prop_assert_eq!(years.len(), distinct_years.len());
        prop_assert!(years.windows(2).all(|w| w[0].label < w[1].label));

        let months = DataProcessor::month_groups(&cleaned);
        prop_assert_eq!(months.len(), 12);
        let pooled: usize = months.iter().map(|g| g.values.len()).sum();
        prop_assert_eq!(pooled, cleaned.len());
    }
}
