//! Data Processor Module
//! Outlier removal and the per-renderer groupings of the cleaned series.

use crate::data::{CalendarMonth, CleanedSeries, Series};
use crate::stats::{StatsCalculator, ValueGroup};
use std::collections::BTreeMap;

/// Default lower quantile fraction kept by the cleaner.
pub const DEFAULT_LOWER_QUANTILE: f64 = 0.025;
/// Default upper quantile fraction kept by the cleaner.
pub const DEFAULT_UPPER_QUANTILE: f64 = 0.975;

/// Mean value per (year, month). Absent pairs have no entry, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyAverageTable {
    years: Vec<i32>,
    cells: BTreeMap<(i32, CalendarMonth), f64>,
}

impl MonthlyAverageTable {
    /// Years present in the data, chronological.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Month axis, always January..December.
    pub fn months(&self) -> [CalendarMonth; 12] {
        CalendarMonth::ALL
    }

    pub fn get(&self, year: i32, month: CalendarMonth) -> Option<f64> {
        self.cells.get(&(year, month)).copied()
    }

    /// One year's averages indexed by month.
    pub fn row(&self, year: i32) -> [Option<f64>; 12] {
        CalendarMonth::ALL.map(|month| self.get(year, month))
    }

    /// Number of (year, month) pairs with data.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Largest average in the table.
    pub fn max_value(&self) -> Option<f64> {
        self.cells.values().copied().reduce(f64::max)
    }
}

/// Handles data cleaning and grouping operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep records whose value lies within the `lower`..`upper` quantiles of
    /// the whole series, inclusive. Quantiles are computed once, before filtering.
    pub fn clean_outliers(series: &Series, lower: f64, upper: f64) -> CleanedSeries {
        let Some(bounds) = StatsCalculator::quantile_bounds(&series.values(), lower, upper) else {
            return CleanedSeries::new(Series::default(), None, 0);
        };

        let kept = Series::from_records(
            series
                .iter()
                .filter(|r| bounds.contains(r.value))
                .copied(),
        );
        let removed = series.len() - kept.len();

        CleanedSeries::new(kept, Some(bounds), removed)
    }

    /// Clean with the default 2.5% / 97.5% quantiles.
    pub fn clean_default(series: &Series) -> CleanedSeries {
        Self::clean_outliers(series, DEFAULT_LOWER_QUANTILE, DEFAULT_UPPER_QUANTILE)
    }

    /// Average value per (year, month).
    pub fn monthly_averages(data: &CleanedSeries) -> MonthlyAverageTable {
        let mut grouped: BTreeMap<(i32, CalendarMonth), Vec<f64>> = BTreeMap::new();
        for record in data.records() {
            grouped
                .entry((record.year(), record.month()))
                .or_default()
                .push(record.value);
        }

        let cells = grouped
            .into_iter()
            .filter_map(|(key, values)| StatsCalculator::mean(&values).map(|mean| (key, mean)))
            .collect();

        MonthlyAverageTable {
            years: data.series().years(),
            cells,
        }
    }

    /// Values grouped by calendar year, labelled with the 4-digit year.
    pub fn year_groups(data: &CleanedSeries) -> Vec<ValueGroup> {
        let mut grouped: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for record in data.records() {
            grouped.entry(record.year()).or_default().push(record.value);
        }

        grouped
            .into_iter()
            .map(|(year, values)| ValueGroup::new(format!("{year:04}"), values))
            .collect()
    }

    /// Values grouped by month of year across all years. Always twelve groups
    /// labelled "Jan".."Dec"; months without data are empty.
    pub fn month_groups(data: &CleanedSeries) -> Vec<ValueGroup> {
        let mut groups: Vec<ValueGroup> = CalendarMonth::ALL
            .iter()
            .map(|month| ValueGroup::new(month.abbrev(), Vec::new()))
            .collect();
        for record in data.records() {
            groups[record.month().index()].values.push(record.value);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, value: f64) -> Record {
        Record::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), value)
    }

    fn clean(records: Vec<Record>) -> CleanedSeries {
        DataProcessor::clean_outliers(&Series::from_records(records), 0.0, 1.0)
    }

    #[test]
    fn removes_values_outside_central_range() {
        let mut records: Vec<Record> = (1..=20)
            .map(|d| record(2016, 6, d, 1000.0 + d as f64 * 10.0))
            .collect();
        records.push(record(2016, 6, 21, 50_000.0));
        records.push(record(2016, 6, 22, 1.0));
        let series = Series::from_records(records);

        let cleaned = DataProcessor::clean_default(&series);
        let bounds = cleaned.bounds().unwrap();

        assert_eq!(cleaned.len(), 20);
        assert_eq!(cleaned.removed_count(), 2);
        assert!(cleaned.records().iter().all(|r| bounds.contains(r.value)));
        assert!(!cleaned.records().iter().any(|r| r.value == 50_000.0));
    }

    #[test]
    fn identical_values_are_all_kept() {
        let series = Series::from_records((1..=10).map(|d| record(2018, 3, d, 42.0)));
        let cleaned = DataProcessor::clean_default(&series);
        assert_eq!(cleaned.len(), 10);
        assert_eq!(cleaned.removed_count(), 0);
    }

    #[test]
    fn empty_series_cleans_to_empty() {
        let cleaned = DataProcessor::clean_default(&Series::default());
        assert!(cleaned.is_empty());
        assert!(cleaned.bounds().is_none());
    }

    #[test]
    fn monthly_average_of_january() {
        let data = clean(vec![
            record(2017, 1, 3, 100.0),
            record(2017, 1, 20, 200.0),
            record(2017, 2, 1, 50.0),
        ]);
        let table = DataProcessor::monthly_averages(&data);
        assert_relative_eq!(table.get(2017, CalendarMonth::January).unwrap(), 150.0);
        assert_relative_eq!(table.get(2017, CalendarMonth::February).unwrap(), 50.0);
        assert_eq!(table.get(2017, CalendarMonth::March), None);
        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.max_value().unwrap(), 150.0);
    }

    #[test]
    fn monthly_table_month_axis_is_calendar_ordered() {
        // December appears first in the data, April sorts first alphabetically
        let data = clean(vec![
            record(2016, 12, 1, 10.0),
            record(2017, 4, 1, 20.0),
            record(2017, 8, 1, 30.0),
        ]);
        let table = DataProcessor::monthly_averages(&data);
        assert_eq!(table.months(), CalendarMonth::ALL);
        assert_eq!(table.years(), &[2016, 2017]);

        let row = table.row(2017);
        assert_eq!(row[CalendarMonth::April.index()], Some(20.0));
        assert_eq!(row[CalendarMonth::August.index()], Some(30.0));
        assert_eq!(row.iter().filter(|v| v.is_some()).count(), 2);
    }

    #[test]
    fn year_and_month_groups() {
        let data = clean(vec![
            record(2016, 5, 9, 1.0),
            record(2017, 5, 9, 2.0),
            record(2017, 11, 9, 3.0),
            record(2019, 1, 1, 4.0),
        ]);

        let years = DataProcessor::year_groups(&data);
        let labels: Vec<&str> = years.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["2016", "2017", "2019"]);
        assert_eq!(years[1].values, vec![2.0, 3.0]);

        let months = DataProcessor::month_groups(&data);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].label, "Jan");
        assert_eq!(months[4].values, vec![1.0, 2.0]);
        assert!(months[1].values.is_empty());
        assert_eq!(months[11].label, "Dec");
    }
}
