//! Time Series Module
//! Date-indexed records and the cleaned dataset shared by the renderers.

use crate::data::CalendarMonth;
use crate::stats::QuantileBounds;
use chrono::{Datelike, NaiveDate};

/// One day of page views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub value: f64,
}

impl Record {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> CalendarMonth {
        CalendarMonth::of(self.date)
    }
}

/// Records ordered by date ascending, with unique dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    records: Vec<Record>,
}

impl Series {
    /// Build a series from records in any order. When a date appears more
    /// than once, the first occurrence wins.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut records: Vec<Record> = records.into_iter().collect();
        // stable: equal dates keep their input order
        records.sort_by_key(|r| r.date);
        records.dedup_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Distinct calendar years, chronological.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(Record::year).collect();
        years.dedup();
        years
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The series after outlier removal. Read-only once built; every renderer
/// borrows the same instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSeries {
    series: Series,
    bounds: Option<QuantileBounds>,
    removed: usize,
}

impl CleanedSeries {
    pub(crate) fn new(series: Series, bounds: Option<QuantileBounds>, removed: usize) -> Self {
        Self {
            series,
            bounds,
            removed,
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn records(&self) -> &[Record] {
        self.series.records()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Bounds computed on the original series; `None` if it was empty.
    pub fn bounds(&self) -> Option<QuantileBounds> {
        self.bounds
    }

    /// Number of records dropped as outliers.
    pub fn removed_count(&self) -> usize {
        self.removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn records_are_sorted_and_deduplicated() {
        let series = Series::from_records([
            Record::new(day(2017, 1, 2), 20.0),
            Record::new(day(2016, 12, 31), 10.0),
            Record::new(day(2017, 1, 2), 99.0),
            Record::new(day(2017, 1, 1), 15.0),
        ]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![10.0, 15.0, 20.0]);
        assert_eq!(series.first_date(), Some(day(2016, 12, 31)));
        assert_eq!(series.last_date(), Some(day(2017, 1, 2)));
        assert_eq!(series.years(), vec![2016, 2017]);
    }

    #[test]
    fn empty_series() {
        let series = Series::default();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
        assert!(series.years().is_empty());
    }
}
