//! Calendar Module
//! Month metadata with a fixed calendar ordering.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Month of the year. Declaration order is calendar order, so the derived
/// `Ord` sorts January..December regardless of the month names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CalendarMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl CalendarMonth {
    /// All months in calendar order.
    pub const ALL: [CalendarMonth; 12] = [
        CalendarMonth::January,
        CalendarMonth::February,
        CalendarMonth::March,
        CalendarMonth::April,
        CalendarMonth::May,
        CalendarMonth::June,
        CalendarMonth::July,
        CalendarMonth::August,
        CalendarMonth::September,
        CalendarMonth::October,
        CalendarMonth::November,
        CalendarMonth::December,
    ];

    /// Month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self::ALL[date.month0() as usize]
    }

    /// 0-based position in the calendar.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CalendarMonth::January => "January",
            CalendarMonth::February => "February",
            CalendarMonth::March => "March",
            CalendarMonth::April => "April",
            CalendarMonth::May => "May",
            CalendarMonth::June => "June",
            CalendarMonth::July => "July",
            CalendarMonth::August => "August",
            CalendarMonth::September => "September",
            CalendarMonth::October => "October",
            CalendarMonth::November => "November",
            CalendarMonth::December => "December",
        }
    }

    /// Three-letter abbreviation ("Jan".."Dec").
    pub fn abbrev(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
