use chrono::{Datelike, NaiveDate};

use crate::domain::common::Dated;
use crate::domain::dates::EntryDate;

/// Calendar bucket used for amortization counting and time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Bucket for a user-entered date; `None` when the date never parsed.
    pub fn of(date: &EntryDate) -> Option<Self> {
        date.date().map(Self::from_date)
    }
}

/// Month/year selection where either bound may be unspecified, meaning "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl Period {
    /// No bounds: every record matches, including ones with malformed dates.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn month_of(year: i32, month: u32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }

    pub fn year_of(year: i32) -> Self {
        Self {
            month: None,
            year: Some(year),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }

    pub fn matches(&self, date: &EntryDate) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(parsed) = date.date() else {
            return false;
        };
        self.month.map_or(true, |month| parsed.month() == month)
            && self.year.map_or(true, |year| parsed.year() == year)
    }

    /// Selects the records falling in this period, preserving input order.
    pub fn filter<'a, T: Dated>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.matches(item.entry_date()))
            .collect()
    }
}

/// Inclusive date-range selection; records with malformed dates never match.
pub fn filter_by_date_range<'a, T: Dated>(
    items: &'a [T],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| {
            item.entry_date()
                .date()
                .map_or(false, |date| date >= start && date <= end)
        })
        .collect()
}
