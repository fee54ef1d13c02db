//! Monthly calendar view model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An event title annotated on a day of the reference month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub day: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    /// Monday-first rows of dates; leading and trailing days may belong to adjacent months
    pub weeks: Vec<Vec<NaiveDate>>,
    pub user_events_by_date: Vec<DayEntry>,
}

impl MonthView {
    /// Titles annotated on `day` of the reference month
    pub fn titles_on(&self, day: u32) -> Vec<&str> {
        self.user_events_by_date
            .iter()
            .filter(|entry| entry.day == day)
            .map(|entry| entry.title.as_str())
            .collect()
    }
}
