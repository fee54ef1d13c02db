//! Monthly calendar aggregation
//!
//! Builds the Monday-first month grid shown on the "my events" page and
//! annotates it with the titles of the user's events in that month.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::models::calendar::{DayEntry, MonthView};
use crate::models::registration::{RegisteredEvent, RegistrationStatus};
use crate::utils::helpers::month_name;

const DAYS_PER_WEEK: usize = 7;

/// Last day of the month starting at `first`
fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Every date from the Monday on or before the 1st to the Sunday on or after
/// the last day of the month
pub fn month_dates(first: NaiveDate) -> Vec<NaiveDate> {
    let last = last_day_of_month(first);
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));
    let end = last + Duration::days(6 - i64::from(last.weekday().num_days_from_monday()));

    start.iter_days().take_while(|date| *date <= end).collect()
}

/// Build the month view for the month containing `reference`
pub fn build_month_view(
    registrations: &[RegisteredEvent],
    reference: NaiveDate,
    exclude_canceled: bool,
) -> MonthView {
    let year = reference.year();
    let month = reference.month();
    let first = reference - Duration::days(i64::from(reference.day0()));

    let weeks = month_dates(first)
        .chunks(DAYS_PER_WEEK)
        .map(|week| week.to_vec())
        .collect();

    let user_events_by_date = registrations
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month)
        .filter(|r| !(exclude_canceled && r.status == RegistrationStatus::Canceled))
        .map(|r| DayEntry {
            day: r.date.day(),
            title: r.title.clone(),
        })
        .collect();

    MonthView {
        year,
        month,
        month_name: month_name(month).to_string(),
        weeks,
        user_events_by_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use proptest::prelude::*;

    fn registered(id: i64, date: NaiveDate, title: &str, status: RegistrationStatus) -> RegisteredEvent {
        RegisteredEvent {
            registration_id: id,
            event_id: id,
            title: title.to_string(),
            date,
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            location: "Campus Hall".to_string(),
            status,
        }
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_march_2025_grid() {
        let view = build_month_view(&[], ymd(2025, 3, 15), false);

        assert_eq!(view.year, 2025);
        assert_eq!(view.month, 3);
        assert_eq!(view.month_name, "March");
        // 2025-03-01 is a Saturday, 2025-03-31 a Monday.
        assert_eq!(view.weeks.len(), 6);
        assert_eq!(view.weeks[0][0], ymd(2025, 2, 24));
        assert_eq!(view.weeks[0][5], ymd(2025, 3, 1));
        assert_eq!(view.weeks[5][6], ymd(2025, 4, 6));
    }

    #[test]
    fn test_february_starting_on_monday() {
        // 2021-02-01 is a Monday and the month has exactly four weeks.
        let view = build_month_view(&[], ymd(2021, 2, 10), false);
        assert_eq!(view.weeks.len(), 4);
        assert_eq!(view.weeks[0][0], ymd(2021, 2, 1));
        assert_eq!(view.weeks[3][6], ymd(2021, 2, 28));
    }

    #[test]
    fn test_only_reference_month_events_are_annotated() {
        let registrations = vec![
            registered(1, ymd(2025, 3, 20), "Test Event", RegistrationStatus::Registered),
            registered(2, ymd(2025, 4, 1), "April Event", RegistrationStatus::Registered),
            registered(3, ymd(2024, 3, 20), "Last Year", RegistrationStatus::Registered),
            registered(4, ymd(2025, 3, 2), "Canceled Event", RegistrationStatus::Canceled),
        ];

        let view = build_month_view(&registrations, ymd(2025, 3, 1), false);
        assert_eq!(view.user_events_by_date.len(), 2);
        assert_eq!(view.titles_on(20), vec!["Test Event"]);
        assert_eq!(view.titles_on(2), vec!["Canceled Event"]);
        assert!(view.titles_on(1).is_empty());
    }

    #[test]
    fn test_exclude_canceled_flag() {
        let registrations = vec![
            registered(1, ymd(2025, 3, 20), "Test Event", RegistrationStatus::Registered),
            registered(2, ymd(2025, 3, 2), "Canceled Event", RegistrationStatus::Canceled),
        ];

        let view = build_month_view(&registrations, ymd(2025, 3, 1), true);
        assert_eq!(view.user_events_by_date.len(), 1);
        assert!(view.titles_on(2).is_empty());
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(ymd(2024, 2, 1)), ymd(2024, 2, 29));
        assert_eq!(last_day_of_month(ymd(2100, 2, 1)), ymd(2100, 2, 28));
        assert_eq!(last_day_of_month(ymd(2000, 2, 1)), ymd(2000, 2, 29));
        assert_eq!(last_day_of_month(ymd(2025, 4, 1)), ymd(2025, 4, 30));
        assert_eq!(last_day_of_month(ymd(2025, 12, 1)), ymd(2025, 12, 31));
    }

    proptest! {
        #[test]
        fn prop_grid_covers_month_in_monday_rows(year in 1970i32..2100, month in 1u32..=12, day in 1u32..=28) {
            let reference = ymd(year, month, day);
            let view = build_month_view(&[], reference, false);

            let dates: Vec<NaiveDate> = view.weeks.iter().flatten().copied().collect();
            prop_assert_eq!(view.weeks.len(), (dates.len() + 6) / 7);
            for (i, week) in view.weeks.iter().enumerate() {
                if i + 1 < view.weeks.len() {
                    prop_assert_eq!(week.len(), 7);
                }
                prop_assert_eq!(week[0].weekday(), Weekday::Mon);
            }

            for window in dates.windows(2) {
                prop_assert_eq!(window[1] - window[0], Duration::days(1));
            }

            let in_month = dates.iter().filter(|d| d.month() == month && d.year() == year).count();
            prop_assert_eq!(in_month as u32, last_day_of_month(ymd(year, month, 1)).day());
        }

        #[test]
        fn prop_annotations_stay_in_month(
            offsets in proptest::collection::vec(-60i64..60, 0..20),
            exclude in any::<bool>(),
        ) {
            let reference = ymd(2025, 3, 15);
            let registrations: Vec<RegisteredEvent> = offsets
                .iter()
                .enumerate()
                .map(|(i, offset)| {
                    let status = if i % 2 == 0 { RegistrationStatus::Registered } else { RegistrationStatus::Canceled };
                    registered(i as i64, reference + Duration::days(*offset), "Event", status)
                })
                .collect();

            let view = build_month_view(&registrations, reference, exclude);
            let expected = registrations
                .iter()
                .filter(|r| r.date.month() == 3 && r.date.year() == 2025)
                .filter(|r| !(exclude && r.status == RegistrationStatus::Canceled))
                .count();

            prop_assert_eq!(view.user_events_by_date.len(), expected);
            for entry in &view.user_events_by_date {
                prop_assert!((1..=31).contains(&entry.day));
            }
        }
    }
}
