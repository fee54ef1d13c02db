//! Test data builders

use chrono::{NaiveDate, NaiveTime, Utc};
use fake::faker::address::en::CityName;
use fake::faker::internet::en::Username;
use fake::Fake;

use campus_events::models::{Event, EventInput, Principal};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// The event from the organizer/attendee walkthrough
pub fn test_event_input() -> EventInput {
    EventInput {
        title: "Test Event".to_string(),
        description: "Test Description".to_string(),
        date: date(2025, 3, 20),
        time: time(12, 0),
        location: "Campus Hall".to_string(),
        sync_to_calendar: false,
    }
}

/// A valid event input with generated location, on the given day of March 2025
pub fn random_event_input(day: u32, hour: u32) -> EventInput {
    let location: String = CityName().fake();
    EventInput {
        title: format!("Meetup {}", day),
        description: "Generated event".to_string(),
        date: date(2025, 3, day),
        time: time(hour, 0),
        location,
        sync_to_calendar: false,
    }
}

pub fn random_principal(user_id: i64) -> Principal {
    let username: String = Username().fake();
    Principal::new(user_id, username)
}

/// A stored-looking event, for adapter tests that bypass the store
pub fn stored_event(id: i64, calendar_event_id: Option<&str>) -> Event {
    Event {
        id,
        title: "Test Event".to_string(),
        description: "Test Description".to_string(),
        date: date(2025, 3, 20),
        time: time(12, 0),
        location: "Campus Hall".to_string(),
        organizer_id: 1,
        calendar_event_id: calendar_event_id.map(str::to_string),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
