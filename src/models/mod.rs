//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod event;
pub mod registration;
pub mod calendar;

// Re-export commonly used models
pub use user::{User, Principal};
pub use event::{Event, EventInput, EventFields, CreateEventRequest};
pub use registration::{Registration, RegistrationStatus, RegisteredEvent};
pub use calendar::{MonthView, DayEntry};
