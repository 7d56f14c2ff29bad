//! Domain logic for meeting schedules.
//!
//! Pure functions and types: which issue a date belongs to, how dates are
//! parsed, and which schedule items fall in a given week. Nothing in here
//! performs I/O.

mod date;
mod error;
mod issue;
mod schedule;

pub use date::parse_calendar_date;
pub use error::DomainError;
pub use issue::{IssueReference, PublicationType, resolve_issue};
pub use schedule::{MEETING_WEEK_FIELD, STUDY_WEEK_FIELD, ScheduleItem, filter_by_date};
