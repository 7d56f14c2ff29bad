//! Parsed schedule items and week filtering.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::date::parse_calendar_date;

/// Field holding the first day of a meeting-workbook week.
pub const MEETING_WEEK_FIELD: &str = "mwb_week_date";

/// Field holding the first day of a study-article week.
pub const STUDY_WEEK_FIELD: &str = "w_study_date";

/// Days after the anchor still inside the week (inclusive).
const WEEK_SPAN_DAYS: u64 = 6;

/// One record produced by the publication parser.
///
/// The record is passed through to callers untouched. Only the week-anchor
/// fields are ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleItem(Value);

impl ScheduleItem {
    /// Wrap a raw parser record.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw record.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// First day of the week this item belongs to.
    ///
    /// The meeting anchor wins when present; if it is present but not a
    /// date the item has no anchor at all.
    pub fn week_anchor(&self) -> Option<NaiveDate> {
        match self.text_field(MEETING_WEEK_FIELD) {
            Some(meeting) => parse_calendar_date(meeting),
            None => self.text_field(STUDY_WEEK_FIELD).and_then(parse_calendar_date),
        }
    }

    /// Whether `date` falls within the 7-day week starting at the anchor.
    pub fn covers(&self, date: NaiveDate) -> bool {
        let Some(start) = self.week_anchor() else {
            return false;
        };
        let Some(end) = start.checked_add_days(Days::new(WEEK_SPAN_DAYS)) else {
            return false;
        };
        start <= date && date <= end
    }

    fn text_field(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Keep only the items whose week contains `target`, preserving order.
pub fn filter_by_date(items: &[ScheduleItem], target: NaiveDate) -> Vec<ScheduleItem> {
    items
        .iter()
        .filter(|item| item.covers(target))
        .cloned()
        .collect()
}
