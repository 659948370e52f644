//! Pure due-date queries over review item collections.
//!
//! "Today" spans to the end of the `as_of` calendar day, so everything
//! overdue is also due today. All functions borrow; nothing here touches
//! storage or the clock.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::types::ReviewItem;

/// Items due on or before the end of `as_of`'s day.
pub fn due_today(items: &[ReviewItem], as_of: DateTime<Utc>) -> Vec<&ReviewItem> {
    let cutoff = start_of_day(as_of) + Duration::days(1);
    items.iter().filter(|i| i.next_review < cutoff).collect()
}

/// Items whose due date fell strictly before the start of `as_of`'s day.
pub fn overdue(items: &[ReviewItem], as_of: DateTime<Utc>) -> Vec<&ReviewItem> {
    let cutoff = start_of_day(as_of);
    items.iter().filter(|i| i.next_review < cutoff).collect()
}

/// Items coming due between `as_of` and the end of the day `days` from now.
pub fn due_within_days(items: &[ReviewItem], days: u32, as_of: DateTime<Utc>) -> Vec<&ReviewItem> {
    let cutoff = start_of_day(as_of) + Duration::days(i64::from(days) + 1);
    items
        .iter()
        .filter(|i| i.next_review >= as_of && i.next_review < cutoff)
        .collect()
}

fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}
