//! Monthly attendance histogram over the trailing twelve months.

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::models::Event;

/// Number of buckets in the histogram.
pub const MONTHS: usize = 12;

/// Summed attendance for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAttendance {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    pub men: u32,
    pub women: u32,
    pub total: u32,
}

impl MonthlyAttendance {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            men: 0,
            women: 0,
            total: 0,
        }
    }

    /// Short label such as `Mar 2026`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }
}

/// Parse an event date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

/// Bucket attendance into the twelve months ending at `today`'s month, oldest first.
///
/// Months without events keep zero counts. Events without attendance or with an
/// unparseable date are skipped.
pub fn monthly_attendance(events: &[Event], today: NaiveDate) -> Vec<MonthlyAttendance> {
    let last = month_index(today.year(), today.month());
    let first = last - (MONTHS as i32 - 1);

    let mut buckets: Vec<MonthlyAttendance> = (first..=last)
        .map(|idx| MonthlyAttendance::empty(idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1))
        .collect();

    for event in events {
        let Some(attendance) = event.attendance else {
            continue;
        };
        let Some(date) = parse_event_date(&event.date) else {
            tracing::debug!("Skipping event {} with unparseable date {:?}", event.id, event.date);
            continue;
        };

        let idx = month_index(date.year(), date.month());
        if idx < first || idx > last {
            continue;
        }

        let bucket = &mut buckets[(idx - first) as usize];
        // Counts come from the server unchecked; cap instead of overflowing.
        bucket.men = bucket.men.saturating_add(attendance.men);
        bucket.women = bucket.women.saturating_add(attendance.women);
        bucket.total = bucket.total.saturating_add(attendance.total());
    }

    buckets
}

/// [`monthly_attendance`] relative to the local current date.
pub fn monthly_attendance_now(events: &[Event]) -> Vec<MonthlyAttendance> {
    monthly_attendance(events, Local::now().date_naive())
}
