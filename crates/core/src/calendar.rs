//! Month and quarter arithmetic shared by reports, insights and the dashboard.

use chrono::{Datelike, Months, NaiveDate};

/// First day of `date`'s month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `months` before `date`'s month.
#[must_use]
pub fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    let start = month_start(date);
    start.checked_sub_months(Months::new(months)).unwrap_or(start)
}

/// Last day of `date`'s month.
#[must_use]
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let start = month_start(date);
    start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start)
}

/// Month starts from `start`'s month through `end`'s month, oldest first.
#[must_use]
pub fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let last = month_start(end);
    let mut months = Vec::new();
    let mut current = month_start(start);
    while current <= last {
        months.push(current);
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}

/// `YYYY-MM` label.
#[must_use]
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Calendar quarter (1-4) of `date`.
#[must_use]
pub fn quarter(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// First and last day of `date`'s calendar quarter.
#[must_use]
pub fn quarter_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_month = (quarter(date) - 1) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date);
    let end = month_end(start.checked_add_months(Months::new(2)).unwrap_or(start));
    (start, end)
}
