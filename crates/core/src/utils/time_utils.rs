use chrono::{Months, NaiveDate, Utc};

/// Today's date as the engine's default "as of" date.
pub fn valuation_date_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Number of days in the given calendar month (leap-year aware).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return 0,
    };
    let next = match first.checked_add_months(Months::new(1)) {
        Some(d) => d,
        None => return 31,
    };
    (next - first).num_days() as u32
}

/// Adds whole months, clamping to the last day of the target month
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}
