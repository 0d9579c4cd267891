//! Temporal bucketing of dated expenses.
//!
//! Every function here is pure over an explicit snapshot; filters run before
//! any grouping.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::bucket_model::{
    BucketFilter, BucketKey, BucketMap, Granularity, MonthKey, WeekBucket, WeekKey,
};
use super::spending_model::{category_name, Expense, ExpenseTag};
use crate::utils::days_in_month;

/// Thursday-anchored week number: shift to the Thursday of the (Monday-first)
/// week, then `ceil((days since Jan 1 of the Thursday's year + 1) / 7)`.
pub fn thursday_week(date: NaiveDate) -> WeekKey {
    let iso_weekday = i64::from(date.weekday().number_from_monday());
    let thursday = date + Duration::days(4 - iso_weekday);
    let day_of_year = i64::from(thursday.ordinal());
    WeekKey {
        year: thursday.year(),
        week: ((day_of_year + 6) / 7) as u32,
    }
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn filter_expenses<'a>(
    expenses: &'a [Expense],
    filter: &'a BucketFilter,
) -> impl Iterator<Item = &'a Expense> + 'a {
    expenses.iter().filter(move |e| filter.admits(e))
}

/// Sums filtered expenses into buckets of the requested granularity.
///
/// Weekday views always carry all seven days and day views every day of the
/// selected month, zero-filled. Day views ignore events outside that month.
pub fn bucket_expenses(
    expenses: &[Expense],
    tags: &[ExpenseTag],
    granularity: Granularity,
    filter: &BucketFilter,
) -> BucketMap<BucketKey> {
    let mut buckets = BucketMap::new();

    match granularity {
        Granularity::Weekday => {
            for day in 0..7 {
                buckets.ensure(BucketKey::Weekday(day));
            }
        }
        Granularity::Day(month) => {
            for date in month_days(month) {
                buckets.ensure(BucketKey::Day(date));
            }
        }
        _ => {}
    }

    let tag_index: HashMap<i64, &ExpenseTag> = tags.iter().map(|t| (t.id, t)).collect();

    for expense in filter_expenses(expenses, filter) {
        let key = match granularity {
            Granularity::Month => BucketKey::Month(expense.month()),
            Granularity::Week => BucketKey::Week(thursday_week(expense.date)),
            Granularity::Weekday => BucketKey::Weekday(weekday_index(expense.date)),
            Granularity::Day(month) => {
                if expense.month() != month {
                    continue;
                }
                BucketKey::Day(expense.date)
            }
            Granularity::Category => BucketKey::Category(category_name(expense, &tag_index)),
        };
        buckets.add(key, expense.amount);
    }

    buckets
}

/// Weekly totals in week order, each labelled with the month of the first
/// contributing event in input order.
pub fn weekly_buckets(expenses: &[Expense], filter: &BucketFilter) -> Vec<WeekBucket> {
    let mut weeks: BTreeMap<WeekKey, WeekBucket> = BTreeMap::new();
    for expense in filter_expenses(expenses, filter) {
        let key = thursday_week(expense.date);
        let bucket = weeks.entry(key).or_insert_with(|| WeekBucket {
            key,
            total: Decimal::ZERO,
            month_label: expense.month(),
            event_count: 0,
        });
        bucket.total += expense.amount;
        bucket.event_count += 1;
    }
    weeks.into_values().collect()
}

/// Every date of the month, leap-year aware.
pub fn month_days(month: MonthKey) -> Vec<NaiveDate> {
    (1..=days_in_month(month.year, month.month))
        .filter_map(|day| NaiveDate::from_ymd_opt(month.year, month.month, day))
        .collect()
}
