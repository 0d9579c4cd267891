//! Bucket keys, filters and the zero-default bucket map.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::spending_model::Expense;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Calendar month in its own year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// "YYYY-MM".
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Thursday-anchored week of year. The year is that of the Thursday, so a
/// late-December date can belong to week 1 of the following year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// "YYYY-Www".
    pub fn label(&self) -> String {
        format!("{:04}-W{:02}", self.year, self.week)
    }
}

/// Aggregation key of a bucketed view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BucketKey {
    Month(MonthKey),
    Week(WeekKey),
    /// 0 = Sunday .. 6 = Saturday.
    Weekday(u32),
    Day(NaiveDate),
    Category(String),
}

impl BucketKey {
    pub fn label(&self) -> String {
        match self {
            BucketKey::Month(m) => m.label(),
            BucketKey::Week(w) => w.label(),
            BucketKey::Weekday(d) => WEEKDAY_LABELS
                .get(*d as usize)
                .map(|s| s.to_string())
                .unwrap_or_else(|| d.to_string()),
            BucketKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            BucketKey::Category(name) => name.clone(),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Granularity of a bucketed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "month", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Month,
    Week,
    Weekday,
    /// Every day of the given month, zero-filled.
    Day(MonthKey),
    Category,
}

/// Ordered key -> sum mapping where a missing key reads as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketMap<K: Ord> {
    buckets: BTreeMap<K, Decimal>,
}

impl<K: Ord> Default for BucketMap<K> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<K: Ord> BucketMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Decimal {
        self.buckets.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn add(&mut self, key: K, amount: Decimal) {
        *self.buckets.entry(key).or_insert(Decimal::ZERO) += amount;
    }

    /// Makes `key` present with a zero sum if it is missing.
    pub fn ensure(&mut self, key: K) {
        self.buckets.entry(key).or_insert(Decimal::ZERO);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Decimal)> {
        self.buckets.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Decimal> {
        self.buckets.values_mut()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.buckets.values().copied().sum()
    }

    /// Largest bucket value, zero for an empty map.
    pub fn max_value(&self) -> Decimal {
        self.buckets
            .values()
            .copied()
            .max()
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
    }
}

/// Serialized as `[key, value]` pairs in key order, since keys need not be strings.
impl<K: Ord + Serialize> Serialize for BucketMap<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.buckets.iter())
    }
}

impl<'de, K: Ord + Deserialize<'de>> Deserialize<'de> for BucketMap<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(K, Decimal)>::deserialize(deserializer)?;
        let mut buckets = BucketMap::new();
        for (key, value) in pairs {
            buckets.add(key, value);
        }
        Ok(buckets)
    }
}

impl BucketMap<BucketKey> {
    /// Chart-ready (label, value) points in key order.
    pub fn to_series(&self) -> Vec<BucketPoint> {
        self.buckets
            .iter()
            .map(|(key, value)| BucketPoint {
                label: key.label(),
                value: *value,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketPoint {
    pub label: String,
    pub value: Decimal,
}

/// Filters applied before any bucketing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketFilter {
    /// An event carrying any of these tags is dropped.
    #[serde(default)]
    pub excluded_tag_ids: HashSet<i64>,
    /// Months to keep. Empty means every month.
    #[serde(default)]
    pub months: HashSet<MonthKey>,
}

impl BucketFilter {
    pub fn excluding<I: IntoIterator<Item = i64>>(tag_ids: I) -> Self {
        Self {
            excluded_tag_ids: tag_ids.into_iter().collect(),
            months: HashSet::new(),
        }
    }

    pub fn with_months<I: IntoIterator<Item = MonthKey>>(mut self, months: I) -> Self {
        self.months = months.into_iter().collect();
        self
    }

    pub fn admits(&self, expense: &Expense) -> bool {
        if expense
            .exclusion_tag_ids
            .iter()
            .any(|id| self.excluded_tag_ids.contains(id))
        {
            return false;
        }
        self.months.is_empty() || self.months.contains(&expense.month())
    }
}

/// One week of spending with its display month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub key: WeekKey,
    pub total: Decimal,
    /// Month of the first contributing event, for display grouping only.
    pub month_label: MonthKey,
    pub event_count: usize,
}
