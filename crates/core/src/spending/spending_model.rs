//! Expense ledger and spending summary models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::bucket_model::{BucketMap, MonthKey};
use crate::constants::UNKNOWN_CATEGORY;
use crate::errors::{ensure_not_blank, ensure_positive, Result};

/// A dated, tagged monetary event. Used only for read-side bucketing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_tag_id: Option<i64>,
    /// Tags that drop the event from every bucketed view when excluded.
    #[serde(default)]
    pub exclusion_tag_ids: Vec<i64>,
    pub description: Option<String>,
}

impl Expense {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_tag_id: Option<i64>,
    #[serde(default)]
    pub exclusion_tag_ids: Vec<i64>,
    pub description: Option<String>,
}

impl NewExpense {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("amount", self.amount)
    }
}

/// Category or exclusion label attached to expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTag {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseTag {
    pub name: String,
    pub color: Option<String>,
}

impl NewExpenseTag {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)
    }
}

/// Expenses and tags read together so one view never mixes two ledger states.
#[derive(Debug, Clone, Default)]
pub struct ExpenseSnapshot {
    pub expenses: Vec<Expense>,
    pub tags: Vec<ExpenseTag>,
}

impl ExpenseSnapshot {
    pub fn tag_index(&self) -> HashMap<i64, &ExpenseTag> {
        self.tags.iter().map(|t| (t.id, t)).collect()
    }
}

/// Resolves an expense's category name, falling back to "Unknown".
pub fn category_name(expense: &Expense, tags: &HashMap<i64, &ExpenseTag>) -> String {
    expense
        .category_tag_id
        .and_then(|id| tags.get(&id))
        .map(|tag| tag.name.clone())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

/// Spending per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub category_name: String,
    pub color: Option<String>,
    pub amount: Decimal,
    pub transaction_count: i32,
}

/// Totals over a filtered expense set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    /// Months without spending read as zero.
    pub by_month: BucketMap<MonthKey>,
    /// Non-zero categories, largest first.
    pub by_category: Vec<CategorySpending>,
    pub total_spending: Decimal,
    pub monthly_average: Decimal,
    pub transaction_count: i32,
}

impl SpendingSummary {
    pub fn add_spending(&mut self, expense: &Expense, tags: &HashMap<i64, &ExpenseTag>) {
        self.by_month.add(expense.month(), expense.amount);

        let name = category_name(expense, tags);
        match self.by_category.iter_mut().find(|c| c.category_name == name) {
            Some(entry) => {
                entry.amount += expense.amount;
                entry.transaction_count += 1;
            }
            None => self.by_category.push(CategorySpending {
                color: expense
                    .category_tag_id
                    .and_then(|id| tags.get(&id))
                    .and_then(|tag| tag.color.clone()),
                category_name: name,
                amount: expense.amount,
                transaction_count: 1,
            }),
        }

        self.total_spending += expense.amount;
        self.transaction_count += 1;
    }

    /// Averages over the months that have spending.
    pub fn calculate_monthly_average(&mut self) {
        let months = self.by_month.len();
        if months > 0 {
            self.monthly_average = self.total_spending / Decimal::from(months);
        }
    }

    /// Drops zero slices and orders categories by amount, largest first.
    pub fn finalize_categories(&mut self) {
        self.by_category.retain(|c| !c.amount.is_zero());
        self.by_category.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });
    }
}
