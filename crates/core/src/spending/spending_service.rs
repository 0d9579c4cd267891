use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::bucket_model::{BucketFilter, BucketKey, BucketMap, Granularity, WeekBucket};
use super::bucketing;
use super::heatmap::{heatmap_cells, HeatmapCell};
use super::spending_model::{Expense, ExpenseTag, NewExpense, NewExpenseTag, SpendingSummary};
use super::spending_traits::{ExpenseRepositoryTrait, SpendingServiceTrait};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{ensure_positive, Result};

pub struct SpendingService {
    expense_repository: Arc<dyn ExpenseRepositoryTrait>,
}

impl SpendingService {
    pub fn new(expense_repository: Arc<dyn ExpenseRepositoryTrait>) -> Self {
        SpendingService { expense_repository }
    }
}

#[async_trait]
impl SpendingServiceTrait for SpendingService {
    fn bucket_expenses(
        &self,
        granularity: Granularity,
        filter: &BucketFilter,
    ) -> Result<BucketMap<BucketKey>> {
        let snapshot = self.expense_repository.load_snapshot()?;
        Ok(bucketing::bucket_expenses(
            &snapshot.expenses,
            &snapshot.tags,
            granularity,
            filter,
        ))
    }

    fn weekly_buckets(&self, filter: &BucketFilter) -> Result<Vec<WeekBucket>> {
        let snapshot = self.expense_repository.load_snapshot()?;
        Ok(bucketing::weekly_buckets(&snapshot.expenses, filter))
    }

    fn heatmap(&self, granularity: Granularity, filter: &BucketFilter) -> Result<Vec<HeatmapCell>> {
        let buckets = self.bucket_expenses(granularity, filter)?;
        Ok(heatmap_cells(&buckets))
    }

    fn get_spending_summary(&self, filter: &BucketFilter) -> Result<SpendingSummary> {
        debug!("Building spending summary...");
        let snapshot = self.expense_repository.load_snapshot()?;
        let tags = snapshot.tag_index();

        let mut summary = SpendingSummary::default();
        for expense in bucketing::filter_expenses(&snapshot.expenses, filter) {
            summary.add_spending(expense, &tags);
        }
        summary.calculate_monthly_average();
        summary.finalize_categories();

        summary.total_spending = summary.total_spending.round_dp(DISPLAY_DECIMAL_PRECISION);
        summary.monthly_average = summary.monthly_average.round_dp(DISPLAY_DECIMAL_PRECISION);
        for val in summary.by_month.values_mut() {
            *val = val.round_dp(DISPLAY_DECIMAL_PRECISION);
        }
        for cat in summary.by_category.iter_mut() {
            cat.amount = cat.amount.round_dp(DISPLAY_DECIMAL_PRECISION);
        }
        Ok(summary)
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.expense_repository.load_snapshot()?.expenses)
    }

    fn list_tags(&self) -> Result<Vec<ExpenseTag>> {
        Ok(self.expense_repository.load_snapshot()?.tags)
    }

    async fn create_expense(&self, new_expense: NewExpense) -> Result<Expense> {
        new_expense.validate()?;
        self.expense_repository.create_expense(new_expense).await
    }

    async fn update_expense(&self, expense: Expense) -> Result<Expense> {
        ensure_positive("amount", expense.amount)?;
        self.expense_repository.update_expense(expense).await
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<usize> {
        self.expense_repository.delete_expense(expense_id).await
    }

    async fn create_tag(&self, new_tag: NewExpenseTag) -> Result<ExpenseTag> {
        new_tag.validate()?;
        self.expense_repository.create_tag(new_tag).await
    }

    async fn delete_tag(&self, tag_id: i64) -> Result<usize> {
        self.expense_repository.delete_tag(tag_id).await
    }
}
