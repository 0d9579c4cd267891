//! Repository and service traits for the expense ledger and spending views.

use async_trait::async_trait;

use super::bucket_model::{BucketFilter, BucketKey, BucketMap, Granularity, WeekBucket};
use super::heatmap::HeatmapCell;
use super::spending_model::{
    Expense, ExpenseSnapshot, ExpenseTag, NewExpense, NewExpenseTag, SpendingSummary,
};
use crate::errors::Result;

#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    /// Expenses (ordered by date, then id) and tags read from one consistent view.
    fn load_snapshot(&self) -> Result<ExpenseSnapshot>;
    async fn create_expense(&self, new_expense: NewExpense) -> Result<Expense>;
    async fn update_expense(&self, expense: Expense) -> Result<Expense>;
    async fn delete_expense(&self, expense_id: i64) -> Result<usize>;
    async fn create_tag(&self, new_tag: NewExpenseTag) -> Result<ExpenseTag>;
    async fn delete_tag(&self, tag_id: i64) -> Result<usize>;
}

#[async_trait]
pub trait SpendingServiceTrait: Send + Sync {
    fn bucket_expenses(
        &self,
        granularity: Granularity,
        filter: &BucketFilter,
    ) -> Result<BucketMap<BucketKey>>;
    fn weekly_buckets(&self, filter: &BucketFilter) -> Result<Vec<WeekBucket>>;
    fn heatmap(&self, granularity: Granularity, filter: &BucketFilter) -> Result<Vec<HeatmapCell>>;
    fn get_spending_summary(&self, filter: &BucketFilter) -> Result<SpendingSummary>;
    fn list_expenses(&self) -> Result<Vec<Expense>>;
    fn list_tags(&self) -> Result<Vec<ExpenseTag>>;
    async fn create_expense(&self, new_expense: NewExpense) -> Result<Expense>;
    async fn update_expense(&self, expense: Expense) -> Result<Expense>;
    async fn delete_expense(&self, expense_id: i64) -> Result<usize>;
    async fn create_tag(&self, new_tag: NewExpenseTag) -> Result<ExpenseTag>;
    async fn delete_tag(&self, tag_id: i64) -> Result<usize>;
}
