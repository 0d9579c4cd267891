use async_trait::async_trait;
use std::sync::Arc;

use super::balances_model::{
    CashAccount, NewCashAccount, NewOtherAsset, NewSavingsGoal, OtherAsset, SavingsGoal,
};
use super::portfolio_traits::{BalancesRepositoryTrait, BalancesServiceTrait};
use crate::errors::Result;

pub struct BalancesService {
    repository: Arc<dyn BalancesRepositoryTrait>,
}

impl BalancesService {
    pub fn new(repository: Arc<dyn BalancesRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BalancesServiceTrait for BalancesService {
    fn list_cash_accounts(&self) -> Result<Vec<CashAccount>> {
        self.repository.list_cash_accounts()
    }

    async fn create_cash_account(&self, new_account: NewCashAccount) -> Result<CashAccount> {
        new_account.validate()?;
        self.repository.create_cash_account(new_account).await
    }

    async fn update_cash_account(&self, account: CashAccount) -> Result<CashAccount> {
        NewCashAccount {
            name: account.name.clone(),
            balance: account.balance,
            currency: account.currency,
        }
        .validate()?;
        self.repository.update_cash_account(account).await
    }

    async fn delete_cash_account(&self, account_id: i64) -> Result<usize> {
        self.repository.delete_cash_account(account_id).await
    }

    fn list_other_assets(&self) -> Result<Vec<OtherAsset>> {
        self.repository.list_other_assets()
    }

    async fn create_other_asset(&self, new_asset: NewOtherAsset) -> Result<OtherAsset> {
        new_asset.validate()?;
        self.repository.create_other_asset(new_asset).await
    }

    async fn update_other_asset(&self, asset: OtherAsset) -> Result<OtherAsset> {
        NewOtherAsset {
            name: asset.name.clone(),
            value: asset.value,
        }
        .validate()?;
        self.repository.update_other_asset(asset).await
    }

    async fn delete_other_asset(&self, asset_id: i64) -> Result<usize> {
        self.repository.delete_other_asset(asset_id).await
    }

    fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>> {
        self.repository.list_savings_goals()
    }

    async fn create_savings_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        new_goal.validate()?;
        self.repository.create_savings_goal(new_goal).await
    }

    async fn update_savings_goal(&self, goal: SavingsGoal) -> Result<SavingsGoal> {
        NewSavingsGoal {
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            saved_amount: goal.saved_amount,
        }
        .validate()?;
        self.repository.update_savings_goal(goal).await
    }

    async fn delete_savings_goal(&self, goal_id: i64) -> Result<usize> {
        self.repository.delete_savings_goal(goal_id).await
    }
}
