use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::price_refresh_traits::{PriceRefreshServiceTrait, PriceResolverTrait};
use super::price_source_model::{PriceSource, RefreshSummary};
use crate::errors::Result;
use crate::instruments::{InstrumentClass, InstrumentRecord};
use crate::lifecycle::LifecycleState;
use crate::mutual_funds::{MutualFund, MutualFundServiceTrait};
use crate::settings::SettingsServiceTrait;
use crate::tradables::{TradablePosition, TradableServiceTrait};

enum LookupOutcome {
    Updated,
    Unchanged,
    Failed(String),
}

/// Bulk NAV and price refresh.
///
/// Lookups run one instrument at a time with the configured delay between them. A failed
/// lookup leaves the instrument at its last known price and the run moves on.
pub struct PriceRefreshService {
    resolver: Arc<dyn PriceResolverTrait>,
    mutual_fund_service: Arc<dyn MutualFundServiceTrait>,
    tradable_service: Arc<dyn TradableServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    cancelled: Arc<AtomicBool>,
}

impl PriceRefreshService {
    pub fn new(
        resolver: Arc<dyn PriceResolverTrait>,
        mutual_fund_service: Arc<dyn MutualFundServiceTrait>,
        tradable_service: Arc<dyn TradableServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            resolver,
            mutual_fund_service,
            tradable_service,
            settings_service,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares a cancellation flag with the caller, e.g. a UI "stop" button.
    pub fn with_cancellation_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Setting the returned flag stops the current run before its next instrument.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn delay(&self) -> Result<Duration> {
        let settings = self.settings_service.get_engine_settings()?;
        Ok(Duration::from_millis(settings.price_refresh_delay_ms))
    }

    async fn pace(&self, delay: Duration, lookups_so_far: usize) {
        if lookups_so_far > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn refresh_fund(&self, fund: &MutualFund, code: &str, as_of: NaiveDate) -> LookupOutcome {
        let source = PriceSource::MutualFundNav(code.to_string());
        match self.resolver.lookup(&source).await {
            Ok(Some(nav)) if nav == fund.current_nav => LookupOutcome::Unchanged,
            Ok(Some(nav)) => match self
                .mutual_fund_service
                .update_nav(fund.id, nav, as_of)
                .await
            {
                Ok(_) => LookupOutcome::Updated,
                Err(e) => LookupOutcome::Failed(e.to_string()),
            },
            Ok(None) => LookupOutcome::Failed(format!("No NAV found for {}", source)),
            Err(e) => LookupOutcome::Failed(e.to_string()),
        }
    }

    async fn refresh_position(
        &self,
        position: &TradablePosition,
        source: &PriceSource,
    ) -> LookupOutcome {
        match self.resolver.lookup(source).await {
            Ok(Some(price)) if price == position.current_price => LookupOutcome::Unchanged,
            Ok(Some(price)) => match self.tradable_service.update_price(position.id, price).await {
                Ok(_) => LookupOutcome::Updated,
                Err(e) => LookupOutcome::Failed(e.to_string()),
            },
            Ok(None) => LookupOutcome::Failed(format!("No price found for {}", source)),
            Err(e) => LookupOutcome::Failed(e.to_string()),
        }
    }

    async fn run_fund_refresh(&self, as_of: NaiveDate) -> Result<RefreshSummary> {
        let delay = self.delay()?;
        let funds: Vec<MutualFund> = self
            .mutual_fund_service
            .list_mutual_funds()?
            .into_iter()
            .filter_map(|detail| match detail.record {
                InstrumentRecord::MutualFund(fund) if !fund.status.is_terminal() => Some(fund),
                _ => None,
            })
            .collect();

        let mut summary = RefreshSummary::default();
        for fund in &funds {
            if self.is_cancelled() {
                summary.cancelled = true;
                summary.skipped += 1;
                continue;
            }
            let Some(code) = fund.scheme_code.as_deref().map(str::trim).filter(|c| !c.is_empty())
            else {
                debug!("Skipping NAV refresh for '{}': no scheme code", fund.name);
                summary.skipped += 1;
                continue;
            };

            self.pace(delay, summary.attempted).await;
            summary.attempted += 1;
            match self.refresh_fund(fund, code, as_of).await {
                LookupOutcome::Updated => summary.updated += 1,
                LookupOutcome::Unchanged => summary.unchanged += 1,
                LookupOutcome::Failed(reason) => {
                    warn!("NAV refresh failed for '{}': {}", fund.name, reason);
                    summary.record_failure(InstrumentClass::MutualFund, fund.id, &fund.name, reason);
                }
            }
        }

        info!("Mutual fund NAV refresh: {}", summary.summary());
        Ok(summary)
    }

    async fn run_tradable_refresh(&self) -> Result<RefreshSummary> {
        let delay = self.delay()?;
        let positions: Vec<TradablePosition> = self
            .tradable_service
            .list_positions()?
            .into_iter()
            .filter_map(|detail| match detail.record {
                InstrumentRecord::Tradable(position) if !position.status.is_terminal() => {
                    Some(position)
                }
                _ => None,
            })
            .collect();

        let mut summary = RefreshSummary::default();
        for position in &positions {
            if self.is_cancelled() {
                summary.cancelled = true;
                summary.skipped += 1;
                continue;
            }
            let Some(source) = PriceSource::for_position(position) else {
                summary.skipped += 1;
                continue;
            };

            self.pace(delay, summary.attempted).await;
            summary.attempted += 1;
            match self.refresh_position(position, &source).await {
                LookupOutcome::Updated => summary.updated += 1,
                LookupOutcome::Unchanged => summary.unchanged += 1,
                LookupOutcome::Failed(reason) => {
                    warn!("Price refresh failed for '{}': {}", position.name, reason);
                    summary.record_failure(
                        InstrumentClass::Tradable,
                        position.id,
                        &position.name,
                        reason,
                    );
                }
            }
        }

        info!("Tradable price refresh: {}", summary.summary());
        Ok(summary)
    }
}

#[async_trait]
impl PriceRefreshServiceTrait for PriceRefreshService {
    async fn refresh_mutual_fund_navs(&self, as_of: NaiveDate) -> Result<RefreshSummary> {
        self.cancelled.store(false, Ordering::SeqCst);
        self.run_fund_refresh(as_of).await
    }

    async fn refresh_tradable_prices(&self) -> Result<RefreshSummary> {
        self.cancelled.store(false, Ordering::SeqCst);
        self.run_tradable_refresh().await
    }

    async fn refresh_all(&self, as_of: NaiveDate) -> Result<RefreshSummary> {
        self.cancelled.store(false, Ordering::SeqCst);
        let mut summary = self.run_fund_refresh(as_of).await?;
        summary.merge(self.run_tradable_refresh().await?);
        info!("Price refresh complete: {}", summary.summary());
        Ok(summary)
    }

    fn cancel(&self) {
        info!("Price refresh cancellation requested");
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
