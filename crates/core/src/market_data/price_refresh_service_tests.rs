//! Unit tests for the bulk price refresh.

use super::*;
use crate::errors::{Error, Result};
use crate::instruments::{InstrumentClass, InstrumentDetail, InstrumentRecord};
use crate::lifecycle::{MutualFundStatus, TradableStatus};
use crate::mutual_funds::{
    MutualFund, MutualFundServiceTrait, MutualFundUpdate, NewInstallment, NewMutualFund,
};
use crate::settings::{EngineSettings, EngineSettingsUpdate, SettingsServiceTrait};
use crate::tradables::{
    Market, NewTradablePosition, TradablePosition, TradablePositionUpdate, TradableServiceTrait,
};
use crate::valuation::ValuationEngine;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct StaticSettings;

#[async_trait]
impl SettingsServiceTrait for StaticSettings {
    fn get_engine_settings(&self) -> Result<EngineSettings> {
        Ok(EngineSettings {
            price_refresh_delay_ms: 0,
            ..EngineSettings::default()
        })
    }

    async fn update_engine_settings(&self, _update: &EngineSettingsUpdate) -> Result<EngineSettings> {
        unimplemented!()
    }

    fn get_setting_value(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// `None` in the response table simulates a transport failure.
#[derive(Default)]
struct MockResolver {
    responses: HashMap<PriceSource, Option<Option<Decimal>>>,
    lookups: Mutex<Vec<PriceSource>>,
    cancel_after_first: Option<Arc<AtomicBool>>,
}

#[async_trait]
impl PriceResolverTrait for MockResolver {
    async fn lookup(&self, source: &PriceSource) -> Result<Option<Decimal>> {
        self.lookups.lock().unwrap().push(source.clone());
        if let Some(flag) = &self.cancel_after_first {
            flag.store(true, Ordering::SeqCst);
        }
        match self.responses.get(source) {
            Some(Some(price)) => Ok(*price),
            Some(None) => Err(Error::ExternalLookup(format!("{} timed out", source))),
            None => Ok(None),
        }
    }
}

#[derive(Default)]
struct MockInstruments {
    funds: Mutex<Vec<MutualFund>>,
    positions: Mutex<Vec<TradablePosition>>,
}

fn detail(record: InstrumentRecord) -> InstrumentDetail {
    ValuationEngine::default().detail(record, d(2024, 6, 1))
}

#[async_trait]
impl MutualFundServiceTrait for MockInstruments {
    fn get_mutual_fund(&self, _fund_id: i64) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    fn list_mutual_funds(&self) -> Result<Vec<InstrumentDetail>> {
        Ok(self
            .funds
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|f| detail(InstrumentRecord::MutualFund(f)))
            .collect())
    }
    async fn create_mutual_fund(&self, _new_fund: NewMutualFund) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn update_mutual_fund(&self, _update: MutualFundUpdate) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn delete_mutual_fund(&self, _fund_id: i64) -> Result<usize> {
        unimplemented!()
    }
    async fn apply_installment(
        &self,
        _fund_id: i64,
        _installment: NewInstallment,
    ) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn pause_resume(&self, _fund_id: i64) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn redeem(
        &self,
        _fund_id: i64,
        _redeemed_amount: Decimal,
        _redeemed_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn update_nav(
        &self,
        fund_id: i64,
        nav: Decimal,
        nav_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        let mut funds = self.funds.lock().unwrap();
        let fund = funds.iter_mut().find(|f| f.id == fund_id).unwrap();
        fund.update_nav(nav, nav_date)?;
        Ok(detail(InstrumentRecord::MutualFund(fund.clone())))
    }
}

#[async_trait]
impl TradableServiceTrait for MockInstruments {
    fn get_position(&self, _position_id: i64) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    fn list_positions(&self) -> Result<Vec<InstrumentDetail>> {
        Ok(self
            .positions
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|p| detail(InstrumentRecord::Tradable(p)))
            .collect())
    }
    async fn create_position(&self, _new_position: NewTradablePosition) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn update_position(&self, _update: TradablePositionUpdate) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn delete_position(&self, _position_id: i64) -> Result<usize> {
        unimplemented!()
    }
    async fn sell(
        &self,
        _position_id: i64,
        _sell_price: Decimal,
        _sell_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        unimplemented!()
    }
    async fn update_price(&self, position_id: i64, price: Decimal) -> Result<InstrumentDetail> {
        let mut positions = self.positions.lock().unwrap();
        let position = positions.iter_mut().find(|p| p.id == position_id).unwrap();
        position.update_price(price)?;
        Ok(detail(InstrumentRecord::Tradable(position.clone())))
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn fund(id: i64, scheme_code: Option<&str>, nav: Decimal, status: MutualFundStatus) -> MutualFund {
    MutualFund {
        id,
        name: format!("Fund {}", id),
        scheme_code: scheme_code.map(str::to_string),
        sip_amount: None,
        start_date: d(2024, 1, 1),
        total_units: dec!(100),
        current_nav: nav,
        last_nav_date: None,
        total_invested: dec!(4000),
        status,
        notes: None,
        created_at: d(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        installments: Vec::new(),
    }
}

fn position(id: i64, market: Market, symbol: &str, price: Decimal, status: TradableStatus) -> TradablePosition {
    TradablePosition {
        id,
        name: format!("Position {}", id),
        symbol: symbol.to_string(),
        lookup_id: None,
        market,
        quantity: dec!(10),
        buy_price: dec!(100),
        buy_date: d(2024, 1, 2),
        current_price: price,
        status,
        notes: None,
        created_at: d(2024, 1, 2).and_hms_opt(0, 0, 0).unwrap(),
    }
}

fn nav(code: &str) -> PriceSource {
    PriceSource::MutualFundNav(code.to_string())
}

fn refresh_service(
    resolver: MockResolver,
    instruments: Arc<MockInstruments>,
) -> (PriceRefreshService, Arc<MockResolver>) {
    let resolver = Arc::new(resolver);
    let service = PriceRefreshService::new(
        resolver.clone(),
        instruments.clone(),
        instruments,
        Arc::new(StaticSettings),
    );
    (service, resolver)
}

#[tokio::test]
async fn test_fund_refresh_tallies_each_outcome() {
    let instruments = Arc::new(MockInstruments::default());
    *instruments.funds.lock().unwrap() = vec![
        fund(1, Some("100001"), dec!(40), MutualFundStatus::Ongoing),
        fund(2, Some("100002"), dec!(50), MutualFundStatus::Paused),
        fund(3, Some("100003"), dec!(60), MutualFundStatus::Ongoing),
        fund(4, Some("100004"), dec!(70), MutualFundStatus::Ongoing),
        fund(5, None, dec!(80), MutualFundStatus::Ongoing),
        fund(
            6,
            Some("100006"),
            dec!(90),
            MutualFundStatus::Redeemed {
                redeemed_amount: dec!(9000),
                redeemed_date: d(2024, 3, 1),
            },
        ),
    ];
    let resolver = MockResolver {
        responses: HashMap::from([
            (nav("100001"), Some(Some(dec!(42.5)))),
            (nav("100002"), Some(Some(dec!(50)))),
            (nav("100003"), None),
        ]),
        ..MockResolver::default()
    };
    let (service, resolver) = refresh_service(resolver, instruments.clone());

    let summary = service.refresh_mutual_fund_navs(d(2024, 6, 1)).await.unwrap();

    assert_eq!(summary.attempted, 4);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.skipped, 1);
    assert!(!summary.cancelled);
    assert_eq!(summary.summary(), "updated 1 of 4");

    let failed_ids: Vec<i64> = summary.failures.iter().map(|f| f.instrument_id).collect();
    assert_eq!(failed_ids, vec![3, 4]);
    assert!(summary
        .failures
        .iter()
        .all(|f| f.class == InstrumentClass::MutualFund));

    let funds = instruments.funds.lock().unwrap();
    assert_eq!(funds[0].current_nav, dec!(42.5));
    assert_eq!(funds[0].last_nav_date, Some(d(2024, 6, 1)));
    // Failed lookups keep the last known NAV.
    assert_eq!(funds[2].current_nav, dec!(60));
    // Redeemed funds are never looked up.
    assert!(!resolver.lookups.lock().unwrap().contains(&nav("100006")));
}

#[tokio::test]
async fn test_tradable_refresh_skips_custom_and_sold() {
    let instruments = Arc::new(MockInstruments::default());
    *instruments.positions.lock().unwrap() = vec![
        position(1, Market::IndianEquity, "RELIANCE", dec!(2400), TradableStatus::Holding),
        position(2, Market::Crypto, "Bitcoin", dec!(60000), TradableStatus::Holding),
        position(3, Market::Custom, "PLOT", dec!(500000), TradableStatus::Holding),
        position(
            4,
            Market::UsEquity,
            "AAPL",
            dec!(150),
            TradableStatus::Sold {
                sell_price: dec!(150),
                sell_date: d(2024, 2, 1),
            },
        ),
    ];
    let resolver = MockResolver {
        responses: HashMap::from([
            (
                PriceSource::IndianEquity("RELIANCE".to_string()),
                Some(Some(dec!(2450.5))),
            ),
            (
                PriceSource::Crypto("bitcoin".to_string()),
                Some(Some(dec!(61000))),
            ),
        ]),
        ..MockResolver::default()
    };
    let (service, resolver) = refresh_service(resolver, instruments.clone());

    let summary = service.refresh_tradable_prices().await.unwrap();

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(resolver.lookups.lock().unwrap().len(), 2);
    assert_eq!(
        instruments.positions.lock().unwrap()[1].current_price,
        dec!(61000)
    );
}

#[tokio::test]
async fn test_cancellation_stops_before_next_instrument() {
    let instruments = Arc::new(MockInstruments::default());
    *instruments.funds.lock().unwrap() = vec![
        fund(1, Some("1"), dec!(10), MutualFundStatus::Ongoing),
        fund(2, Some("2"), dec!(10), MutualFundStatus::Ongoing),
        fund(3, Some("3"), dec!(10), MutualFundStatus::Ongoing),
    ];
    let flag = Arc::new(AtomicBool::new(false));
    let resolver = Arc::new(MockResolver {
        responses: HashMap::from([
            (nav("1"), Some(Some(dec!(11)))),
            (nav("2"), Some(Some(dec!(12)))),
            (nav("3"), Some(Some(dec!(13)))),
        ]),
        cancel_after_first: Some(flag.clone()),
        ..MockResolver::default()
    });
    let service = PriceRefreshService::new(
        resolver.clone(),
        instruments.clone(),
        instruments.clone(),
        Arc::new(StaticSettings),
    )
    .with_cancellation_flag(flag);

    let summary = service.refresh_mutual_fund_navs(d(2024, 6, 1)).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(resolver.lookups.lock().unwrap().len(), 1);
    // The applied update survives the cancellation.
    assert_eq!(instruments.funds.lock().unwrap()[0].current_nav, dec!(11));
    assert_eq!(instruments.funds.lock().unwrap()[1].current_nav, dec!(10));
}

#[tokio::test]
async fn test_refresh_all_merges_both_passes() {
    let instruments = Arc::new(MockInstruments::default());
    *instruments.funds.lock().unwrap() =
        vec![fund(1, Some("1"), dec!(10), MutualFundStatus::Ongoing)];
    *instruments.positions.lock().unwrap() = vec![position(
        1,
        Market::UsEquity,
        "MSFT",
        dec!(400),
        TradableStatus::Holding,
    )];
    let resolver = MockResolver {
        responses: HashMap::from([
            (nav("1"), Some(Some(dec!(10.5)))),
            (PriceSource::UsEquity("MSFT".to_string()), Some(Some(dec!(400)))),
        ]),
        ..MockResolver::default()
    };
    let (service, _) = refresh_service(resolver, instruments);

    let summary = service.refresh_all(d(2024, 6, 1)).await.unwrap();
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.summary(), "updated 1 of 2");
}

#[test]
fn test_price_source_for_position() {
    let mut p = position(1, Market::Crypto, "BTC", dec!(1), TradableStatus::Holding);
    p.lookup_id = Some("Bitcoin".to_string());
    assert_eq!(
        PriceSource::for_position(&p),
        Some(PriceSource::Crypto("bitcoin".to_string()))
    );

    let custom = position(2, Market::Custom, "ART", dec!(1), TradableStatus::Holding);
    assert_eq!(PriceSource::for_position(&custom), None);
    assert_eq!(PriceSource::IndianEquity("TCS".into()).to_string(), "NSE:TCS");
}
