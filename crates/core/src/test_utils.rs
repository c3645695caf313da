//! # 测试替身
//!
//! 供下游 crate 测试使用的内存实现，通过 `test-utils` feature 开启。

use crate::fund::entity::{FundScheme, SchemeQuote};
use crate::fund::error::UpstreamError;
use crate::fund::port::FundDataProvider;
use crate::store::error::StoreError;
use crate::store::port::{NewPurchase, PurchaseLedger, PurchaseRecord};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// 构造一个字段齐全的示例方案
pub fn sample_scheme(code: i64, name: &str, nav: f64, family: &str) -> FundScheme {
    FundScheme {
        scheme_code: code,
        isin_growth: format!("INF{code:09}"),
        isin_reinvestment: "-".to_string(),
        name: name.to_string(),
        net_asset_value: nav,
        date: "18-Oct-2026".to_string(),
        scheme_type: "Open Ended Schemes".to_string(),
        category: "Equity Scheme - Large Cap Fund".to_string(),
        fund_family: family.to_string(),
    }
}

/// # Summary
/// 可编程的上游替身：按基金代码/家族预置返回值。
///
/// # Invariants
/// - 未预置的家族返回空列表，未预置的代码返回 `NotFound`。
#[derive(Default)]
pub struct StubFundProvider {
    schemes: RwLock<Vec<FundScheme>>,
    quotes: RwLock<HashMap<String, SchemeQuote>>,
    failures: RwLock<HashMap<String, UpstreamError>>,
    families_failure: RwLock<Option<UpstreamError>>,
}

impl StubFundProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一个方案
    pub async fn insert_scheme(&self, scheme: FundScheme) {
        self.schemes.write().await.push(scheme);
    }

    /// 预置一个只含部分字段的报价，优先于已预置的方案
    pub async fn insert_quote(&self, scheme_code: &str, quote: SchemeQuote) {
        self.quotes
            .write()
            .await
            .insert(scheme_code.to_string(), quote);
    }

    /// 让指定基金代码或家族的请求失败
    pub async fn fail_with(&self, key: &str, err: UpstreamError) {
        self.failures.write().await.insert(key.to_string(), err);
    }

    /// 让家族列表请求失败
    pub async fn fail_families(&self, err: UpstreamError) {
        *self.families_failure.write().await = Some(err);
    }
}

#[async_trait]
impl FundDataProvider for StubFundProvider {
    async fn list_fund_families(&self) -> Result<BTreeSet<String>, UpstreamError> {
        if let Some(err) = self.families_failure.read().await.clone() {
            return Err(err);
        }
        Ok(self
            .schemes
            .read()
            .await
            .iter()
            .map(|s| s.fund_family.clone())
            .collect())
    }

    async fn fetch_schemes_for_family(
        &self,
        family: &str,
    ) -> Result<Vec<FundScheme>, UpstreamError> {
        if let Some(err) = self.failures.read().await.get(family) {
            return Err(err.clone());
        }
        Ok(self
            .schemes
            .read()
            .await
            .iter()
            .filter(|s| s.fund_family == family)
            .cloned()
            .collect())
    }

    async fn fetch_scheme_value(&self, scheme_code: &str) -> Result<SchemeQuote, UpstreamError> {
        if let Some(err) = self.failures.read().await.get(scheme_code) {
            return Err(err.clone());
        }
        if let Some(quote) = self.quotes.read().await.get(scheme_code) {
            return Ok(quote.clone());
        }
        self.schemes
            .read()
            .await
            .iter()
            .find(|s| s.scheme_code.to_string() == scheme_code)
            .cloned()
            .map(SchemeQuote::from)
            .ok_or_else(|| UpstreamError::NotFound(scheme_code.to_string()))
    }
}

/// # Summary
/// 基于 `Vec` 的内存账本，可切换为"存储故障"模式。
#[derive(Default)]
pub struct MemoryPurchaseLedger {
    records: RwLock<Vec<PurchaseRecord>>,
    broken: AtomicBool,
}

impl MemoryPurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开后所有操作返回 `StoreError::Database`
    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StoreError::Database("ledger unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PurchaseLedger for MemoryPurchaseLedger {
    async fn record_purchase(&self, purchase: NewPurchase) -> Result<PurchaseRecord, StoreError> {
        self.check()?;
        let mut records = self.records.write().await;
        let id = records.last().map_or(1, |r| r.id + 1);
        let record = purchase.into_record(id);
        records.push(record.clone());
        Ok(record)
    }

    async fn list_purchases(&self) -> Result<Vec<PurchaseRecord>, StoreError> {
        self.check()?;
        Ok(self.records.read().await.clone())
    }
}
