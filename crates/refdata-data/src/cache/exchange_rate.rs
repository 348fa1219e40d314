//! 환율 캐시.
//!
//! ECB에서 받은 EUR 기준 일별 환율을 통화 → 날짜 → 환율로 메모리에 보관합니다.
//!
//! - 항목은 추가/덮어쓰기만 되고 삭제되지 않습니다.
//! - 같은 (통화, 날짜)를 다시 조회하면 새 값으로 덮어씁니다.
//! - 호출마다 요청 범위 전체를 다시 가져옵니다 (캐시된 날짜를 건너뛰지 않음).
//! - 한 호출의 갱신은 모두 파싱한 뒤 한 번에 반영됩니다.

use chrono::NaiveDate;
use refdata_core::{CurrencyCode, EcbConfig};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::http::HttpFetch;
use crate::provider::ecb::EcbRatesClient;

/// 날짜순 환율 시리즈 (EUR 1단위당 호가 통화).
pub type ExchangeRateSeries = BTreeMap<NaiveDate, f64>;

/// 통화별 환율 시리즈.
pub type ExchangeRatesMap = HashMap<CurrencyCode, ExchangeRateSeries>;

/// ECB 환율 캐시.
#[derive(Clone)]
pub struct ExchangeRateCache {
    client: EcbRatesClient,
    rates: Arc<RwLock<ExchangeRatesMap>>,
}

impl ExchangeRateCache {
    /// 빈 캐시 생성.
    pub fn new(fetcher: Arc<dyn HttpFetch>, config: &EcbConfig) -> Self {
        Self::with_client(EcbRatesClient::new(fetcher, config))
    }

    pub fn with_client(client: EcbRatesClient) -> Self {
        Self {
            client,
            rates: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 기간 내 환율이 캐시에 있도록 보장합니다.
    ///
    /// 응답의 `TIME_PERIOD` 날짜 전부를 캐시에 기록하고, 기록한 날짜 수를 반환합니다.
    /// 실패하면 캐시는 변경되지 않습니다.
    ///
    /// # Errors
    /// - `InvalidInput`: `start > end` 또는 기준 통화(EUR) 요청
    /// - `Transport`: 성공이 아닌 HTTP 상태
    /// - `Parse`: JSON 본문이 아님
    /// - `DataShape`: `TIME_PERIOD` 차원 또는 관측값 누락
    pub async fn ensure_exchange_rates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: CurrencyCode,
    ) -> Result<usize> {
        if start > end {
            return Err(DataError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        if currency.is_base() {
            return Err(DataError::InvalidInput(format!(
                "{} is the base currency and has no ECB series",
                currency
            )));
        }

        let fetched = self.client.fetch_daily_rates(start, end, currency).await?;
        let count = fetched.len();
        if count == 0 {
            warn!("ECB 응답에 관측 기간 없음: EUR/{} ({} ~ {})", currency, start, end);
            return Ok(0);
        }

        {
            let mut rates = self.rates.write().await;
            let series = rates.entry(currency).or_default();
            for daily in fetched {
                series.insert(daily.date, daily.rate);
            }
        }

        info!(
            "환율 캐시 갱신: EUR/{} {}건 ({} ~ {})",
            currency, count, start, end
        );
        Ok(count)
    }

    /// 통화의 환율 시리즈 사본.
    pub async fn series(&self, currency: CurrencyCode) -> Option<ExchangeRateSeries> {
        self.rates.read().await.get(&currency).cloned()
    }

    /// 특정 날짜의 환율 (정확히 일치하는 날짜만).
    pub async fn rate(&self, currency: CurrencyCode, date: NaiveDate) -> Option<f64> {
        if currency.is_base() {
            return Some(1.0);
        }
        self.rates
            .read()
            .await
            .get(&currency)
            .and_then(|series| series.get(&date).copied())
    }

    /// 해당 날짜 또는 그 이전의 가장 최근 환율 (주말/공휴일 forward-fill).
    pub async fn rate_on_or_before(
        &self,
        currency: CurrencyCode,
        date: NaiveDate,
    ) -> Option<(NaiveDate, f64)> {
        if currency.is_base() {
            return Some((date, 1.0));
        }
        let rates = self.rates.read().await;
        let found = rates
            .get(&currency)
            .and_then(|series| series.range(..=date).next_back())
            .map(|(d, r)| (*d, *r));

        if let Some((found_date, _)) = found {
            if found_date != date {
                debug!("{} {} 환율 없음, {} 환율 사용", currency, date, found_date);
            }
        }
        found
    }

    /// 금액을 `from` 통화에서 `to` 통화로 환산합니다 (EUR 경유).
    ///
    /// 캐시된 환율만 사용하며 네트워크 요청은 하지 않습니다.
    pub async fn convert(
        &self,
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
        date: NaiveDate,
    ) -> Result<f64> {
        if from == to {
            return Ok(amount);
        }

        let (_, from_rate) = self.rate_on_or_before(from, date).await.ok_or_else(|| {
            DataError::NotFound(format!("No exchange rate for EUR/{} on or before {}", from, date))
        })?;
        let (_, to_rate) = self.rate_on_or_before(to, date).await.ok_or_else(|| {
            DataError::NotFound(format!("No exchange rate for EUR/{} on or before {}", to, date))
        })?;

        Ok(amount / from_rate * to_rate)
    }

    /// 전체 캐시 사본.
    pub async fn snapshot(&self) -> ExchangeRatesMap {
        self.rates.read().await.clone()
    }

    /// 캐시된 통화 수.
    pub async fn currency_count(&self) -> usize {
        self.rates.read().await.len()
    }
}
