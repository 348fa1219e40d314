//! ECB(유럽중앙은행) 통계 데이터 API Provider.
//!
//! SDMX REST API의 `EXR` 데이터플로우에서 EUR 기준 일별 기준환율을 조회합니다.
//!
//! ## 응답 구조 (`format=jsondata`, `dimensionAtObservation=AllDimensions`)
//! - `structure.dimensions.observation[]`: 관측 차원 목록. `id == "TIME_PERIOD"`인
//!   차원의 `values`가 날짜 목록이며, 차원의 위치는 고정되어 있지 않습니다.
//! - `dataSets[0].observations`: `"0:0:0:0:0:<i>"` 키로 i번째 날짜의 환율.

use chrono::NaiveDate;
use refdata_core::{CurrencyCode, EcbConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::http::{HttpFetch, HttpRequest};

/// 날짜 목록을 담은 관측 차원 ID.
const TIME_PERIOD: &str = "TIME_PERIOD";

/// ECB 날짜 형식.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// SDMX JSON 데이터 메시지.
#[derive(Debug, Deserialize)]
pub struct EcbDataMessage {
    #[serde(default)]
    pub structure: Option<EcbStructure>,
    #[serde(rename = "dataSets", default)]
    pub data_sets: Vec<EcbDataSet>,
}

#[derive(Debug, Deserialize)]
pub struct EcbStructure {
    #[serde(default)]
    pub dimensions: Option<EcbDimensions>,
}

#[derive(Debug, Deserialize)]
pub struct EcbDimensions {
    #[serde(default)]
    pub observation: Vec<EcbDimension>,
}

/// 관측 차원 (FREQ, CURRENCY, ..., TIME_PERIOD).
#[derive(Debug, Deserialize)]
pub struct EcbDimension {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub values: Vec<EcbDimensionValue>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // API 응답 전체 필드 매핑 (일부만 사용)
pub struct EcbDimensionValue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl EcbDimensionValue {
    /// 날짜 문자열 (`name` 우선, 없으면 `id`).
    fn period(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }
}

/// 데이터셋. 관측값은 숫자 또는 `[값, 속성...]` 배열로 올 수 있습니다.
#[derive(Debug, Deserialize)]
pub struct EcbDataSet {
    #[serde(default)]
    pub observations: HashMap<String, serde_json::Value>,
}

/// 하루치 환율 (EUR 1단위당 호가 통화).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRate {
    pub date: NaiveDate,
    pub rate: f64,
}

/// i번째 날짜의 관측 키.
pub fn observation_key(index: usize) -> String {
    format!("0:0:0:0:0:{}", index)
}

/// 관측값에서 환율 추출.
fn observation_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Array(items) => items.first().and_then(|v| v.as_f64()),
        other => other.as_f64(),
    }
}

impl EcbDataMessage {
    /// `TIME_PERIOD` 차원 검색.
    ///
    /// `structure`나 `dimensions`가 없는 응답도 차원 없음으로 취급합니다.
    pub fn time_periods(&self) -> Option<&[EcbDimensionValue]> {
        self.structure
            .as_ref()?
            .dimensions
            .as_ref()?
            .observation
            .iter()
            .find(|d| d.id == TIME_PERIOD)
            .map(|d| d.values.as_slice())
    }

    /// 날짜별 환율로 변환합니다.
    ///
    /// `start`, `end`, `currency`는 에러 메시지용입니다. 응답의 날짜 범위는 검증하지 않습니다.
    /// 날짜에 대응하는 관측값이 없으면 `DataShape` 에러입니다.
    pub fn into_daily_rates(
        self,
        start: &str,
        end: &str,
        currency: CurrencyCode,
    ) -> Result<Vec<DailyRate>> {
        let periods = self.time_periods().ok_or_else(|| {
            DataError::DataShape(format!(
                "could not find time periods for start date {}, end date {} and currency {}",
                start, end, currency
            ))
        })?;

        if periods.is_empty() {
            return Ok(Vec::new());
        }

        let data_set = self.data_sets.first().ok_or_else(|| {
            DataError::DataShape(format!(
                "no data set in response for {} ({} ~ {})",
                currency, start, end
            ))
        })?;

        periods
            .iter()
            .enumerate()
            .map(|(i, period)| {
                let raw = period.period().ok_or_else(|| {
                    DataError::DataShape(format!("time period #{} has no date", i))
                })?;
                let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                    DataError::DataShape(format!("invalid time period '{}': {}", raw, e))
                })?;

                let key = observation_key(i);
                let rate = data_set
                    .observations
                    .get(&key)
                    .and_then(observation_value)
                    .ok_or_else(|| {
                        DataError::DataShape(format!(
                            "missing observation {} for {} on {}",
                            key, currency, date
                        ))
                    })?;

                Ok(DailyRate { date, rate })
            })
            .collect()
    }
}

/// ECB 일별 기준환율 클라이언트.
#[derive(Clone)]
pub struct EcbRatesClient {
    fetcher: Arc<dyn HttpFetch>,
    base_url: String,
}

impl EcbRatesClient {
    pub fn new(fetcher: Arc<dyn HttpFetch>, config: &EcbConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 통화별 일별 현물 환율 시리즈 URL (`D.<CODE>.EUR.SP00.A`).
    pub fn series_url(&self, currency: CurrencyCode) -> String {
        format!(
            "{}/data/EXR/D.{}.{}.SP00.A",
            self.base_url,
            currency,
            CurrencyCode::Eur
        )
    }

    /// 기간 조회 요청 생성.
    pub fn build_request(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: CurrencyCode,
    ) -> HttpRequest {
        HttpRequest::get(self.series_url(currency))
            .query("startPeriod", start.format(DATE_FORMAT).to_string())
            .query("endPeriod", end.format(DATE_FORMAT).to_string())
            .query("format", "jsondata")
            .query("detail", "dataonly")
            .query("dimensionAtObservation", "AllDimensions")
    }

    /// 기간 내 일별 환율 조회.
    ///
    /// 요청 범위는 검증 없이 그대로 전달됩니다.
    pub async fn fetch_daily_rates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: CurrencyCode,
    ) -> Result<Vec<DailyRate>> {
        let start_period = start.format(DATE_FORMAT).to_string();
        let end_period = end.format(DATE_FORMAT).to_string();
        let request = self.build_request(start, end, currency);
        let endpoint = request.url.clone();

        debug!("ECB 환율 조회: {} ({} ~ {})", currency, start_period, end_period);

        let response = self.fetcher.send(request).await?;
        if !response.is_success() {
            warn!(
                status = response.status(),
                "ECB 응답 오류: {} ({} ~ {})", currency, start_period, end_period
            );
        }
        let response = response.error_for_status(&endpoint)?;

        let message: EcbDataMessage = response.json()?;
        let rates = message.into_daily_rates(&start_period, &end_period, currency)?;

        info!(
            "ECB 환율 수신: EUR/{} {}건 ({} ~ {})",
            currency,
            rates.len(),
            start_period,
            end_period
        );
        Ok(rates)
    }
}
