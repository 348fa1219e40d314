//! 참조 데이터 조회 및 캐싱.
//!
//! 이 crate는 다음을 제공합니다:
//! - ECB 일별 환율 조회 및 통화별 환율 캐시
//! - ISIN 기반 증권 분류(주식/ETF) 및 분류 캐시
//! - 교체 가능한 HTTP 요청 추상화 (`HttpFetch`)

pub mod cache;
pub mod error;
pub mod http;
pub mod provider;

pub use error::{DataError, Result};

pub use cache::{ExchangeRateCache, ExchangeRateSeries, ExchangeRatesMap, SecurityResolver};
pub use http::{HttpFetch, HttpMethod, HttpRequest, HttpResponse, ReqwestFetcher};
pub use provider::{AccumulationClassifier, DividendYieldMarker};
