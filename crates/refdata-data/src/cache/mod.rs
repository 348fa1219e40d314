//! 캐싱 레이어.
//!
//! - 환율 캐시: ECB 일별 기준환율 (통화 → 날짜 → 환율)
//! - 증권 캐시: ISIN → 주식/ETF 분류

pub mod exchange_rate;
pub mod security;

pub use exchange_rate::{ExchangeRateCache, ExchangeRateSeries, ExchangeRatesMap};
pub use security::SecurityResolver;
