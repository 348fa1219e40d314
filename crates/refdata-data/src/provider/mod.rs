//! 데이터 Provider 모듈.
//!
//! ## ECB
//! - `EcbRatesClient`: SDMX REST API에서 EUR 기준 일별 환율 조회
//!
//! ## investing.com
//! - `InvestingSearchClient`: ISIN 검색 및 ETF 상세 페이지 조회
//! - `DividendYieldMarker`: 상세 페이지로 누적형 ETF 판별

pub mod classifier;
pub mod ecb;
pub mod investing;

pub use classifier::{AccumulationClassifier, DividendYieldMarker};
pub use ecb::{DailyRate, EcbDataMessage, EcbRatesClient};
pub use investing::{InvestingSearchClient, PairType, SearchQuote, SearchResponse};
