//! 증권 분류 타입.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 식별자(ISIN)로 조회한 증권 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Security {
    /// 주식
    Stock,
    /// 상장지수펀드
    #[serde(rename = "ETF")]
    Etf {
        /// 배당을 분배하지 않고 재투자하는 펀드 여부
        accumulating: bool,
    },
}

impl Security {
    /// ETF 여부.
    pub fn is_etf(&self) -> bool {
        matches!(self, Self::Etf { .. })
    }

    /// 누적형(재투자) ETF 여부. 주식은 항상 `false`.
    pub fn is_accumulating(&self) -> bool {
        matches!(self, Self::Etf { accumulating: true })
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock => write!(f, "Stock"),
            Self::Etf { accumulating: true } => write!(f, "ETF (accumulating)"),
            Self::Etf { accumulating: false } => write!(f, "ETF (distributing)"),
        }
    }
}
