//! 통화 코드 정의.
//!
//! ECB가 일별 기준환율을 공시하는 통화와 기준 통화(EUR)를 정의합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 4217 통화 코드.
///
/// `EUR`는 ECB 환율의 기준 통화이며, 나머지는 EUR 1단위당 호가 통화입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Eur,
    Usd,
    Jpy,
    Bgn,
    Czk,
    Dkk,
    Gbp,
    Huf,
    Pln,
    Ron,
    Sek,
    Chf,
    Isk,
    Nok,
    Try,
    Aud,
    Brl,
    Cad,
    Cny,
    Hkd,
    Idr,
    Ils,
    Inr,
    Krw,
    Mxn,
    Myr,
    Nzd,
    Php,
    Sgd,
    Thb,
    Zar,
}

impl CurrencyCode {
    /// 지원하는 모든 통화 (기준 통화 포함).
    pub const ALL: [CurrencyCode; 31] = [
        Self::Eur,
        Self::Usd,
        Self::Jpy,
        Self::Bgn,
        Self::Czk,
        Self::Dkk,
        Self::Gbp,
        Self::Huf,
        Self::Pln,
        Self::Ron,
        Self::Sek,
        Self::Chf,
        Self::Isk,
        Self::Nok,
        Self::Try,
        Self::Aud,
        Self::Brl,
        Self::Cad,
        Self::Cny,
        Self::Hkd,
        Self::Idr,
        Self::Ils,
        Self::Inr,
        Self::Krw,
        Self::Mxn,
        Self::Myr,
        Self::Nzd,
        Self::Php,
        Self::Sgd,
        Self::Thb,
        Self::Zar,
    ];

    /// ISO 코드 문자열 반환.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Jpy => "JPY",
            Self::Bgn => "BGN",
            Self::Czk => "CZK",
            Self::Dkk => "DKK",
            Self::Gbp => "GBP",
            Self::Huf => "HUF",
            Self::Pln => "PLN",
            Self::Ron => "RON",
            Self::Sek => "SEK",
            Self::Chf => "CHF",
            Self::Isk => "ISK",
            Self::Nok => "NOK",
            Self::Try => "TRY",
            Self::Aud => "AUD",
            Self::Brl => "BRL",
            Self::Cad => "CAD",
            Self::Cny => "CNY",
            Self::Hkd => "HKD",
            Self::Idr => "IDR",
            Self::Ils => "ILS",
            Self::Inr => "INR",
            Self::Krw => "KRW",
            Self::Mxn => "MXN",
            Self::Myr => "MYR",
            Self::Nzd => "NZD",
            Self::Php => "PHP",
            Self::Sgd => "SGD",
            Self::Thb => "THB",
            Self::Zar => "ZAR",
        }
    }

    /// ECB 환율의 기준 통화(EUR) 여부.
    pub fn is_base(&self) -> bool {
        matches!(self, Self::Eur)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == upper)
            .ok_or_else(|| format!("Unknown currency code: {}", s))
    }
}
