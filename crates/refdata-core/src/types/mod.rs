//! 환율 및 증권 조회에서 공통으로 사용하는 타입.

mod currency;
mod security;

pub use currency::*;
pub use security::*;
