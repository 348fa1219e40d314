//! # Refdata Core
//!
//! 환율 및 증권 참조 데이터 조회에서 공통으로 사용하는 타입과 인프라를 제공합니다:
//! - 통화 코드 및 증권 분류 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod logging;
pub mod types;

pub use config::*;
pub use logging::*;
pub use types::*;
