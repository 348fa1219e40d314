//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - ECB 환율 조회 및 출력 (table / csv / json)
//! - ISIN 기반 증권 분류 조회

pub mod commands;
