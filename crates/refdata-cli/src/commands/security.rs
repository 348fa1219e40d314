//! 증권 분류 조회 명령어.

use anyhow::{Context, Result};
use refdata_core::{lookup_span, Security};
use refdata_data::SecurityResolver;
use serde::Serialize;
use tracing::{warn, Instrument};

use super::output::{escape_csv, write_output, OutputFormat};

/// 증권 조회 설정.
#[derive(Debug)]
pub struct SecurityConfig {
    /// 조회할 식별자(ISIN) 목록
    pub identifiers: Vec<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 조회 결과 한 줄.
#[derive(Debug, Serialize)]
struct SecurityRow {
    identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    security: Option<Security>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// 식별자들을 순서대로 분류하고 출력합니다.
///
/// 일부가 실패해도 나머지 결과는 출력하며, 성공한 건수를 반환합니다.
pub async fn resolve_securities(resolver: &SecurityResolver, config: SecurityConfig) -> Result<usize> {
    let span = lookup_span!("resolve_securities", config.identifiers.join(","));
    let results = resolver
        .resolve_many(&config.identifiers)
        .instrument(span)
        .await;

    let rows: Vec<SecurityRow> = results
        .into_iter()
        .map(|(identifier, result)| match result {
            Ok(security) => SecurityRow {
                identifier,
                security: Some(security),
                error: None,
            },
            Err(e) => {
                warn!("증권 분류 실패: {} ({})", identifier, e);
                SecurityRow {
                    identifier,
                    security: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    let content = match config.format {
        OutputFormat::Table => format_table(&rows),
        OutputFormat::Csv => format_csv(&rows),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&rows).context("Failed to serialize to JSON")?
        }
    };
    write_output(&content, config.output.as_deref())?;

    Ok(rows.iter().filter(|r| r.security.is_some()).count())
}

fn security_columns(security: Option<&Security>) -> (&'static str, &'static str) {
    match security {
        Some(Security::Stock) => ("Stock", "-"),
        Some(Security::Etf { accumulating: true }) => ("ETF", "yes"),
        Some(Security::Etf { accumulating: false }) => ("ETF", "no"),
        None => ("-", "-"),
    }
}

/// 테이블 형식 출력.
fn format_table(rows: &[SecurityRow]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<14} {:<8} {:<13} {}\n",
        "IDENTIFIER", "TYPE", "ACCUMULATING", "ERROR"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for row in rows {
        let (kind, accumulating) = security_columns(row.security.as_ref());
        output.push_str(&format!(
            "{:<14} {:<8} {:<13} {}\n",
            row.identifier,
            kind,
            accumulating,
            row.error.as_deref().unwrap_or("")
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} securities", rows.len()));
    output
}

/// CSV 형식 출력.
fn format_csv(rows: &[SecurityRow]) -> String {
    let mut output = String::from("identifier,type,accumulating,error\n");

    for row in rows {
        let (kind, accumulating) = security_columns(row.security.as_ref());
        output.push_str(&format!(
            "{},{},{},{}\n",
            escape_csv(&row.identifier),
            kind,
            accumulating,
            escape_csv(row.error.as_deref().unwrap_or(""))
        ));
    }

    output
}
