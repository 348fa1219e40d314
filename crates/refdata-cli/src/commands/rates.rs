//! ECB 환율 조회 명령어.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use refdata_core::{lookup_span, CurrencyCode};
use refdata_data::{ExchangeRateCache, ExchangeRateSeries};
use serde::Serialize;
use tracing::Instrument;

use super::output::{write_output, OutputFormat};

/// 환율 조회 설정.
#[derive(Debug)]
pub struct RatesConfig {
    /// 호가 통화 (EUR 기준)
    pub currency: CurrencyCode,
    /// 시작 날짜
    pub start: NaiveDate,
    /// 종료 날짜
    pub end: NaiveDate,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 날짜 문자열 파싱 (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

#[derive(Debug, Serialize)]
struct RateRow {
    date: String,
    rate: f64,
}

/// 환율을 조회해 캐시에 넣고 출력합니다.
pub async fn fetch_rates(cache: &ExchangeRateCache, config: RatesConfig) -> Result<usize> {
    let span = lookup_span!("fetch_rates", config.currency, config.start, config.end);

    let count = cache
        .ensure_exchange_rates(config.start, config.end, config.currency)
        .instrument(span)
        .await
        .with_context(|| {
            format!(
                "Failed to fetch EUR/{} rates ({} ~ {})",
                config.currency, config.start, config.end
            )
        })?;

    let series = cache.series(config.currency).await.unwrap_or_default();
    let in_range: ExchangeRateSeries = series
        .range(config.start..=config.end)
        .map(|(d, r)| (*d, *r))
        .collect();

    let content = match config.format {
        OutputFormat::Table => format_table(config.currency, &in_range),
        OutputFormat::Csv => format_csv(&in_range),
        OutputFormat::Json => format_json(&in_range)?,
    };
    write_output(&content, config.output.as_deref())?;

    Ok(count)
}

/// 테이블 형식 출력.
fn format_table(currency: CurrencyCode, series: &ExchangeRateSeries) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:<12} {:>14}\n", "DATE", format!("EUR/{}", currency)));
    output.push_str(&"-".repeat(27));
    output.push('\n');

    for (date, rate) in series {
        output.push_str(&format!("{:<12} {:>14.4}\n", date, rate));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} days", series.len()));
    output
}

/// CSV 형식 출력.
fn format_csv(series: &ExchangeRateSeries) -> String {
    let mut output = String::from("date,rate\n");
    for (date, rate) in series {
        output.push_str(&format!("{},{}\n", date, rate));
    }
    output
}

/// JSON 형식 출력.
fn format_json(series: &ExchangeRateSeries) -> Result<String> {
    let rows: Vec<RateRow> = series
        .iter()
        .map(|(date, rate)| RateRow {
            date: date.to_string(),
            rate: *rate,
        })
        .collect();
    serde_json::to_string_pretty(&rows).context("Failed to serialize to JSON")
}
