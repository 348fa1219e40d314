//! 참조 데이터 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # EUR/USD 일별 환율 (ECB)
//! refdata rates -c USD -f 2024-01-01 -t 2024-01-31
//!
//! # CSV로 저장
//! refdata rates -c CHF -f 2024-01-01 -t 2024-03-31 --format csv -o data/chf.csv
//!
//! # ISIN으로 주식/ETF 분류
//! refdata security IE00B4L5Y983 US0378331005
//! ```

use clap::{Parser, Subcommand};
use refdata_core::{init_logging, init_logging_from_env, AppConfig, CurrencyCode, LogConfig};
use refdata_data::{ExchangeRateCache, HttpFetch, ReqwestFetcher, SecurityResolver};
use std::sync::Arc;
use tracing::info;

mod commands;

use commands::output::OutputFormat;
use commands::rates::{fetch_rates, parse_date, RatesConfig};
use commands::security::{resolve_securities, SecurityConfig};

#[derive(Parser)]
#[command(name = "refdata")]
#[command(about = "Reference data CLI - ECB 환율 및 증권 분류 조회", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (없으면 기본값 + 환경 변수)
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ECB 일별 기준환율 조회 (EUR 기준)
    Rates {
        /// 통화 코드 (예: USD, GBP, CHF)
        #[arg(short, long)]
        currency: String,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: String,

        /// 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: String,

        /// 출력 형식 (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// ISIN으로 증권 분류 (주식 / ETF 누적형 여부)
    Security {
        /// 조회할 ISIN 목록
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            // 설정 없이도 RUST_LOG / LOG_FORMAT으로 로그는 남김
            init_logging_from_env()?;
            return Err(format!("설정 로드 실패 ({}): {}", cli.config, e).into());
        }
    };
    init_logging(LogConfig::from_settings(&config.logging))?;

    let fetcher: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(&config.http)?);

    match cli.command {
        Commands::Rates {
            currency,
            from,
            to,
            format,
            output,
        } => {
            let currency: CurrencyCode = currency.parse()?;
            let start = parse_date(&from)?;
            let end = parse_date(&to)?;

            if start > end {
                return Err("Start date must be before end date".into());
            }

            let rates_config = RatesConfig {
                currency,
                start,
                end,
                format: OutputFormat::parse(&format)?,
                output,
            };

            let cache = ExchangeRateCache::new(fetcher, &config.ecb);
            let count = fetch_rates(&cache, rates_config).await?;
            info!("✅ Fetched {} EUR/{} rates", count, currency);
        }

        Commands::Security {
            identifiers,
            format,
            output,
        } => {
            let security_config = SecurityConfig {
                identifiers,
                format: OutputFormat::parse(&format)?,
                output,
            };

            let resolver = SecurityResolver::new(fetcher, &config.search);
            let count = resolve_securities(&resolver, security_config).await?;
            info!("✅ Resolved {} securities", count);
        }
    }

    Ok(())
}
