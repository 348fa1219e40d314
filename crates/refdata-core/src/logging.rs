//! tracing 기반 로깅 초기화.
//!
//! `[logging]` 설정(레벨 필터, 출력 형식)으로 전역 subscriber를 구성합니다.
//! `RUST_LOG`가 설정되어 있으면 레벨 필터보다 우선합니다.
//!
//! 출력 형식은 `pretty`(개발용), `json`(로그 수집용), `compact`(한 줄) 세 가지입니다.

use crate::config::LoggingConfig;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// subscriber 구성 옵션.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// EnvFilter 지시어 (예: "info", "refdata_data=debug,reqwest=warn")
    pub level: String,
    pub format: LogFormat,
    /// 조회 span의 시작/종료도 기록
    pub with_span_events: bool,
    /// 파일명:줄 번호 표시
    pub with_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_span_events: false,
            with_file: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// 설정 파일의 `[logging]` 섹션에서 생성합니다.
    ///
    /// 알 수 없는 형식은 `Pretty`로 대체합니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format.parse().unwrap_or_default(),
            ..Default::default()
        }
    }

    /// 환경 변수에서 생성합니다.
    ///
    /// 레벨은 `RUST_LOG`, 형식은 `LOG_FORMAT`. 없거나 잘못된 값은 기본값을 씁니다.
    pub fn from_env() -> Self {
        Self::from_env_values(
            std::env::var("RUST_LOG").ok(),
            std::env::var("LOG_FORMAT").ok(),
        )
    }

    fn from_env_values(level: Option<String>, format: Option<String>) -> Self {
        Self {
            level: level
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            format: format
                .and_then(|f| f.parse().ok())
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.with_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_file(self.with_file)
            .with_line_number(self.with_file)
            .with_span_events(self.span_events());

        match self.format {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Json => base.json().boxed(),
            LogFormat::Compact => base.compact().boxed(),
        }
    }
}

/// 전역 로깅을 초기화합니다.
///
/// 이미 초기화된 경우 에러를 반환합니다.
///
/// ```no_run
/// use refdata_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("refdata_data=debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(env_filter)
        .try_init()?;

    tracing::debug!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}

/// 환경 변수(`RUST_LOG`, `LOG_FORMAT`)만으로 로깅을 초기화합니다.
pub fn init_logging_from_env() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogConfig::from_env())
}

/// 조회 대상이 기록된 span을 만듭니다.
///
/// 환율 조회는 기간(`start`, `end`)을 함께 기록합니다.
#[macro_export]
macro_rules! lookup_span {
    ($name:expr, $target:expr) => {
        tracing::info_span!($name, target_id = %$target)
    };
    ($name:expr, $target:expr, $start:expr, $end:expr) => {
        tracing::info_span!($name, target_id = %$target, start = %$start, end = %$end)
    };
}
