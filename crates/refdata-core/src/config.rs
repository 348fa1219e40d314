//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP 클라이언트 설정
    #[serde(default)]
    pub http: HttpConfig,
    /// ECB 통계 API 설정
    #[serde(default)]
    pub ecb: EcbConfig,
    /// 증권 검색 서비스 설정
    #[serde(default)]
    pub search: SearchConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP 클라이언트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl HttpConfig {
    /// 요청 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// ECB 통계 데이터 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EcbConfig {
    /// SDMX REST 서비스 기본 URL (`/data/...` 앞부분)
    pub base_url: String,
}

impl Default for EcbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sdw-wsrest.ecb.europa.eu/service".to_string(),
        }
    }
}

/// 증권 검색 서비스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// 서비스 origin (상세 페이지 링크의 기준)
    pub origin: String,
    /// 검색 엔드포인트 경로
    pub search_path: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.investing.com".to_string(),
            search_path: "/search/service/searchTopBar".to_string(),
        }
    }
}

impl SearchConfig {
    /// 검색 엔드포인트 전체 URL.
    pub fn search_url(&self) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), self.search_path)
    }

    /// 검색 결과의 상대 링크를 origin 기준 절대 URL로 변환.
    pub fn detail_url(&self, link: &str) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), link)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();

        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("http.timeout_secs", defaults.http.timeout_secs as i64)?
            .set_default("http.user_agent", defaults.http.user_agent)?
            .set_default("ecb.base_url", defaults.ecb.base_url)?
            .set_default("search.origin", defaults.search.origin)?
            .set_default("search.search_path", defaults.search.search_path)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("REFDATA")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_urls() {
        let search = SearchConfig {
            origin: "https://example.com/".to_string(),
            search_path: "/search/service/searchTopBar".to_string(),
        };

        assert_eq!(
            search.search_url(),
            "https://example.com/search/service/searchTopBar"
        );
        assert_eq!(
            search.detail_url("/etfs/example"),
            "https://example.com/etfs/example"
        );
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();

        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.ecb.base_url, "https://sdw-wsrest.ecb.europa.eu/service");
        assert_eq!(config.search.origin, "https://www.investing.com");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("refdata-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("app.toml");
        std::fs::write(
            &path,
            "[http]\ntimeout_secs = 5\n\n[ecb]\nbase_url = \"http://localhost:1234\"\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.ecb.base_url, "http://localhost:1234");
        // 파일에 없는 섹션은 기본값 유지
        assert_eq!(config.search.search_path, "/search/service/searchTopBar");

        std::fs::remove_dir_all(&dir).ok();
    }
}
