//! investing.com 증권 검색 Provider.
//!
//! 상단 검색바 API(`searchTopBar`)로 ISIN을 검색하고,
//! ETF는 상세 페이지 HTML을 추가로 가져옵니다.

use refdata_core::SearchConfig;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{DataError, Result};
use crate::http::{HttpFetch, HttpRequest};

/// 검색 응답.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub quotes: Option<Vec<SearchQuote>>,
}

/// 검색 결과 항목.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)] // API 응답 전체 필드 매핑 (일부만 사용)
pub struct SearchQuote {
    #[serde(default)]
    pub pair_type: Option<String>,
    /// 상세 페이지 상대 경로 (예: "/etfs/ishares-core-msci-world")
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
}

/// 검색 결과의 상품 유형 (`pair_type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairType {
    /// 주식
    Equities,
    /// ETF
    Etf,
    /// 그 외 (지수, 채권, 펀드 등)
    Other(String),
}

impl PairType {
    pub fn parse(s: &str) -> Self {
        match s {
            "equities" => Self::Equities,
            "etf" => Self::Etf,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equities => write!(f, "equities"),
            Self::Etf => write!(f, "etf"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

impl SearchQuote {
    /// 상품 유형. `pair_type` 필드가 없으면 `DataShape` 에러.
    pub fn pair_type(&self, identifier: &str) -> Result<PairType> {
        self.pair_type
            .as_deref()
            .map(PairType::parse)
            .ok_or_else(|| {
                DataError::DataShape(format!("search result for {} has no pair_type", identifier))
            })
    }

    /// 상세 페이지 링크. 없으면 `DataShape` 에러.
    pub fn link(&self, identifier: &str) -> Result<&str> {
        self.link
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                DataError::DataShape(format!("search result for {} has no link", identifier))
            })
    }
}

/// investing.com 검색 클라이언트.
#[derive(Clone)]
pub struct InvestingSearchClient {
    fetcher: Arc<dyn HttpFetch>,
    config: SearchConfig,
}

impl InvestingSearchClient {
    pub fn new(fetcher: Arc<dyn HttpFetch>, config: &SearchConfig) -> Self {
        Self {
            fetcher,
            config: config.clone(),
        }
    }

    /// 검색 요청 생성.
    pub fn build_search_request(&self, identifier: &str) -> HttpRequest {
        HttpRequest::post(self.config.search_url())
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .form_field("search_text", identifier)
    }

    /// 식별자로 검색하여 첫 번째 결과를 반환합니다.
    ///
    /// 결과가 없으면 `NotFound` 에러.
    pub async fn search_first(&self, identifier: &str) -> Result<SearchQuote> {
        let request = self.build_search_request(identifier);
        let endpoint = request.url.clone();

        debug!("증권 검색: {}", identifier);

        let response = self.fetcher.send(request).await?;
        if !response.is_success() {
            warn!(
                status = response.status(),
                "검색 응답 오류: {}", identifier
            );
        }
        let response = response.error_for_status(&endpoint)?;

        let result: SearchResponse = response.json()?;
        result.quotes.unwrap_or_default().into_iter().next().ok_or_else(|| {
            DataError::NotFound(format!("could not find security for ISIN {}", identifier))
        })
    }

    /// 검색 결과 링크의 상세 페이지 HTML을 가져옵니다.
    pub async fn fetch_detail_page(&self, link: &str) -> Result<String> {
        let url = self.config.detail_url(link);

        debug!("상세 페이지 조회: {}", url);

        let response = self.fetcher.send(HttpRequest::get(url.as_str())).await?;
        let response = response.error_for_status(&url)?;
        Ok(response.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockFetcher;
    use crate::http::HttpMethod;

    fn test_config() -> SearchConfig {
        SearchConfig {
            origin: "https://search.example".to_string(),
            search_path: "/search/service/searchTopBar".to_string(),
        }
    }

    #[test]
    fn test_pair_type_parse() {
        assert_eq!(PairType::parse("equities"), PairType::Equities);
        assert_eq!(PairType::parse("etf"), PairType::Etf);
        assert_eq!(PairType::parse("indice"), PairType::Other("indice".to_string()));
        assert_eq!(PairType::parse("ETF").to_string(), "ETF");
    }

    #[test]
    fn test_build_search_request() {
        let client = InvestingSearchClient::new(Arc::new(MockFetcher::new()), &test_config());
        let request = client.build_search_request("IE00B4L5Y983");

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://search.example/search/service/searchTopBar");
        assert_eq!(request.header_value("X-Requested-With"), Some("XMLHttpRequest"));
        assert_eq!(
            request.header_value("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.form,
            Some(vec![("search_text".to_string(), "IE00B4L5Y983".to_string())])
        );
    }

    #[tokio::test]
    async fn test_search_first_takes_first_quote() {
        let fetcher = Arc::new(MockFetcher::new().respond(
            200,
            r#"{"quotes":[{"pair_type":"etf","link":"/etfs/first"},{"pair_type":"equities","link":"/equities/second"}]}"#,
        ));
        let client = InvestingSearchClient::new(fetcher, &test_config());

        let quote = client.search_first("IE00B4L5Y983").await.unwrap();
        assert_eq!(quote.pair_type("IE00B4L5Y983").unwrap(), PairType::Etf);
        assert_eq!(quote.link("IE00B4L5Y983").unwrap(), "/etfs/first");
    }

    #[tokio::test]
    async fn test_search_without_quotes_is_not_found() {
        for body in [r#"{"quotes":[]}"#, r#"{"total":0}"#, r#"{"quotes":null}"#] {
            let fetcher = Arc::new(MockFetcher::new().respond(200, body));
            let client = InvestingSearchClient::new(fetcher, &test_config());

            let err = client.search_first("XX0000000000").await.unwrap_err();
            assert!(matches!(err, DataError::NotFound(msg) if msg.contains("XX0000000000")));
        }
    }

    #[tokio::test]
    async fn test_detail_page_uses_origin() {
        let fetcher = Arc::new(MockFetcher::new().respond(200, "<html></html>"));
        let client = InvestingSearchClient::new(fetcher.clone(), &test_config());

        let html = client.fetch_detail_page("/etfs/example").await.unwrap();
        assert_eq!(html, "<html></html>");
        assert_eq!(fetcher.requests()[0].url, "https://search.example/etfs/example");
        assert_eq!(fetcher.requests()[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_detail_page_transport_error() {
        let fetcher = Arc::new(MockFetcher::new().respond(404, "not found"));
        let client = InvestingSearchClient::new(fetcher, &test_config());

        let err = client.fetch_detail_page("/etfs/gone").await.unwrap_err();
        assert!(matches!(err, DataError::Transport { status: 404, .. }));
    }

    #[test]
    fn test_missing_fields_are_data_shape_errors() {
        let quote: SearchQuote = serde_json::from_str(r#"{"symbol":"IWDA"}"#).unwrap();
        assert!(matches!(quote.pair_type("IE00B4L5Y983"), Err(DataError::DataShape(_))));
        assert!(matches!(quote.link("IE00B4L5Y983"), Err(DataError::DataShape(_))));
    }
}
