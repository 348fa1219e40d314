//! HTTP 요청 추상화.
//!
//! Provider들은 `HttpFetch` trait을 통해서만 네트워크에 접근합니다.
//! 운영 환경에서는 `ReqwestFetcher`를, 테스트에서는 목(mock) 구현을 주입합니다.

use async_trait::async_trait;
use refdata_core::HttpConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DataError, Result};

/// HTTP 메서드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP 요청 명세.
///
/// 쿼리 문자열과 폼 본문은 전송 시점에 URL 인코딩됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` 본문 (POST)
    pub form: Option<Vec<(String, String)>>,
}

impl HttpRequest {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            form: None,
        }
    }

    /// GET 요청 생성.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// POST 요청 생성.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// 헤더 추가.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 쿼리 파라미터 추가.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// 폼 필드 추가.
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    /// 헤더 값 조회 (대소문자 무시).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP 응답.
///
/// 상태 코드와 본문 텍스트만 보관하며, 성공 여부 판단은 호출자가 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// 2xx 여부.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn into_text(self) -> String {
        self.body
    }

    /// 본문을 JSON으로 역직렬화.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.trim().is_empty() {
            return Err(DataError::Parse("empty response body".to_string()));
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// 성공 응답이 아니면 `Transport` 에러로 변환.
    pub fn error_for_status(self, endpoint: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(DataError::Transport {
                endpoint: endpoint.to_string(),
                status: self.status,
            })
        }
    }
}

/// HTTP 요청 수행자.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// 요청을 보내고 응답을 반환합니다.
    ///
    /// 상태 코드와 무관하게 응답을 받았다면 `Ok`를 반환합니다.
    /// 연결 실패, 타임아웃 등은 `DataError::Request`입니다.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// reqwest 기반 `HttpFetch` 구현.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// 설정의 타임아웃과 User-Agent로 클라이언트를 생성합니다.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DataError::InvalidInput(format!("HTTP client build failed: {}", e)))?;

        Ok(Self { client })
    }

    /// 이미 구성된 클라이언트 사용.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let endpoint = request.url.clone();
        let request_error = |e: reqwest::Error| DataError::Request {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        };

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        debug!(method = ?request.method, url = %request.url, "HTTP 요청");

        let response = builder.send().await.map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(request_error)?;

        debug!(url = %request.url, status, bytes = body.len(), "HTTP 응답 수신");
        Ok(HttpResponse::new(status, body))
    }
}
