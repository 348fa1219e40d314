//! 증권 분류 캐시.
//!
//! ISIN으로 증권을 검색해 주식/ETF(누적형 여부)로 분류하고 결과를 보관합니다.
//! ETF 분류에는 상세 페이지 요청이 한 번 더 필요하므로, 한 번 분류된 식별자는
//! 다시 조회하지 않습니다. 실패한 조회는 캐시하지 않습니다.

use refdata_core::{SearchConfig, Security};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::http::HttpFetch;
use crate::provider::classifier::{AccumulationClassifier, DividendYieldMarker};
use crate::provider::investing::{InvestingSearchClient, PairType};

/// 식별자 → 증권 분류 캐시를 가진 리졸버.
#[derive(Clone)]
pub struct SecurityResolver {
    client: InvestingSearchClient,
    classifier: Arc<dyn AccumulationClassifier>,
    /// 식별자 -> Security (한 번 기록되면 변경되지 않음)
    cache: Arc<RwLock<HashMap<String, Security>>>,
}

impl SecurityResolver {
    /// 기본 분류기(`DividendYieldMarker`)를 사용하는 리졸버 생성.
    pub fn new(fetcher: Arc<dyn HttpFetch>, config: &SearchConfig) -> Self {
        Self {
            client: InvestingSearchClient::new(fetcher, config),
            classifier: Arc::new(DividendYieldMarker),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 누적형 판별 분류기 교체.
    pub fn with_classifier(mut self, classifier: impl AccumulationClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// 캐시 크기 조회.
    pub async fn cache_size(&self) -> usize {
        self.cache.read().await.len()
    }

    /// 캐시된 분류 결과 조회 (네트워크 요청 없음).
    pub async fn cached(&self, identifier: &str) -> Option<Security> {
        self.cache.read().await.get(identifier).copied()
    }

    /// 식별자의 증권 분류를 반환합니다.
    ///
    /// 캐시에 있으면 네트워크 요청 없이 바로 반환합니다.
    /// 식별자 형식은 검증하지 않고 그대로 검색합니다.
    ///
    /// # Errors
    /// - `NotFound`: 검색 결과 없음
    /// - `Transport`: 검색 또는 상세 페이지 요청의 HTTP 오류
    /// - `UnrecognizedKind`: `equities`/`etf` 이외의 상품 유형
    pub async fn resolve_security(&self, identifier: &str) -> Result<Security> {
        if let Some(security) = self.cached(identifier).await {
            debug!("증권 캐시 적중: {} -> {}", identifier, security);
            return Ok(security);
        }

        let security = self.classify(identifier).await?;

        // 동시에 같은 식별자를 조회한 경우 먼저 기록된 값을 유지
        let stored = *self
            .cache
            .write()
            .await
            .entry(identifier.to_string())
            .or_insert(security);

        info!("증권 분류 완료: {} -> {}", identifier, stored);
        Ok(stored)
    }

    /// 여러 식별자를 순서대로 조회합니다.
    ///
    /// 하나가 실패해도 나머지는 계속 조회하며, 결과는 입력 순서를 따릅니다.
    pub async fn resolve_many<I, S>(&self, identifiers: I) -> Vec<(String, Result<Security>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = Vec::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            let result = self.resolve_security(identifier).await;
            results.push((identifier.to_string(), result));
        }
        results
    }

    /// 검색 결과의 `pair_type`으로 분류 (캐시 미사용).
    async fn classify(&self, identifier: &str) -> Result<Security> {
        let quote = self.client.search_first(identifier).await?;

        match quote.pair_type(identifier)? {
            PairType::Equities => Ok(Security::Stock),
            PairType::Etf => {
                let link = quote.link(identifier)?;
                let html = self.client.fetch_detail_page(link).await?;
                let accumulating = self.classifier.is_accumulating(&html);
                Ok(Security::Etf { accumulating })
            }
            PairType::Other(kind) => Err(DataError::UnrecognizedKind {
                identifier: identifier.to_string(),
                kind,
            }),
        }
    }
}
