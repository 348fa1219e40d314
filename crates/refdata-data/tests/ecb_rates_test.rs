//! ECB 환율 캐시 통합 테스트
//!
//! mockito 서버로 ECB SDMX API를 흉내내어 실제 HTTP 경로(reqwest)를 검증합니다.

use chrono::NaiveDate;
use mockito::{Matcher, Server};
use refdata_core::{CurrencyCode, EcbConfig, HttpConfig};
use refdata_data::{DataError, ExchangeRateCache, ReqwestFetcher};
use std::sync::Arc;

const USD_PATH: &str = "/data/EXR/D.USD.EUR.SP00.A";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn period_query(start: &str, end: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("startPeriod".into(), start.into()),
        Matcher::UrlEncoded("endPeriod".into(), end.into()),
        Matcher::UrlEncoded("format".into(), "jsondata".into()),
        Matcher::UrlEncoded("detail".into(), "dataonly".into()),
        Matcher::UrlEncoded("dimensionAtObservation".into(), "AllDimensions".into()),
    ])
}

/// TIME_PERIOD가 마지막 차원이 아닌 ECB 응답.
fn ecb_body(points: &[(&str, f64)]) -> String {
    let values: Vec<_> = points
        .iter()
        .map(|(d, _)| serde_json::json!({ "id": d, "name": d, "start": format!("{}T00:00:00.000+01:00", d), "end": format!("{}T23:59:59.999+01:00", d) }))
        .collect();
    let observations: serde_json::Map<String, serde_json::Value> = points
        .iter()
        .enumerate()
        .map(|(i, (_, r))| (format!("0:0:0:0:0:{}", i), serde_json::json!([r])))
        .collect();

    serde_json::json!({
        "header": { "id": "test", "test": false },
        "structure": { "dimensions": { "observation": [
            { "id": "FREQ", "name": "Frequency", "values": [{ "id": "D", "name": "Daily" }] },
            { "id": "CURRENCY", "name": "Currency", "values": [{ "id": "USD", "name": "US dollar" }] },
            { "id": "TIME_PERIOD", "name": "Time period or range", "values": values },
            { "id": "EXR_SUFFIX", "name": "Series variation - EXR context", "values": [{ "id": "A", "name": "Average" }] }
        ] } },
        "dataSets": [ { "action": "Replace", "observations": observations } ]
    })
    .to_string()
}

fn cache_for(server: &Server) -> ExchangeRateCache {
    let fetcher = ReqwestFetcher::new(&HttpConfig::default()).unwrap();
    ExchangeRateCache::new(
        Arc::new(fetcher),
        &EcbConfig {
            base_url: server.url(),
        },
    )
}

#[tokio::test]
async fn test_ensure_exchange_rates_caches_every_period() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", USD_PATH)
        .match_query(period_query("2024-01-02", "2024-01-05"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ecb_body(&[
            ("2024-01-02", 1.0956),
            ("2024-01-03", 1.0919),
            ("2024-01-04", 1.0953),
            ("2024-01-05", 1.0921),
        ]))
        .expect(1)
        .create_async()
        .await;

    let cache = cache_for(&server);
    let written = cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 5), CurrencyCode::Usd)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(written, 4);

    let series = cache.series(CurrencyCode::Usd).await.unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series[&date(2024, 1, 3)], 1.0919);
    assert_eq!(series[&date(2024, 1, 5)], 1.0921);
}

#[tokio::test]
async fn test_repeated_call_refetches_and_overwrites() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", USD_PATH)
        .match_query(period_query("2024-01-02", "2024-01-03"))
        .with_status(200)
        .with_body(ecb_body(&[("2024-01-02", 1.0956), ("2024-01-03", 1.0919)]))
        .expect(1)
        .create_async()
        .await;

    let cache = cache_for(&server);
    cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 3), CurrencyCode::Usd)
        .await
        .unwrap();
    first.assert_async().await;
    first.remove_async().await;

    let second = server
        .mock("GET", USD_PATH)
        .match_query(period_query("2024-01-02", "2024-01-03"))
        .with_status(200)
        .with_body(ecb_body(&[("2024-01-02", 1.2), ("2024-01-03", 1.3)]))
        .expect(1)
        .create_async()
        .await;

    cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 3), CurrencyCode::Usd)
        .await
        .unwrap();
    second.assert_async().await;

    assert_eq!(cache.rate(CurrencyCode::Usd, date(2024, 1, 2)).await, Some(1.2));
    assert_eq!(cache.rate(CurrencyCode::Usd, date(2024, 1, 3)).await, Some(1.3));
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", USD_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .expect(1)
        .create_async()
        .await;

    let cache = cache_for(&server);
    let err = cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 3), CurrencyCode::Usd)
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        DataError::Transport { status, endpoint } => {
            assert_eq!(status, 500);
            assert!(endpoint.ends_with(USD_PATH));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(cache.series(CurrencyCode::Usd).await.is_none());
}

#[tokio::test]
async fn test_missing_time_period_dimension() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/data/EXR/D.JPY.EUR.SP00.A")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            serde_json::json!({
                "structure": { "dimensions": { "observation": [ { "id": "FREQ", "values": [] } ] } },
                "dataSets": [ { "observations": { "0:0:0:0:0:0": [160.1] } } ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let cache = cache_for(&server);
    let err = cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 3), CurrencyCode::Jpy)
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::DataShape(msg) if msg.contains("JPY")));
    assert_eq!(cache.currency_count().await, 0);
}

#[tokio::test]
async fn test_non_json_body_is_parse_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", USD_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>Service temporarily unavailable</html>")
        .create_async()
        .await;

    let cache = cache_for(&server);
    let err = cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 3), CurrencyCode::Usd)
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_request_failure() {
    let fetcher = ReqwestFetcher::new(&HttpConfig {
        timeout_secs: 2,
        ..HttpConfig::default()
    })
    .unwrap();
    let cache = ExchangeRateCache::new(
        Arc::new(fetcher),
        &EcbConfig {
            base_url: "http://127.0.0.1:9".to_string(),
        },
    );

    let err = cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 3), CurrencyCode::Usd)
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::Request { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_prebuilt_client_sends_user_agent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/data/EXR/D.CHF.EUR.SP00.A")
        .match_query(Matcher::Any)
        .match_header("user-agent", "refdata-test/1.0")
        .with_status(200)
        .with_body(ecb_body(&[("2024-01-02", 0.9293)]))
        .expect(1)
        .create_async()
        .await;

    let client = reqwest::Client::builder()
        .user_agent("refdata-test/1.0")
        .build()
        .unwrap();
    let cache = ExchangeRateCache::new(
        Arc::new(ReqwestFetcher::with_client(client)),
        &EcbConfig {
            base_url: server.url(),
        },
    );

    cache
        .ensure_exchange_rates(date(2024, 1, 2), date(2024, 1, 2), CurrencyCode::Chf)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(cache.rate(CurrencyCode::Chf, date(2024, 1, 2)).await, Some(0.9293));
}
