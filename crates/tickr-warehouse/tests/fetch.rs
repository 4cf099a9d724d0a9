use actix_web::{web, App, HttpResponse, HttpServer};
use std::time::{Duration, Instant};
use tickr_warehouse::api::Http;
use tickr_warehouse::fetch::FETCH_TIMEOUT;
use tickr_warehouse::{Fetcher, TickerRecord};

const FIXTURE: &str = include_str!("fixtures/tickers.json");

/// Serve the recorded exchange response (plus a few broken variants) on a random local port.
fn spawn_upstream() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route(
                "/tickers",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .body(FIXTURE)
                }),
            )
            .route(
                "/truncated",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .body(r#"[{"symbol": "BTC-USD", "price_24h": "#)
                }),
            )
            .route(
                "/stalled",
                web::get().to(|| async {
                    actix_web::rt::time::sleep(FETCH_TIMEOUT + Duration::from_secs(3)).await;
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .body(FIXTURE)
                }),
            )
            .route(
                "/maintenance",
                web::get().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind upstream");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

#[actix_web::test]
async fn downloads_recorded_tickers() {
    let base = spawn_upstream();
    let fetcher = Fetcher::new(format!("{base}/tickers")).unwrap();

    let tickers = fetcher.fetch().await.expect("download tickers");

    assert_eq!(tickers.len(), 3);
    assert_eq!(
        tickers[0],
        TickerRecord {
            symbol: "BTC-USD".to_string(),
            price_24h: 67012.5,
            volume_24h: 312.77018,
            last_trade_price: 67430.1,
        }
    );
    let symbols: Vec<&str> = tickers.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, ["BTC-USD", "ETH-USD", "SOL-USDT"]);
}

#[actix_web::test]
async fn non_200_names_method_url_and_status() {
    let base = spawn_upstream();
    let url = format!("{base}/maintenance");
    let fetcher = Fetcher::new(url.clone()).unwrap();

    let err = fetcher.download_tickers().await.unwrap_err();

    let message = format!("{err:#}");
    assert!(
        message.contains(&format!("GET \"{url}\": 503 Service Unavailable")),
        "{message}"
    );
    assert!(message.starts_with("download_tickers"), "{message}");
}

#[actix_web::test]
async fn malformed_body_is_a_decoding_error() {
    let base = spawn_upstream();
    let fetcher = Fetcher::new(format!("{base}/truncated")).unwrap();

    let err = fetcher.download_tickers().await.unwrap_err();

    assert!(err.to_string().contains("failed decoding tickers"));
    assert!(err.root_cause().downcast_ref::<serde_json::Error>().is_some());
}

#[actix_web::test]
async fn unreachable_upstream_is_an_error() {
    // bind and immediately release a port so nothing is listening on it
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let fetcher = Fetcher::new(format!("http://{addr}/tickers")).unwrap();

    assert!(fetcher.download_tickers().await.is_err());
}

#[actix_web::test]
async fn stalled_upstream_gives_up_after_the_client_timeout() {
    let base = spawn_upstream();
    let fetcher = Fetcher::new(format!("{base}/stalled")).unwrap();
    let start = Instant::now();

    let err = fetcher.download_tickers().await.unwrap_err();

    let elapsed = start.elapsed();
    assert!(elapsed >= FETCH_TIMEOUT, "gave up early: {elapsed:?}");
    assert!(elapsed < FETCH_TIMEOUT + Duration::from_secs(1), "waited too long: {elapsed:?}");
    assert!(
        err.chain()
            .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
            .any(|e| e.is_timeout()),
        "{err:#}"
    );
}
