use actix_web::{get, web, HttpResponse, Responder};
use std::collections::BTreeMap;
use tickr_warehouse::{TickerSnapshot, TickerStore};
use tracing::error;

/// Latest values of every ticker, keyed by symbol
///
/// ```json
/// {
///     "BTC-USD": {
///         "price": 100.0,
///         "volume": 10.0,
///         "last_trade": 99.5
///     },
///     // ...
/// }
/// ```
#[utoipa::path(
    get,
    path = "/tickers",
    responses(
        (
            status = 200, description = "Snapshot of every stored ticker",
            body = BTreeMap<String, TickerSnapshot>, content_type = "application/json",
            example = json!({
                "BTC-USD": {
                    "price": 100.0,
                    "volume": 10.0,
                    "last_trade": 99.5
                }
            })
        ),
        (status = 500, description = "The tickers could not be read from the database")
    )
)]
#[get("/tickers")]
pub async fn tickers(store: web::Data<TickerStore>) -> impl Responder {
    match store.read_tickers().await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => {
            error!("GET /tickers failed: {e:#}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
