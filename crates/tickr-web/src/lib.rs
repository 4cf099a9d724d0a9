use actix_web::{middleware::Logger, web, App, HttpServer};
use tickr_warehouse::TickerStore;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod api;
mod settings;

pub use settings::AppSettings;

#[derive(OpenApi)]
#[openapi(paths(api::tickers::tickers))]
pub struct ApiDoc;

/// Register the API endpoints and their documentation.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // api endpoints
        .service(api::tickers::tickers)
        // api documentation
        .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/openapi.json", ApiDoc::openapi()));
}

/// Serve the API until the process receives SIGINT/SIGTERM.
pub async fn serve(store: TickerStore, settings: &AppSettings) -> std::io::Result<()> {
    info!("Serving tickers on http://{}:{}", settings.host, settings.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(store.clone()))
            .configure(configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
