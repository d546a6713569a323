pub use crate::common::ApiResult;

use axum::Router;
use config::WebConfig;
use map_markers::{client::Client, database::Database};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

pub mod api;
pub mod common;
pub mod config;

#[derive(Clone)]
pub struct WebState<D>
where
    D: Database + 'static,
{
    pub marker_client: Client<D>,
}

impl<D: Database + 'static> WebState<D> {
    pub fn new(database: D) -> Self {
        Self {
            marker_client: Client::new(database),
        }
    }
}

pub fn router<D: Database + 'static>(config: &WebConfig, state: WebState<D>) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router(config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
}

pub async fn start_web_server<D: Database + 'static>(
    config: WebConfig,
    state: WebState<D>,
) -> std::io::Result<()> {
    let routes = router(&config, state);

    let listener = TcpListener::bind(config.bind_address).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router(config: &WebConfig) -> ServeDir<ServeFile> {
    ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")))
}
