use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, response::{IntoResponse, Response}, routing::get, Extension, Json, Router};
use chrono::Utc;
use dotenvy::dotenv;
use release_core::{new_releases, Config, DynamoIndex, IndexSource, ReleasesError};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

type SharedIndex = Arc<dyn IndexSource>;

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let index: SharedIndex = Arc::new(DynamoIndex::connect(&config).await);

    let listener = tokio::net::TcpListener::bind(&config.dev_server_addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(index, Arc::new(config))).await?;

    Ok(())
}

fn router(index: SharedIndex, config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/layers/latest", get(latest_default_region))
        .route("/layers/latest/{region}", get(latest_in_region))
        .layer(cors)
        .layer(Extension(index))
        .layer(Extension(config))
}


pub struct ApiError(pub ReleasesError);

impl From<ReleasesError> for ApiError {
    fn from(err: ReleasesError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("->> {}", self.0);

        let body = Json(serde_json::json!({
            "error": self.0.to_string()
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}


async fn latest_default_region(
    Extension(index): Extension<SharedIndex>,
    Extension(config): Extension<Arc<Config>>,
) -> Result<impl IntoResponse, ApiError> {
    let releases = new_releases(index.as_ref(), &config.default_region, Utc::now()).await?;
    Ok(Json(releases))
}

async fn latest_in_region(
    Path(region): Path<String>,
    Extension(index): Extension<SharedIndex>,
) -> Result<impl IntoResponse, ApiError> {
    let releases = new_releases(index.as_ref(), &region, Utc::now()).await?;
    Ok(Json(releases))
}
