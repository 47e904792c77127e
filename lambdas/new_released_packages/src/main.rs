use chrono::Utc;
use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, RequestExt, Response};
use release_core::{new_releases, Config, DynamoIndex, IndexSource};

/// Layers released after last Sunday for the `region` path parameter.
/// Errors are returned to the runtime as invocation failures.
async fn function_handler<S>(source: &S, config: &Config, event: Request) -> Result<Response<Body>, Error>
where
    S: IndexSource + ?Sized,
{
    let params = event.path_parameters();
    let region = params
        .first("region")
        .filter(|r| !r.is_empty())
        .unwrap_or(config.default_region.as_str());

    let releases = new_releases(source, region, Utc::now()).await?;

    let body = serde_json::to_string(&releases)?;

    Ok(Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(body.into())?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let index = DynamoIndex::connect(&config).await;
    tracing::info!(table = index.table(), "connected");

    run(service_fn(|event| function_handler(&index, &config, event))).await
}
