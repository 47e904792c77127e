use chrono::{DateTime, Utc};
use tracing::info;

pub mod attribute;
pub mod config;
pub mod cutoff;
pub mod dynamo;
pub mod index;
pub mod keys;
pub mod model;

pub use config::{Config, ConfigError};
pub use dynamo::DynamoIndex;
pub use index::{query_till_end, IndexQuery, IndexSource, Item, Page};
pub use model::{CreatedDate, CreatedDateError, PackageRelease};

#[cfg(any(test, feature = "mock"))]
pub use index::MockIndexSource;


#[derive(thiserror::Error, Debug)]
pub enum ReleasesError {
    #[error(transparent)]
    QueryError(#[from] aws_sdk_dynamodb::Error),
    #[error("attribute `{key}` has unsupported type {kind}")]
    UnsupportedAttribute { key: String, kind: &'static str },
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}


/// Packages released in `region` after the last Sunday before `now`
/// (releases are expected on Mondays), in index order.
pub async fn new_releases<S>(
    source: &S,
    region: &str,
    now: DateTime<Utc>,
) -> Result<Vec<PackageRelease>, ReleasesError>
where
    S: IndexSource + ?Sized,
{
    let query = IndexQuery::latest_in_region(region, cutoff::cutoff_date(now));
    let items = query_till_end(source, &query).await?;

    let releases = items
        .iter()
        .map(|item| {
            let object = keys::map_keys(attribute::item_to_json(item)?);
            Ok(serde_json::from_value(object.into())?)
        })
        .collect::<Result<Vec<PackageRelease>, ReleasesError>>()?;

    info!("{} new releases in {}", releases.len(), region);
    Ok(releases)
}
