use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::debug;

use crate::index::{IndexQuery, IndexSource, Item, Page, PROJECTION};
use crate::{Config, ReleasesError};

const KEY_CONDITION: &str = "#rgn = :rgn AND #dplySts = :dplySts";
const FILTER: &str = "#crtdDt > :crtdDt";

/// `IndexSource` backed by a DynamoDB table. The client is built once and
/// reused by every invocation.
#[derive(Debug, Clone)]
pub struct DynamoIndex {
    client: Client,
    table: String,
}

impl DynamoIndex {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self { client, table: table.into() }
    }

    /// Client from the default AWS credential/region chain, pointed at
    /// `endpoint_url` when one is configured.
    pub async fn connect(config: &Config) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            debug!(endpoint = %endpoint, "using dynamodb endpoint override");
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(Client::from_conf(builder.build()), &config.table_name)
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl IndexSource for DynamoIndex {
    async fn query_page(
        &self,
        query: &IndexQuery,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page, ReleasesError> {
        let mut request = self
            .client
            .query()
            .table_name(&self.table)
            .index_name(&query.index_name)
            .key_condition_expression(KEY_CONDITION)
            .filter_expression(FILTER)
            .expression_attribute_values(":rgn", AttributeValue::S(query.region.clone()))
            .expression_attribute_values(":dplySts", AttributeValue::S(query.deploy_status.clone()))
            .expression_attribute_values(":crtdDt", AttributeValue::S(query.created_after.clone()))
            .projection_expression(projection_expression())
            .set_exclusive_start_key(exclusive_start_key);

        for name in PROJECTION.iter().chain(["dplySts"].iter()) {
            request = request.expression_attribute_names(format!("#{name}"), *name);
        }

        let output = request
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        Ok(Page {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key,
        })
    }
}

/// Placeholders for every projected attribute, so reserved words never clash.
fn projection_expression() -> String {
    PROJECTION
        .iter()
        .map(|name| format!("#{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
