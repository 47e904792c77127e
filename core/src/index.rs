//! Secondary index query and the loop that drains its pages.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use crate::ReleasesError;

/// A stored item, keyed by storage attribute name.
pub type Item = HashMap<String, AttributeValue>;

pub const DEPLOYED_IN_REGION_INDEX: &str = "deployed_in_region";
pub const LATEST: &str = "latest";

/// Attributes returned for each record.
pub const PROJECTION: [&str; 5] = ["crtdDt", "pckg", "arn", "rgn", "pckgVrsn"];

/// Equality on the index keys plus a strict lower bound on the creation date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub index_name: String,
    pub region: String,
    pub deploy_status: String,
    /// Exclusive lower bound on `crtdDt`, `YYYY-MM-DD`.
    pub created_after: String,
}

impl IndexQuery {
    pub fn latest_in_region(region: impl Into<String>, created_after: impl Into<String>) -> Self {
        Self {
            index_name: DEPLOYED_IN_REGION_INDEX.to_string(),
            region: region.into(),
            deploy_status: LATEST.to_string(),
            created_after: created_after.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    /// Pagination token; absent or empty once the index is exhausted.
    pub last_evaluated_key: Option<Item>,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Fetch one page, starting after `exclusive_start_key` when given.
    async fn query_page(
        &self,
        query: &IndexQuery,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page, ReleasesError>;
}

/// Follow pagination tokens until exhausted, returning every item in the
/// order the index produced them. Errors from any page abort the whole query.
pub async fn query_till_end<S>(source: &S, query: &IndexQuery) -> Result<Vec<Item>, ReleasesError>
where
    S: IndexSource + ?Sized,
{
    let mut items = Vec::new();
    let mut start_key = None;
    let mut pages = 0usize;

    loop {
        let page = source.query_page(query, start_key.take()).await?;
        pages += 1;
        debug!(page = pages, count = page.items.len(), "fetched index page");
        items.extend(page.items);

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn item(id: &str) -> Item {
        Item::from([("pckg".to_string(), AttributeValue::S(id.to_string()))])
    }

    fn token(id: &str) -> Option<Item> {
        Some(item(id))
    }

    fn query() -> IndexQuery {
        IndexQuery::latest_in_region("us-east-1", "2024-05-12")
    }

    #[test]
    fn latest_in_region_targets_the_region_index() {
        let q = query();
        assert_eq!(q.index_name, "deployed_in_region");
        assert_eq!(q.deploy_status, "latest");
        assert_eq!(q.region, "us-east-1");
        assert_eq!(q.created_after, "2024-05-12");
    }

    #[tokio::test]
    async fn drains_three_pages_in_order() {
        let mut source = MockIndexSource::new();
        let mut seq = Sequence::new();

        source
            .expect_query_page()
            .withf(|_, start| start.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Page { items: vec![item("a"), item("b")], last_evaluated_key: token("b") }));
        source
            .expect_query_page()
            .withf(|_, start| start == &token("b"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Page { items: vec![item("c")], last_evaluated_key: token("c") }));
        source
            .expect_query_page()
            .withf(|_, start| start == &token("c"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Page { items: vec![item("d"), item("e")], last_evaluated_key: None }));

        let items = query_till_end(&source, &query()).await.unwrap();

        assert_eq!(items, vec![item("a"), item("b"), item("c"), item("d"), item("e")]);
    }

    #[tokio::test]
    async fn empty_token_ends_the_loop() {
        let mut source = MockIndexSource::new();
        source
            .expect_query_page()
            .times(1)
            .returning(|_, _| Ok(Page { items: vec![item("a")], last_evaluated_key: Some(Item::new()) }));

        let items = query_till_end(&source, &query()).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn empty_pages_still_follow_the_token() {
        // filtered queries can return an empty page that still carries a token
        let mut source = MockIndexSource::new();
        let mut seq = Sequence::new();
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Page { items: vec![], last_evaluated_key: token("x") }));
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Page { items: vec![item("y")], last_evaluated_key: None }));

        let items = query_till_end(&source, &query()).await.unwrap();
        assert_eq!(items, vec![item("y")]);
    }

    #[tokio::test]
    async fn page_error_propagates() {
        use aws_sdk_dynamodb::types::error::ResourceNotFoundException;

        let mut source = MockIndexSource::new();
        let mut seq = Sequence::new();
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Page { items: vec![item("a")], last_evaluated_key: token("a") }));
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                let missing = ResourceNotFoundException::builder().message("no such table").build();
                Err(aws_sdk_dynamodb::Error::ResourceNotFoundException(missing).into())
            });

        let err = query_till_end(&source, &query()).await.unwrap_err();
        assert!(matches!(
            err,
            ReleasesError::QueryError(aws_sdk_dynamodb::Error::ResourceNotFoundException(_))
        ));
    }
}
