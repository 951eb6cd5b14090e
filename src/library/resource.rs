use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::tabs::TabKey;
use crate::error::ClientError;

pub trait Identified {
    fn id(&self) -> i64;
}

/// One kind of reference data served under a REST collection endpoint.
pub trait Resource: Send + Sync + 'static {
    type Record: Identified + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Create: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Update: Serialize + DeserializeOwned + Send + Sync + 'static;

    const TAB: TabKey;
    /// Collection path relative to the API base, e.g. `/agencies`.
    const ENDPOINT: &'static str;
    const COLUMNS: &'static [&'static str];

    fn row(record: &Self::Record) -> Vec<String>;

    /// `needle` is already lowercased and non-empty.
    fn matches(record: &Self::Record, needle: &str) -> bool;

    /// Entry count shown next to the tab for the current search.
    fn data_count(records: &[Self::Record], term: &str) -> usize {
        if term.is_empty() {
            return records.len();
        }
        let needle = term.to_lowercase();
        records.iter().filter(|r| Self::matches(r, &needle)).count()
    }
}

/// The external store a resource lives in.
#[async_trait]
pub trait RecordStore<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R::Record>, ClientError>;
    async fn get(&self, id: i64) -> Result<R::Record, ClientError>;
    async fn create(&self, payload: &R::Create) -> Result<R::Record, ClientError>;
    async fn update(&self, id: i64, payload: &R::Update) -> Result<R::Record, ClientError>;
    async fn delete(&self, id: i64) -> Result<(), ClientError>;
}
