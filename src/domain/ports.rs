use crate::domain::model::QuerySpec;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Anything that can answer a single read query with raw JSON rows.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_rows(&self, query: &QuerySpec) -> Result<Vec<Map<String, Value>>>;
}

pub trait ConfigProvider: Send + Sync {
    fn supabase_url(&self) -> Option<&str>;
    fn supabase_key(&self) -> Option<&str>;
    fn static_dir(&self) -> &str;
}
