use crate::domain::model::QuerySpec;
use crate::domain::ports::RowSource;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{validate_identifier, validate_non_empty_string, validate_url};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use url::Url;

const REST_PREFIX: &str = "rest/v1/";

/// Read-only client for a PostgREST endpoint such as Supabase's `/rest/v1`.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: Client,
    rest_url: Url,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut base = validate_url("supabase.url", base_url)?;
        validate_non_empty_string("supabase.key", api_key)?;

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join(REST_PREFIX)
            .map_err(|e| GatewayError::InvalidConfigValueError {
                field: "supabase.url".to_string(),
                value: base_url.to_string(),
                reason: format!("Cannot build REST endpoint: {}", e),
            })?;

        Ok(Self {
            client: Client::new(),
            rest_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    /// Full request URL for `query`, including `select` and `order`.
    pub fn query_url(&self, query: &QuerySpec) -> Result<Url> {
        validate_identifier(&query.table)?;

        let mut url = self
            .rest_url
            .join(&query.table)
            .map_err(|_| GatewayError::InvalidTableName {
                name: query.table.clone(),
            })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &query.select);
            if let Some(order) = &query.order {
                pairs.append_pair(
                    "order",
                    &format!("{}.{}", order.column, order.direction.as_str()),
                );
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl RowSource for PostgrestClient {
    async fn fetch_rows(&self, query: &QuerySpec) -> Result<Vec<Map<String, Value>>> {
        let url = self.query_url(query)?;

        tracing::debug!("Querying remote table: {}", url);
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Remote response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        let json_data: Value = response.json().await?;
        let Value::Array(items) = json_data else {
            return Err(GatewayError::UnexpectedPayload {
                message: format!("expected a JSON array from '{}'", query.table),
            });
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(obj) => Ok(obj),
                other => Err(GatewayError::UnexpectedPayload {
                    message: format!("expected row objects, got {}", other),
                }),
            })
            .collect()
    }
}
