use crate::adapters::PostgrestClient;
use crate::core::dates;
use crate::core::shaper::GAMEDAY_COLUMN;
use crate::domain::model::{QuerySpec, SortDirection, TabularResult};
use crate::domain::ports::{ConfigProvider, RowSource};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::validate_identifier;
use std::sync::Arc;

pub const DEFAULT_DASHBOARD_VIEW: &str = "league_dashboard";
pub const DEFAULT_ORDER_COLUMN: &str = GAMEDAY_COLUMN;
pub const GAME_WEEK_START_COLUMN: &str = "game_week_start";

/// Handle to the remote service, fixed for the life of the process.
#[derive(Clone)]
pub enum Connection {
    Connected(Arc<dyn RowSource>),
    Disconnected { reason: String },
}

impl Connection {
    pub fn connected(source: impl RowSource + 'static) -> Self {
        Connection::Connected(Arc::new(source))
    }

    pub fn disconnected(reason: impl Into<String>) -> Self {
        Connection::Disconnected {
            reason: reason.into(),
        }
    }

    /// Missing or unusable credentials leave the gateway running but
    /// disconnected; every query then comes back empty.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let (Some(url), Some(key)) = (config.supabase_url(), config.supabase_key()) else {
            tracing::error!("SUPABASE_URL and SUPABASE_KEY must be set; serving empty results");
            return Connection::disconnected("SUPABASE_URL and SUPABASE_KEY are not set");
        };

        match PostgrestClient::new(url, key) {
            Ok(client) => {
                tracing::info!("Connected to remote service at {}", client.rest_url());
                Connection::connected(client)
            }
            Err(e) => {
                tracing::error!("Connection error: {}", e);
                Connection::disconnected(e.to_string())
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Connection::Connected(_))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connection::Connected(_) => f.write_str("Connected"),
            Connection::Disconnected { reason } => {
                f.debug_struct("Disconnected").field("reason", reason).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryExecutor {
    connection: Connection,
}

impl QueryExecutor {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Runs `query` and reports every failure as a distinct error.
    pub async fn try_execute(&self, query: &QuerySpec) -> Result<TabularResult> {
        let source = match &self.connection {
            Connection::Connected(source) => source,
            Connection::Disconnected { reason } => {
                return Err(GatewayError::NotConnected {
                    reason: reason.clone(),
                })
            }
        };

        validate_identifier(&query.table)?;

        let rows = source.fetch_rows(query).await?;
        Ok(TabularResult::from_json_rows(rows))
    }

    /// Like [`QueryExecutor::try_execute`], but any failure is logged and
    /// comes back as an empty result.
    pub async fn run(&self, query: &QuerySpec) -> TabularResult {
        match self.try_execute(query).await {
            Ok(result) if result.is_empty() => {
                tracing::info!("No data found in '{}'", query.table);
                result
            }
            Ok(result) => {
                tracing::debug!("Fetched {} rows from '{}'", result.len(), query.table);
                result
            }
            Err(GatewayError::NotConnected { reason }) => {
                tracing::debug!("Skipping query on '{}': {}", query.table, reason);
                TabularResult::empty()
            }
            Err(e) => {
                tracing::error!("Error fetching data from '{}': {}", query.table, e);
                TabularResult::empty()
            }
        }
    }

    pub async fn execute(
        &self,
        table_name: &str,
        select_columns: &str,
        order_column: Option<&str>,
        descending: bool,
    ) -> TabularResult {
        let mut query = QuerySpec::new(table_name).select(select_columns);
        if let Some(column) = order_column {
            query = query.order_by(column, SortDirection::from_descending(descending));
        }
        self.run(&query).await
    }

    /// Weekly performance rows, oldest week first.
    pub async fn fetch_dashboard(&self, view_name: &str) -> TabularResult {
        let mut result = self
            .execute(
                view_name,
                QuerySpec::SELECT_ALL,
                Some(GAME_WEEK_START_COLUMN),
                false,
            )
            .await;

        if let Err(bad) = result.convert_column(GAME_WEEK_START_COLUMN, dates::to_datetime) {
            tracing::warn!(
                "Could not parse {} value '{}' in '{}'; keeping raw values",
                GAME_WEEK_START_COLUMN,
                bad,
                view_name
            );
        }
        result
    }

    /// Game rows, earliest game first.
    pub async fn fetch_game_table(&self, table_name: &str) -> TabularResult {
        let mut result = self
            .execute(
                table_name,
                QuerySpec::SELECT_ALL,
                Some(DEFAULT_ORDER_COLUMN),
                false,
            )
            .await;

        if let Err(bad) = result.convert_column(GAMEDAY_COLUMN, dates::to_datetime) {
            tracing::debug!("Leaving {} unparsed in '{}': '{}'", GAMEDAY_COLUMN, table_name, bad);
        }
        result
    }

    /// For tables holding a single summary row; no ordering requested.
    pub async fn fetch_single_row_header(&self, table_name: &str) -> TabularResult {
        self.execute(table_name, QuerySpec::SELECT_ALL, None, false)
            .await
    }
}
