pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::PostgrestClient;
pub use app::Gateway;
pub use config::GatewayConfig;
pub use crate::core::executor::{Connection, QueryExecutor};
pub use crate::core::shaper::{format_gameday, to_json_records, FormattedRecord, GamedayFormat};
pub use domain::model::{QuerySpec, Record, Scalar, SortDirection, TabularResult};
pub use utils::error::{GatewayError, Result};
