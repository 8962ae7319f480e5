pub mod dates;
pub mod executor;
pub mod shaper;

pub use crate::domain::model::{QuerySpec, Record, Scalar, SortDirection, TabularResult};
pub use crate::domain::ports::{ConfigProvider, RowSource};
pub use crate::utils::error::Result;
