//! Size tally aggregation

pub mod sheet;

pub use sheet::{DEFAULT_PLAYER_NAME_MAX_LEN, SizeRow, SizeTally};
