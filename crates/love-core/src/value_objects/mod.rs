//! Value objects - immutable domain primitives

mod rate;
mod snowflake;

pub use rate::Rate;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
