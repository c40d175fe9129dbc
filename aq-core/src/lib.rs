pub mod baseline;
pub mod date_range;
pub mod error;
pub mod hourly;
pub mod quality;
pub mod reading;
pub mod season;

pub use error::{AqError, Result};
