pub mod dcf;
pub mod deal;
pub mod error;
pub mod types;

pub use error::DealEconError;
pub use types::*;

/// Standard result type for all deal-econ operations
pub type DealEconResult<T> = Result<T, DealEconError>;
