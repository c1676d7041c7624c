pub mod error;
pub mod interest;
pub mod types;

#[cfg(feature = "emi")]
pub mod emi;

#[cfg(feature = "repayment")]
pub mod repayment;

pub use error::DebtEngineError;
pub use types::*;

/// Standard result type for all debt-engine operations
pub type DebtEngineResult<T> = Result<T, DebtEngineError>;
