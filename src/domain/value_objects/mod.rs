//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **RiskLevel**: low / medium / high / critical bucket of a 0-100 score

mod risk_level;

pub use risk_level::*;
