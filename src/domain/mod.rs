//! # Domain Layer
//!
//! Core business rules of the marketplace, independent of HTTP and I/O.
//!
//! ## Structure
//!
//! - **entities**: Listing and its lifecycle status graph
//! - **value_objects**: Immutable value types (RiskLevel, score helpers)
//! - **specification**: Composable boolean rules with readable descriptions
//! - **policies**: Named rule sets gating listing lifecycle actions

pub mod entities;
pub mod policies;
pub mod specification;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
