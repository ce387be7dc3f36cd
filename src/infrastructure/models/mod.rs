//! Scoring Models
//!
//! Weight tables used by the analysis services, loaded from JSON files
//! under the configured models directory. A missing file means the
//! built-in table for that model is used.

mod store;
mod weights;

pub use store::{FileModelStore, ModelError, ModelStore, RetryingModelStore};
#[cfg(test)]
pub use store::MockModelStore;
pub use weights::{logistic, ModelKind, ModelWeights, BUILTIN_VERSION};
