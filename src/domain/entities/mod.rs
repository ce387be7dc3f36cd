//! # Domain Entities
//!
//! - **Listing**: a property listing and its lifecycle status graph

mod listing;

pub use listing::{Listing, ListingStatus};
