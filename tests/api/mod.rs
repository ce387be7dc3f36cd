//! API endpoint tests

mod analysis_tests;
mod health_tests;
mod listing_tests;
