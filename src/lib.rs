//! # Property Intelligence Library
//!
//! Analysis services for a property marketplace:
//! - Fraud detection, risk management, customer experience, lead
//!   conversion, performance tracking and operational excellence scoring
//! - Listing lifecycle policies built from composable specifications
//! - Operation-name based retry with exponential backoff
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Listing entity, specifications and business policies
//! - **Application Layer**: Analysis services and DTOs
//! - **Infrastructure Layer**: Model weight store and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! property_intelligence/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, specifications, policies
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Model store and metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, validation, retry)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
