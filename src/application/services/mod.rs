//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **FraudDetectionService**: Payment and listing fraud screening
//! - **RiskManagementService**: Property transaction risk assessment
//! - **CustomerExperienceService**: Satisfaction and sentiment analysis
//! - **LeadConversionService**: Buyer lead scoring
//! - **PerformanceTrackingService**: Agent performance evaluation
//! - **OperationalExcellenceService**: Process efficiency analysis
//! - **ListingPolicyService**: Listing lifecycle policies and transitions

mod analysis;

pub mod customer_experience_service;
pub mod fraud_detection_service;
pub mod lead_conversion_service;
pub mod listing_policy_service;
pub mod operational_excellence_service;
pub mod performance_tracking_service;
pub mod risk_management_service;

pub use analysis::AnalysisError;

pub use customer_experience_service::{CustomerExperienceService, CustomerExperienceServiceImpl};
pub use fraud_detection_service::{FraudDetectionService, FraudDetectionServiceImpl};
pub use lead_conversion_service::{LeadConversionService, LeadConversionServiceImpl};
pub use listing_policy_service::{ListingPolicyService, ListingPolicyServiceImpl, PolicyError};
pub use operational_excellence_service::{
    OperationalExcellenceService, OperationalExcellenceServiceImpl,
};
pub use performance_tracking_service::{
    PerformanceTrackingService, PerformanceTrackingServiceImpl,
};
pub use risk_management_service::{RiskManagementService, RiskManagementServiceImpl};
