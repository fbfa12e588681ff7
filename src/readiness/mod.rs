/// Readiness domain: value objects, pure services and classification policies
pub mod domain;
pub mod policies;
pub mod services;
