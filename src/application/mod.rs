/// Application layer - Use cases, DTOs and scheduling
///
/// This layer orchestrates the sync pipelines and readiness queries,
/// coordinating with infrastructure only through ports.
pub mod dto;
pub mod scheduler;
pub mod use_cases;
