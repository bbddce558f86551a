// Copyright 2025 Cowboy AI, LLC.

//! Job-scheduling seam
//!
//! Recurring execution lives in an external scheduler. The domain's entire
//! contract with it is: obtain a job identifier at creation time and persist
//! it alongside the schedule metadata.

/// Generates opaque identifiers for recurring jobs
#[cfg_attr(test, mockall::automock)]
pub trait JobScheduler: Send + Sync {
    /// Generate a fresh job identifier
    fn generate_job_id(&self) -> String;
}

/// Job scheduler producing UUID-based identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidJobScheduler;

impl UuidJobScheduler {
    /// Create a scheduler
    pub fn new() -> Self {
        Self
    }
}

impl JobScheduler for UuidJobScheduler {
    fn generate_job_id(&self) -> String {
        format!("job-{}", uuid::Uuid::new_v4())
    }
}
