//! Operation Context
//!
//! Per-call context threaded through every repository operation.
//! Carries a request id for correlation and an optional deadline.

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// Context for a single repository call
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Request ID for log correlation
    pub request_id: Uuid,

    /// Point in time after which the operation is abandoned
    deadline: Option<Instant>,

    /// Start time for duration tracking
    started_at: Instant,
}

impl OperationContext {
    /// Context without a deadline
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            deadline: None,
            started_at: Instant::now(),
        }
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        let mut ctx = Self::new();
        ctx.deadline = Some(ctx.started_at + timeout);
        ctx
    }

    /// Use a caller-provided request id
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}
