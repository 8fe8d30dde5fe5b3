use serde::Serialize;

/// Result of a cleanup run.
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    /// Number of expired links deleted by this run.
    pub removed: usize,
}
