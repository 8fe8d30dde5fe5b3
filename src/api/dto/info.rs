//! DTO for the service information endpoint.

use serde::Serialize;
use std::collections::BTreeMap;

/// Service name, version and the endpoints it serves.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}
