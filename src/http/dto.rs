//! Query parameters and small response bodies.
//!
//! Report bodies are the library types from [`crate::report`] serialized
//! as-is.

use serde::{Deserialize, Serialize};

/// `GET /calculate`. `hour` is a fractional UT hour.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateQuery {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: f64,
    pub lat: f64,
    pub lon: f64,
}

/// `GET /calculate_report`. `tob` is local civil time.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    pub dob: String,
    pub tob: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub engine: String,
    pub version: String,
    pub ephemeris: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeris_version: Option<String>,
}
