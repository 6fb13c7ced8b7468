//! Response envelope types for the JSON API.
//!
//! Field names follow the wire format the frontend consumes
//! (camelCase where the deployed payloads use it).

use common::record::{HistoryRecord, Totals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// `GET /api/token`
#[derive(Debug, Serialize)]
pub struct TokenEnvelope {
    pub success: bool,
    pub token: String,
    pub timestamp: i64,
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

/// `GET /api/history/{date}` and `GET /api/public-history/{date}`
#[derive(Debug, Serialize)]
pub struct HistoryEnvelope {
    pub success: bool,
    pub date: String,
    pub timestamp: String,
    pub data: HistoryRecord,
    pub total: Totals,
}

/// `GET /api/today`
#[derive(Debug, Serialize)]
pub struct TodayEnvelope {
    pub success: bool,
    pub date: String,
    #[serde(rename = "serverDate")]
    pub server_date: String,
    pub data: HistoryRecord,
    pub total: Totals,
}

/// Body of `POST /api/history/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub dates: Vec<String>,
}

/// `POST /api/history/batch`
#[derive(Debug, Serialize)]
pub struct BatchEnvelope {
    pub success: bool,
    pub timestamp: String,
    /// How many dates the caller asked for.
    pub requested: usize,
    /// How many valid dates had data.
    pub found: usize,
    pub data: BTreeMap<String, HistoryRecord>,
}
