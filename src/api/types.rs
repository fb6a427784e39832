use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::alert::Alert;
use crate::model::price::{deserialize_timestamps, PriceSnapshot};

pub const STATUS_SUCCESS: &str = "success";

/// `GET /api/prices`
#[derive(Debug, Deserialize)]
pub struct PricesResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<PriceSnapshot>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/history/{coin}`
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub status: String,
    #[serde(default)]
    pub coin: Option<String>,
    #[serde(default)]
    pub prices: Vec<f64>,
    #[serde(default, deserialize_with = "deserialize_timestamps")]
    pub timestamps: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/alerts`
#[derive(Debug, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of the alert add/delete endpoints and of error bodies.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/health`
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

pub fn is_success(status: &str) -> bool {
    status.eq_ignore_ascii_case(STATUS_SUCCESS)
}
