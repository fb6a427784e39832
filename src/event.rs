use chrono::{DateTime, Utc};

use crate::alert::Alert;
use crate::model::price::{PriceSeries, PriceSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Unknown,
    Online,
    Offline,
}

/// Results the background tasks hand to the UI loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    PricesLoaded {
        prices: Vec<PriceSnapshot>,
        fetched_at: DateTime<Utc>,
    },
    HistoryLoaded {
        coin: String,
        series: PriceSeries,
    },
    HistoryEmpty {
        coin: String,
    },
    AlertsLoaded(Vec<Alert>),
    AlertSaved(String),
    AlertDeleted {
        id: i64,
        message: String,
    },
    ApiStatus(ApiStatus),
    LogMessage(String),
    Error(String),
}

/// Requests the UI loop sends to the API worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCommand {
    RefreshNow,
    LoadHistory(String),
    LoadAlerts,
    AddAlert(crate::alert::NewAlert),
    DeleteAlert(i64),
}
