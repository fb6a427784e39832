use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::{Host, Url};

use crate::alert::{Alert, NewAlert};
use crate::error::AppError;
use crate::model::price::{PriceSeries, PriceSnapshot};

use super::types::{
    is_success, AlertsResponse, HealthResponse, HistoryResponse, PricesResponse, StatusResponse,
};

/// HTTP client for the price-tracking backend.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        // a backend on this machine is never reached through a proxy
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("unusable base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Turn a non-2xx reply into `AppError::Api`, otherwise decode the body.
    async fn read_json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body).into());
        }
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading {} body failed", what))?;
        serde_json::from_str::<T>(&body)
            .map_err(AppError::from)
            .with_context(|| format!("{} returned an unreadable body", what))
    }

    pub async fn health(&self) -> Result<String> {
        let url = self.endpoint(&["api", "health"])?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(AppError::from)
            .context("health check failed")?;
        let health: HealthResponse = Self::read_json(resp, "health").await?;
        Ok(health.status)
    }

    pub async fn fetch_prices(&self) -> Result<Vec<PriceSnapshot>> {
        let url = self.endpoint(&["api", "prices"])?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(AppError::from)
            .context("fetch_prices failed")?;
        let body: PricesResponse = Self::read_json(resp, "prices").await?;
        if !is_success(&body.status) {
            return Err(rejected(body.message).into());
        }
        tracing::debug!(count = body.data.len(), "Prices received");
        Ok(body.data)
    }

    pub async fn fetch_history(&self, coin: &str) -> Result<PriceSeries> {
        let url = self.endpoint(&["api", "history", coin])?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(AppError::from)
            .with_context(|| format!("fetch_history({}) failed", coin))?;
        let body: HistoryResponse = Self::read_json(resp, "history").await?;
        if !is_success(&body.status) {
            return Err(rejected(body.message).into());
        }
        tracing::debug!(coin, points = body.prices.len(), "History received");
        Ok(PriceSeries::new(body.prices, body.timestamps)?)
    }

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>> {
        let url = self.endpoint(&["api", "alerts"])?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(AppError::from)
            .context("fetch_alerts failed")?;
        let body: AlertsResponse = Self::read_json(resp, "alerts").await?;
        if let Some(status) = body.status.as_deref() {
            if !is_success(status) {
                return Err(rejected(body.message).into());
            }
        }
        Ok(body.alerts)
    }

    /// Create an alert; returns the backend's confirmation text.
    pub async fn add_alert(&self, alert: &NewAlert) -> Result<String> {
        let url = self.endpoint(&["api", "alerts", "add"])?;
        tracing::info!(
            coin = %alert.coin,
            condition = %alert.condition,
            price = alert.price,
            "Adding alert"
        );
        let resp = self
            .http
            .post(url)
            .json(alert)
            .send()
            .await
            .map_err(AppError::from)
            .context("add_alert failed")?;
        let body: StatusResponse = Self::read_json(resp, "add alert").await?;
        if !is_success(&body.status) {
            return Err(rejected(body.message).into());
        }
        Ok(body.message.unwrap_or_else(|| "Alert added".to_string()))
    }

    pub async fn delete_alert(&self, id: i64) -> Result<String> {
        let id_str = id.to_string();
        let url = self.endpoint(&["api", "alerts", &id_str])?;
        tracing::info!(alert_id = id, "Deleting alert");
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(AppError::from)
            .context("delete_alert failed")?;
        let body: StatusResponse = Self::read_json(resp, "delete alert").await?;
        if !is_success(&body.status) {
            return Err(rejected(body.message).into());
        }
        Ok(body.message.unwrap_or_else(|| format!("Alert {} deleted", id)))
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(name)) => name.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

fn api_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<StatusResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.trim().to_string()
            }
        });
    AppError::Api {
        status: status.as_u16(),
        message,
    }
}

/// 2xx reply whose `status` field is not "success".
fn rejected(message: Option<String>) -> AppError {
    AppError::Api {
        status: StatusCode::OK.as_u16(),
        message: message.unwrap_or_else(|| "backend reported an error".to_string()),
    }
}
