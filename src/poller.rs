use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::api::DashboardClient;
use crate::event::{ApiCommand, ApiStatus, AppEvent};

/// One refresh cycle: latest prices, then the selected coin's history.
/// Returns false when the backend could not be reached.
pub async fn refresh_once(
    client: &DashboardClient,
    coin: &str,
    app_tx: &mpsc::Sender<AppEvent>,
) -> bool {
    match client.fetch_prices().await {
        Ok(prices) => {
            tracing::info!(count = prices.len(), "Prices refreshed");
            let _ = app_tx
                .send(AppEvent::PricesLoaded {
                    prices,
                    fetched_at: Utc::now(),
                })
                .await;
            let _ = app_tx.send(AppEvent::ApiStatus(ApiStatus::Online)).await;
            load_history(client, coin, app_tx).await;
            true
        }
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Price refresh failed");
            let _ = app_tx.send(AppEvent::ApiStatus(ApiStatus::Offline)).await;
            let _ = app_tx
                .send(AppEvent::Error(format!("Price refresh failed: {:#}", e)))
                .await;
            false
        }
    }
}

pub async fn load_history(
    client: &DashboardClient,
    coin: &str,
    app_tx: &mpsc::Sender<AppEvent>,
) {
    match client.fetch_history(coin).await {
        Ok(series) if series.is_empty() => {
            tracing::warn!(coin, "No historical data available");
            let _ = app_tx
                .send(AppEvent::HistoryEmpty {
                    coin: coin.to_string(),
                })
                .await;
        }
        Ok(series) => {
            let _ = app_tx
                .send(AppEvent::HistoryLoaded {
                    coin: coin.to_string(),
                    series,
                })
                .await;
        }
        Err(e) => {
            tracing::warn!(coin, error = %format!("{:#}", e), "History fetch failed");
            let _ = app_tx
                .send(AppEvent::Error(format!("History for {} failed: {:#}", coin, e)))
                .await;
        }
    }
}

async fn load_alerts(client: &DashboardClient, app_tx: &mpsc::Sender<AppEvent>) {
    match client.fetch_alerts().await {
        Ok(alerts) => {
            let _ = app_tx.send(AppEvent::AlertsLoaded(alerts)).await;
        }
        Err(e) => {
            let _ = app_tx
                .send(AppEvent::Error(format!("Loading alerts failed: {:#}", e)))
                .await;
        }
    }
}

/// Check `/api/health` and report the result in the log panel.
pub async fn check_health(client: &DashboardClient, app_tx: &mpsc::Sender<AppEvent>) -> bool {
    match client.health().await {
        Ok(status) => {
            tracing::info!(%status, api = %client.base_url(), "Backend health check");
            let _ = app_tx
                .send(AppEvent::LogMessage(format!("Backend {}", status)))
                .await;
            true
        }
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Backend health check failed");
            let _ = app_tx.send(AppEvent::ApiStatus(ApiStatus::Offline)).await;
            false
        }
    }
}

/// Periodic refresh after one health check. The first cycle runs immediately.
pub async fn run_price_poller(
    client: DashboardClient,
    period: Duration,
    coin_rx: watch::Receiver<String>,
    app_tx: mpsc::Sender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(period_secs = period.as_secs(), "Starting auto-refresh");

    // health status must land before the first refresh result
    check_health(&client, &app_tx).await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let coin = coin_rx.borrow().clone();
                refresh_once(&client, &coin, &app_tx).await;
            }
            _ = shutdown.changed() => {
                tracing::info!("Price poller shutting down");
                break;
            }
        }
    }
}

/// Serves on-demand requests from the UI one at a time.
pub async fn run_api_worker(
    client: DashboardClient,
    coin_rx: watch::Receiver<String>,
    mut cmd_rx: mpsc::Receiver<ApiCommand>,
    app_tx: mpsc::Sender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                handle_command(&client, &coin_rx, cmd, &app_tx).await;
            }
            _ = shutdown.changed() => {
                tracing::info!("API worker shutting down");
                break;
            }
        }
    }
}

pub async fn handle_command(
    client: &DashboardClient,
    coin_rx: &watch::Receiver<String>,
    cmd: ApiCommand,
    app_tx: &mpsc::Sender<AppEvent>,
) {
    match cmd {
        ApiCommand::RefreshNow => {
            let coin = coin_rx.borrow().clone();
            refresh_once(client, &coin, app_tx).await;
        }
        ApiCommand::LoadHistory(coin) => load_history(client, &coin, app_tx).await,
        ApiCommand::LoadAlerts => load_alerts(client, app_tx).await,
        ApiCommand::AddAlert(alert) => match client.add_alert(&alert).await {
            Ok(message) => {
                let _ = app_tx.send(AppEvent::AlertSaved(message)).await;
                load_alerts(client, app_tx).await;
            }
            Err(e) => {
                let _ = app_tx
                    .send(AppEvent::Error(format!("Adding alert failed: {:#}", e)))
                    .await;
            }
        },
        ApiCommand::DeleteAlert(id) => match client.delete_alert(id).await {
            Ok(message) => {
                let _ = app_tx.send(AppEvent::AlertDeleted { id, message }).await;
                load_alerts(client, app_tx).await;
            }
            Err(e) => {
                let _ = app_tx
                    .send(AppEvent::Error(format!("Deleting alert {} failed: {:#}", id, e)))
                    .await;
            }
        },
    }
}
