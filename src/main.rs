use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::{mpsc, watch};

use coin_dashboard::api::DashboardClient;
use coin_dashboard::config::Config;
use coin_dashboard::event::{ApiCommand, AppEvent};
use coin_dashboard::input::{parse_form_command, parse_main_command, FormCommand, UiCommand};
use coin_dashboard::poller;
use coin_dashboard::ui::{self, AppState};

fn send_command(cmd_tx: &mpsc::Sender<ApiCommand>, cmd: ApiCommand, app_state: &mut AppState) {
    if let Err(e) = cmd_tx.try_send(cmd) {
        tracing::warn!(error = %e, "API command queue full");
        app_state.push_log("[WARN] Busy, try again".to_string());
    }
}

fn handle_form_key(
    cmd: FormCommand,
    app_state: &mut AppState,
    cmd_tx: &mpsc::Sender<ApiCommand>,
) {
    match cmd {
        FormCommand::Cancel => app_state.close_alert_form(),
        FormCommand::Submit => {
            if let Some(alert) = app_state.submit_alert_form() {
                app_state.push_log(format!(
                    "Saving alert: {} {} {}",
                    alert.coin, alert.condition, alert.price
                ));
                send_command(cmd_tx, ApiCommand::AddAlert(alert), app_state);
            }
        }
        FormCommand::NextField => {
            if let Some(form) = app_state.alert_form.as_mut() {
                form.focus_next();
            }
        }
        FormCommand::PrevField => {
            if let Some(form) = app_state.alert_form.as_mut() {
                form.focus_prev();
            }
        }
        FormCommand::Backspace => {
            if let Some(form) = app_state.alert_form.as_mut() {
                form.backspace();
            }
        }
        FormCommand::Input(c) => {
            if let Some(form) = app_state.alert_form.as_mut() {
                form.input(c);
            }
        }
    }
}

/// Returns false when the user asked to quit.
fn handle_main_key(
    cmd: UiCommand,
    app_state: &mut AppState,
    cmd_tx: &mpsc::Sender<ApiCommand>,
    coin_tx: &watch::Sender<String>,
) -> bool {
    match cmd {
        UiCommand::Quit => return false,
        UiCommand::ToggleIndicator(kind) => app_state.toggle_indicator(kind),
        UiCommand::ToggleTheme => app_state.toggle_theme(),
        UiCommand::PrevCoin | UiCommand::NextCoin => {
            let step = if cmd == UiCommand::PrevCoin { -1 } else { 1 };
            if let Some(coin) = app_state.select_coin_by(step) {
                let _ = coin_tx.send(coin.clone());
                send_command(cmd_tx, ApiCommand::LoadHistory(coin), app_state);
            }
        }
        UiCommand::Refresh => {
            app_state.push_log("Manual refresh".to_string());
            send_command(cmd_tx, ApiCommand::RefreshNow, app_state);
        }
        UiCommand::OpenAlertForm => app_state.open_alert_form(),
        UiCommand::AlertUp => app_state.move_alert_selection(true),
        UiCommand::AlertDown => app_state.move_alert_selection(false),
        UiCommand::DeleteAlert => {
            if let Some(id) = app_state.selected_alert().map(|a| a.id) {
                app_state.push_log(format!("Deleting alert #{}", id));
                send_command(cmd_tx, ApiCommand::DeleteAlert(id), app_state);
            }
        }
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists and api.base_url is valid");
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("coin-dashboard.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let base_url = config.api.url()?;
    let theme = config.ui.theme()?;
    let coins = config.dashboard.coin_list();
    let default_coin = coins
        .first()
        .cloned()
        .context("no coins configured")?;

    tracing::info!(
        api = %base_url,
        coin = %default_coin,
        refresh_secs = config.api.refresh_interval_secs,
        "Starting coin-dashboard"
    );

    let client = DashboardClient::new(base_url, config.api.request_timeout())?;

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>(32);
    let (coin_tx, coin_rx) = watch::channel(default_coin.clone());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(poller::run_price_poller(
        client.clone(),
        config.api.refresh_interval(),
        coin_rx.clone(),
        app_tx.clone(),
        shutdown_rx.clone(),
    ));
    tokio::spawn(poller::run_api_worker(
        client,
        coin_rx,
        cmd_rx,
        app_tx.clone(),
        shutdown_rx.clone(),
    ));

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    let mut app_state = AppState::new(
        coins,
        &default_coin,
        config.indicators.periods(),
        theme,
    );
    app_state.push_log(format!("coin-dashboard started | {}", config.api.base_url));
    let _ = cmd_tx.try_send(ApiCommand::LoadAlerts);

    let mut terminal = ratatui::init();
    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| ui::render(frame, &app_state)) {
            break Err(e.into());
        }

        match crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms)) {
            Ok(true) => match crossterm::event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if app_state.alert_form.is_some() {
                        if let Some(cmd) = parse_form_command(&key.code) {
                            handle_form_key(cmd, &mut app_state, &cmd_tx);
                        }
                    } else if let Some(cmd) = parse_main_command(&key.code) {
                        if !handle_main_key(cmd, &mut app_state, &cmd_tx, &coin_tx) {
                            tracing::info!("User quit");
                            let _ = shutdown_tx.send(true);
                            break Ok(());
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        while let Ok(evt) = app_rx.try_recv() {
            app_state.apply(evt);
        }

        if *shutdown_rx.borrow() {
            break Ok(());
        }
    };

    ratatui::restore();
    tracing::info!("Shutdown complete");
    println!("Goodbye! Check coin-dashboard.log for details.");
    result
}
