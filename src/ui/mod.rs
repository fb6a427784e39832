pub mod chart;
pub mod dashboard;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::alert::{triggered_alerts, Alert, AlertForm, NewAlert, TriggeredAlert};
use crate::chart::{ChartSync, Theme};
use crate::event::{ApiStatus, AppEvent};
use crate::format::{format_clock, format_usd};
use crate::indicator::{IndicatorKind, IndicatorPeriods};
use crate::model::coin::display_name;
use crate::model::price::PriceSnapshot;

use chart::PriceChart;
use dashboard::{
    AlertFormPopup, AlertsPanel, CoinInfoPanel, KeybindBar, LogPanel, PriceCards, PriceMove,
    StatusBar,
};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub coins: Vec<String>,
    pub selected_coin: String,
    pub prices: Vec<PriceSnapshot>,
    pub price_moves: Vec<PriceMove>,
    pub last_update: Option<DateTime<Utc>>,
    pub api_status: ApiStatus,
    pub chart: ChartSync,
    pub alerts: Vec<Alert>,
    pub selected_alert: usize,
    pub triggered: Vec<TriggeredAlert>,
    pub alert_form: Option<AlertForm>,
    pub log_messages: Vec<String>,
    notified_alerts: HashSet<i64>,
}

impl AppState {
    pub fn new(
        mut coins: Vec<String>,
        default_coin: &str,
        periods: IndicatorPeriods,
        theme: Theme,
    ) -> Self {
        if !coins.iter().any(|c| c == default_coin) {
            coins.insert(0, default_coin.to_string());
        }
        Self {
            coins,
            selected_coin: default_coin.to_string(),
            prices: Vec::new(),
            price_moves: Vec::new(),
            last_update: None,
            api_status: ApiStatus::Unknown,
            chart: ChartSync::new(default_coin, periods, theme),
            alerts: Vec::new(),
            selected_alert: 0,
            triggered: Vec::new(),
            alert_form: None,
            log_messages: Vec::new(),
            notified_alerts: HashSet::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn current_price(&self, coin: &str) -> Option<f64> {
        self.prices.iter().find(|p| p.coin == coin).map(|p| p.price)
    }

    /// Move the coin selection by `step` (wrapping) and return the new coin
    /// so the caller can request its history.
    pub fn select_coin_by(&mut self, step: isize) -> Option<String> {
        if self.coins.is_empty() {
            return None;
        }
        let n = self.coins.len() as isize;
        let idx = self
            .coins
            .iter()
            .position(|c| c == &self.selected_coin)
            .unwrap_or(0) as isize;
        let next = self.coins[(idx + step).rem_euclid(n) as usize].clone();
        self.select_coin(&next)
    }

    pub fn select_coin(&mut self, coin: &str) -> Option<String> {
        if coin == self.selected_coin {
            return None;
        }
        self.selected_coin = coin.to_string();
        self.push_log(format!("Selected {}", display_name(coin)));
        Some(self.selected_coin.clone())
    }

    pub fn toggle_indicator(&mut self, kind: IndicatorKind) {
        let periods = self.chart.periods();
        match self.chart.toggle_indicator(kind) {
            Some(active) => self.push_log(format!("{} on", periods.label(active))),
            None => self.push_log(format!("{} off", periods.label(kind))),
        }
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.chart.toggle_theme();
        self.push_log(format!("Theme: {:?}", theme));
    }

    pub fn open_alert_form(&mut self) {
        self.alert_form = Some(AlertForm::new(&self.selected_coin));
    }

    pub fn close_alert_form(&mut self) {
        self.alert_form = None;
    }

    /// Validate the open form. On success the form closes and the alert is
    /// returned for submission; on failure the form stays open with the error.
    pub fn submit_alert_form(&mut self) -> Option<NewAlert> {
        let alert = self.alert_form.as_mut()?.submit()?;
        self.alert_form = None;
        Some(alert)
    }

    pub fn move_alert_selection(&mut self, up: bool) {
        if self.alerts.is_empty() {
            self.selected_alert = 0;
            return;
        }
        self.selected_alert = if up {
            self.selected_alert.saturating_sub(1)
        } else {
            (self.selected_alert + 1).min(self.alerts.len() - 1)
        };
    }

    pub fn selected_alert(&self) -> Option<&Alert> {
        self.alerts.get(self.selected_alert)
    }

    /// Latest value of the active overlay, for the info panel.
    pub fn indicator_readout(&self) -> Option<(String, f64)> {
        let overlay = self.chart.display().overlay.as_ref()?;
        let last = *overlay.values.last()?;
        Some((overlay.label.clone(), last))
    }

    fn refresh_triggered(&mut self) {
        let latest: HashMap<String, f64> = self
            .prices
            .iter()
            .map(|p| (p.coin.clone(), p.price))
            .collect();
        self.triggered = triggered_alerts(&self.alerts, &latest);

        let fresh: Vec<String> = self
            .triggered
            .iter()
            .filter(|t| !self.notified_alerts.contains(&t.alert_id))
            .map(|t| {
                format!(
                    "[ALERT] {} is {} {} (now {})",
                    display_name(&t.coin),
                    t.condition,
                    format_usd(t.target_price),
                    format_usd(t.current_price)
                )
            })
            .collect();
        for t in &self.triggered {
            self.notified_alerts.insert(t.alert_id);
        }
        for msg in fresh {
            tracing::info!(alert = %msg, "Alert triggered");
            self.push_log(msg);
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PricesLoaded { prices, fetched_at } => {
                self.price_moves = prices
                    .iter()
                    .map(|snap| match self.current_price(&snap.coin) {
                        Some(prev) if snap.price > prev => PriceMove::Up,
                        Some(prev) if snap.price < prev => PriceMove::Down,
                        _ => PriceMove::Unchanged,
                    })
                    .collect();
                self.prices = prices;
                self.last_update = Some(fetched_at);
                self.refresh_triggered();
            }
            AppEvent::HistoryLoaded { coin, series } => {
                if coin != self.selected_coin {
                    tracing::debug!(%coin, selected = %self.selected_coin, "Dropping stale history");
                    return;
                }
                self.chart.load_history(&coin, series);
            }
            AppEvent::HistoryEmpty { coin } => {
                if coin == self.selected_coin {
                    self.chart.mark_no_data(&coin);
                    self.push_log(format!("[WARN] No historical data for {}", display_name(&coin)));
                }
            }
            AppEvent::AlertsLoaded(alerts) => {
                self.alerts = alerts;
                let live: HashSet<i64> = self.alerts.iter().map(|a| a.id).collect();
                self.notified_alerts.retain(|id| live.contains(id));
                self.selected_alert = self
                    .selected_alert
                    .min(self.alerts.len().saturating_sub(1));
                self.refresh_triggered();
            }
            AppEvent::AlertSaved(message) => {
                self.push_log(message);
            }
            AppEvent::AlertDeleted { id, message } => {
                self.notified_alerts.remove(&id);
                self.push_log(message);
            }
            AppEvent::ApiStatus(status) => {
                if status != self.api_status {
                    match status {
                        ApiStatus::Online => self.push_log("API online".to_string()),
                        ApiStatus::Offline => self.push_log("[WARN] API offline".to_string()),
                        ApiStatus::Unknown => {}
                    }
                }
                self.api_status = status;
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
            AppEvent::Error(msg) => {
                self.push_log(format!("[ERR] {}", msg));
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(4), // price cards
            Constraint::Min(10),   // chart + side panels
            Constraint::Length(6), // log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    let display = state.chart.display();
    let periods = state.chart.periods();

    frame.render_widget(
        StatusBar {
            api_status: state.api_status,
            last_update: state.last_update.as_ref().map(format_clock),
            coin: &state.selected_coin,
            data_points: state.chart.original().len(),
            indicator: state.chart.active().map(|k| periods.label(k)),
            palette: display.palette,
        },
        outer[0],
    );

    frame.render_widget(
        PriceCards {
            prices: &state.prices,
            moves: &state.price_moves,
            selected: &state.selected_coin,
            palette: display.palette,
        },
        outer[1],
    );

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(44)])
        .split(outer[2]);

    frame.render_widget(PriceChart::new(display), main_area[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(main_area[1]);

    frame.render_widget(
        CoinInfoPanel {
            coin: &state.selected_coin,
            current_price: state.current_price(&state.selected_coin).or_else(|| {
                (state.chart.coin() == state.selected_coin)
                    .then(|| state.chart.original().last_price())
                    .flatten()
            }),
            indicator_value: state.indicator_readout(),
            palette: display.palette,
        },
        side[0],
    );

    let triggered_ids: Vec<i64> = state.triggered.iter().map(|t| t.alert_id).collect();
    frame.render_widget(
        AlertsPanel {
            alerts: &state.alerts,
            selected: state.selected_alert,
            triggered_ids: &triggered_ids,
            palette: display.palette,
        },
        side[1],
    );

    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);
    frame.render_widget(KeybindBar, outer[4]);

    if let Some(form) = &state.alert_form {
        frame.render_widget(
            AlertFormPopup {
                form,
                palette: display.palette,
            },
            frame.area(),
        );
    }
}
