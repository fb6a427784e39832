use chrono::{DateTime, TimeZone, Utc};

use coin_dashboard::alert::{Alert, AlertCondition};
use coin_dashboard::chart::Theme;
use coin_dashboard::event::{ApiStatus, AppEvent};
use coin_dashboard::indicator::{IndicatorKind, IndicatorPeriods};
use coin_dashboard::model::price::{PriceSeries, PriceSnapshot};
use coin_dashboard::ui::dashboard::PriceMove;
use coin_dashboard::ui::AppState;

fn ts(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset_secs, 0).unwrap()
}

fn state() -> AppState {
    AppState::new(
        vec!["bitcoin".to_string(), "ethereum".to_string(), "solana".to_string()],
        "bitcoin",
        IndicatorPeriods::default(),
        Theme::Light,
    )
}

fn snapshot(coin: &str, price: f64) -> PriceSnapshot {
    PriceSnapshot {
        coin: coin.to_string(),
        price,
        timestamp: ts(0),
    }
}

fn prices(btc: f64, eth: f64) -> AppEvent {
    AppEvent::PricesLoaded {
        prices: vec![snapshot("bitcoin", btc), snapshot("ethereum", eth)],
        fetched_at: ts(60),
    }
}

fn history(coin: &str, values: &[f64]) -> AppEvent {
    let stamps = (0..values.len()).map(|i| ts(300 * i as i64)).collect();
    AppEvent::HistoryLoaded {
        coin: coin.to_string(),
        series: PriceSeries::new(values.to_vec(), stamps).unwrap(),
    }
}

fn alert(id: i64, coin: &str, condition: AlertCondition, price: f64) -> Alert {
    Alert {
        id,
        coin: coin.to_string(),
        condition,
        price,
        email: "ops@example.com".to_string(),
    }
}

#[test]
fn prices_record_direction_against_previous_snapshot() {
    let mut s = state();
    s.apply(prices(50_000.0, 3_000.0));
    assert_eq!(s.price_moves, vec![PriceMove::Unchanged, PriceMove::Unchanged]);
    assert_eq!(s.last_update, Some(ts(60)));

    s.apply(prices(50_500.0, 2_900.0));
    assert_eq!(s.price_moves, vec![PriceMove::Up, PriceMove::Down]);
    assert_eq!(s.current_price("ethereum"), Some(2_900.0));
    assert_eq!(s.current_price("dogecoin"), None);
}

#[test]
fn history_for_selected_coin_feeds_the_chart() {
    let mut s = state();
    s.toggle_indicator(IndicatorKind::Sma);
    s.apply(history("bitcoin", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));

    assert_eq!(s.chart.original().len(), 6);
    assert_eq!(s.chart.active(), Some(IndicatorKind::Sma));
    let (label, value) = s.indicator_readout().unwrap();
    assert_eq!(label, "SMA(5)");
    assert!((value - 4.0).abs() < f64::EPSILON);
}

#[test]
/// A reply for a coin the user already navigated away from is ignored.
fn stale_history_is_dropped() {
    let mut s = state();
    s.apply(history("bitcoin", &[1.0, 2.0, 3.0]));
    assert_eq!(s.select_coin_by(1).as_deref(), Some("ethereum"));

    s.apply(history("bitcoin", &[9.0, 9.0]));
    assert_eq!(s.chart.original().prices(), &[1.0, 2.0, 3.0]);

    s.apply(history("ethereum", &[7.0, 8.0]));
    assert_eq!(s.chart.coin(), "ethereum");
    assert_eq!(s.chart.original().prices(), &[7.0, 8.0]);
}

#[test]
fn empty_history_marks_chart_and_logs() {
    let mut s = state();
    s.apply(AppEvent::HistoryEmpty {
        coin: "bitcoin".to_string(),
    });
    assert_eq!(s.chart.display().title, "Bitcoin - No data available");
    assert!(s
        .log_messages
        .iter()
        .any(|m| m == "[WARN] No historical data for Bitcoin"));
}

#[test]
fn coin_selection_wraps_in_both_directions() {
    let mut s = state();
    assert_eq!(s.select_coin_by(-1).as_deref(), Some("solana"));
    assert_eq!(s.select_coin_by(1).as_deref(), Some("bitcoin"));
    assert_eq!(s.select_coin("bitcoin"), None);
}

#[test]
fn default_coin_is_added_when_missing_from_list() {
    let s = AppState::new(
        vec!["ethereum".to_string()],
        "bitcoin",
        IndicatorPeriods::default(),
        Theme::Dark,
    );
    assert_eq!(s.coins, vec!["bitcoin", "ethereum"]);
    assert_eq!(s.chart.theme(), Theme::Dark);
}

#[test]
fn triggered_alerts_are_logged_once() {
    let mut s = state();
    s.apply(AppEvent::AlertsLoaded(vec![
        alert(1, "bitcoin", AlertCondition::Above, 50_000.0),
        alert(2, "ethereum", AlertCondition::Below, 2_000.0),
    ]));
    s.apply(prices(50_000.0, 3_000.0));
    s.apply(prices(51_000.0, 3_100.0));

    let ids: Vec<i64> = s.triggered.iter().map(|t| t.alert_id).collect();
    assert_eq!(ids, vec![1]);
    let alert_lines = s
        .log_messages
        .iter()
        .filter(|m| m.starts_with("[ALERT]"))
        .count();
    assert_eq!(alert_lines, 1);
}

#[test]
fn api_status_transitions_are_logged() {
    let mut s = state();
    assert_eq!(s.api_status, ApiStatus::Unknown);

    s.apply(AppEvent::ApiStatus(ApiStatus::Offline));
    s.apply(AppEvent::ApiStatus(ApiStatus::Offline));
    s.apply(AppEvent::Error("Price refresh failed: connection refused".to_string()));
    s.apply(AppEvent::ApiStatus(ApiStatus::Online));

    assert_eq!(s.api_status, ApiStatus::Online);
    assert_eq!(
        s.log_messages,
        vec![
            "[WARN] API offline".to_string(),
            "[ERR] Price refresh failed: connection refused".to_string(),
            "API online".to_string(),
        ]
    );
}

#[test]
fn alert_selection_is_clamped_after_reload() {
    let mut s = state();
    s.apply(AppEvent::AlertsLoaded(vec![
        alert(1, "bitcoin", AlertCondition::Above, 60_000.0),
        alert(2, "bitcoin", AlertCondition::Below, 40_000.0),
        alert(3, "solana", AlertCondition::Above, 200.0),
    ]));
    s.move_alert_selection(false);
    s.move_alert_selection(false);
    s.move_alert_selection(false);
    assert_eq!(s.selected_alert().map(|a| a.id), Some(3));

    s.apply(AppEvent::AlertsLoaded(vec![alert(1, "bitcoin", AlertCondition::Above, 60_000.0)]));
    assert_eq!(s.selected_alert().map(|a| a.id), Some(1));

    s.move_alert_selection(true);
    assert_eq!(s.selected_alert, 0);
}

#[test]
fn alert_form_closes_only_on_valid_submit() {
    let mut s = state();
    s.open_alert_form();
    assert_eq!(s.alert_form.as_ref().unwrap().coin, "bitcoin");

    assert!(s.submit_alert_form().is_none());
    assert!(s.alert_form.as_ref().unwrap().error.is_some());

    {
        let form = s.alert_form.as_mut().unwrap();
        form.email = "me@example.com".to_string();
        form.price = "45000".to_string();
    }
    let new_alert = s.submit_alert_form().unwrap();
    assert_eq!(new_alert.coin, "bitcoin");
    assert_eq!(new_alert.condition, AlertCondition::Above);
    assert!(s.alert_form.is_none());
}

#[test]
fn indicator_and_theme_toggles_are_logged() {
    let mut s = state();
    s.toggle_indicator(IndicatorKind::Rsi);
    s.toggle_indicator(IndicatorKind::Rsi);
    s.toggle_theme();
    assert_eq!(
        s.log_messages,
        vec![
            "RSI(14) on".to_string(),
            "RSI(14) off".to_string(),
            "Theme: Dark".to_string(),
        ]
    );
}
