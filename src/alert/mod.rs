pub mod form;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use form::{AlertField, AlertForm, AlertFormError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" => Some(AlertCondition::Above),
            "below" => Some(AlertCondition::Below),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AlertCondition::Above => AlertCondition::Below,
            AlertCondition::Below => AlertCondition::Above,
        }
    }

    /// Whether `price` satisfies this condition against `target`.
    pub fn is_met(self, price: f64, target: f64) -> bool {
        match self {
            AlertCondition::Above => price >= target,
            AlertCondition::Below => price <= target,
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored alert as listed by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub coin: String,
    pub condition: AlertCondition,
    pub price: f64,
    pub email: String,
}

/// Body of `POST /api/alerts/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAlert {
    pub email: String,
    pub coin: String,
    pub condition: AlertCondition,
    pub price: f64,
}

/// An alert whose condition holds at the latest price.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredAlert {
    pub alert_id: i64,
    pub coin: String,
    pub current_price: f64,
    pub target_price: f64,
    pub condition: AlertCondition,
}

/// Evaluate `alerts` against the latest price per coin. Coins with no
/// current price never trigger.
pub fn triggered_alerts(alerts: &[Alert], prices: &HashMap<String, f64>) -> Vec<TriggeredAlert> {
    alerts
        .iter()
        .filter_map(|alert| {
            let price = *prices.get(&alert.coin)?;
            alert
                .condition
                .is_met(price, alert.price)
                .then(|| TriggeredAlert {
                    alert_id: alert.id,
                    coin: alert.coin.clone(),
                    current_price: price,
                    target_price: alert.price,
                    condition: alert.condition,
                })
        })
        .collect()
}
