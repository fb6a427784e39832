use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Latest price of one coin as reported by `/api/prices`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceSnapshot {
    pub coin: String,
    pub price: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Time-ordered price history for one coin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    prices: Vec<f64>,
    timestamps: Vec<DateTime<Utc>>,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>, timestamps: Vec<DateTime<Utc>>) -> Result<Self, AppError> {
        if prices.len() != timestamps.len() {
            return Err(AppError::SeriesMismatch {
                prices: prices.len(),
                timestamps: timestamps.len(),
            });
        }
        Ok(Self { prices, timestamps })
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn first_price(&self) -> Option<f64> {
        self.prices.first().copied()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().copied()
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a backend timestamp string. Offset-less values are SQLite
/// `CURRENT_TIMESTAMP` output and are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn timestamp_from_value(v: serde_json::Value) -> Result<DateTime<Utc>, String> {
    match v {
        serde_json::Value::Number(n) => {
            let ms = n
                .as_f64()
                .ok_or_else(|| "invalid numeric timestamp".to_string())?;
            Utc.timestamp_millis_opt(ms as i64)
                .single()
                .ok_or_else(|| format!("timestamp out of range: {}", ms))
        }
        serde_json::Value::String(s) => {
            parse_timestamp(&s).ok_or_else(|| format!("unrecognised timestamp '{}'", s))
        }
        other => Err(format!("invalid timestamp value: {}", other)),
    }
}

/// Accept epoch milliseconds or a date-time string.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    timestamp_from_value(v).map_err(serde::de::Error::custom)
}

pub fn deserialize_timestamps<'de, D>(deserializer: D) -> Result<Vec<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(timestamp_from_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_rejects_mismatched_lengths() {
        let err = PriceSeries::new(vec![1.0, 2.0], vec![Utc::now()]).unwrap_err();
        assert!(matches!(
            err,
            AppError::SeriesMismatch {
                prices: 2,
                timestamps: 1
            }
        ));
    }

    #[test]
    fn parses_sqlite_and_rfc3339_strings() {
        let a = parse_timestamp("2024-03-01 12:30:00").unwrap();
        let b = parse_timestamp("2024-03-01T12:30:00Z").unwrap();
        let c = parse_timestamp("2024-03-01T14:30:00+02:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn snapshot_accepts_numeric_millis() {
        let snap: PriceSnapshot =
            serde_json::from_str(r#"{"coin":"bitcoin","price":65000.5,"timestamp":1700000000000}"#)
                .unwrap();
        assert_eq!(snap.timestamp.timestamp_millis(), 1_700_000_000_000);
    }
}
