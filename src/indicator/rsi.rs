use std::collections::VecDeque;

/// Relative Strength Index over simple (not Wilder-smoothed) averages.
///
/// Each output is built from the `period` price moves that precede the
/// newest move, so a series of `n` prices yields `n - period - 1` values.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_price: Option<f64>,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
    rsi: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            period,
            prev_price: None,
            gains: VecDeque::with_capacity(period),
            losses: VecDeque::with_capacity(period),
            rsi: None,
        }
    }

    pub fn push(&mut self, price: f64) -> Option<f64> {
        let prev = self.prev_price.replace(price)?;
        let delta = price - prev;

        let out = if self.gains.len() == self.period {
            Some(self.window_rsi())
        } else {
            None
        };

        if self.gains.len() == self.period {
            self.gains.pop_front();
            self.losses.pop_front();
        }
        self.gains.push_back(delta.max(0.0));
        self.losses.push_back((-delta).max(0.0));

        self.rsi = out;
        out
    }

    fn window_rsi(&self) -> f64 {
        let n = self.period as f64;
        let avg_gain = self.gains.iter().sum::<f64>() / n;
        let avg_loss = self.losses.iter().sum::<f64>() / n;
        if avg_loss == 0.0 {
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }

    pub fn value(&self) -> Option<f64> {
        self.rsi
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// RSI over a whole series; empty unless there are more than `period + 1` prices.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 2 {
        return Vec::new();
    }
    let mut acc = Rsi::new(period);
    data.iter().filter_map(|&v| acc.push(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_series_saturates_at_100() {
        let data: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let out = rsi(&data, 14);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn falling_series_is_zero() {
        let data: Vec<f64> = (1..=20).rev().map(|i| i as f64).collect();
        let out = rsi(&data, 14);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|&v| v.abs() < f64::EPSILON));
    }

    #[test]
    fn flat_series_takes_zero_loss_branch() {
        let out = rsi(&[50.0; 10], 3);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn window_excludes_newest_move() {
        // moves: +1, -1, +2, -4 ; period 2
        // out[0] from (+1, -1): gain .5 loss .5 -> 50
        // out[1] from (-1, +2): gain 1 loss .5 -> 66.67
        let out = rsi(&[10.0, 11.0, 10.0, 12.0, 8.0], 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 50.0).abs() < 1e-9);
        assert!((out[1] - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn too_short_is_empty() {
        assert!(rsi(&[1.0, 2.0, 3.0], 2).is_empty());
        assert!(rsi(&[1.0; 30], 0).is_empty());
    }
}
