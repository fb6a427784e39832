use super::sma::Sma;

/// Exponential Moving Average seeded with the SMA of its first window.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    ema: Option<f64>,
    seed: Sma,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            ema: None,
            seed: Sma::new(period),
        }
    }

    /// Push a new value, return the current EMA once the seed window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.ema = match self.ema {
            Some(prev) => Some((value - prev) * self.multiplier + prev),
            None => self.seed.push(value),
        };
        self.ema
    }

    pub fn value(&self) -> Option<f64> {
        self.ema
    }

    pub fn is_ready(&self) -> bool {
        self.ema.is_some()
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// EMA over a whole series. The first output lines up with `data[period - 1]`.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let mut acc = Ema::new(period);
    data.iter().filter_map(|&v| acc.push(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::sma::sma;

    #[test]
    fn seed_is_sma_of_first_window() {
        let data = [3.0, 7.0, 2.0, 9.0, 4.0, 6.0];
        let out = ema(&data, 4);
        let seed = sma(&data[..4], 4);
        assert_eq!(out.len(), 3);
        assert!((out[0] - seed[0]).abs() < f64::EPSILON);
    }

    #[test]
    fn linear_series_tracks_with_lag() {
        let mut e = Ema::new(3);
        assert_eq!(e.push(2.0), None);
        assert_eq!(e.push(5.0), None);
        assert!((e.push(8.0).unwrap() - 5.0).abs() < f64::EPSILON);
        assert!((e.push(11.0).unwrap() - 8.0).abs() < f64::EPSILON);
        assert!((e.push(14.0).unwrap() - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_series_is_constant() {
        assert_eq!(ema(&[10.0; 5], 3), vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn too_short_is_empty() {
        assert!(ema(&[1.0, 2.0], 3).is_empty());
        assert!(ema(&[1.0, 2.0], 0).is_empty());
    }
}
