/// Simple Moving Average using a ring buffer for O(1) push.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            buffer: vec![0.0; period],
            head: 0,
            count: 0,
            sum: 0.0,
        }
    }

    /// Push a new value, return the current SMA if the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.count >= self.period {
            self.sum -= self.buffer[self.head];
        }
        self.buffer[self.head] = value;
        self.sum += value;
        self.head = (self.head + 1) % self.period;
        if self.count < self.period {
            self.count += 1;
        }
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.is_ready() {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.period
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// SMA over a whole series. Output `i` is the mean of `data[i..i + period]`,
/// so the result has `data.len() - period + 1` values, or none when the
/// series is shorter than the window.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let mut acc = Sma::new(period);
    data.iter().filter_map(|&v| acc.push(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_matches_window_means() {
        let mut sma = Sma::new(3);
        assert_eq!(sma.push(1.0), None);
        assert_eq!(sma.push(2.0), None);
        assert!(!sma.is_ready());
        assert!((sma.push(3.0).unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((sma.push(4.0).unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn series_of_five_with_period_three() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out.len(), 3);
        for (got, want) in out.iter().zip([2.0, 3.0, 4.0]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn short_series_and_zero_period_yield_nothing() {
        assert!(sma(&[1.0, 2.0], 3).is_empty());
        assert!(sma(&[], 1).is_empty());
        assert!(sma(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn output_length_is_len_minus_period_plus_one() {
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64).sin()).collect();
        for period in 1..=40 {
            assert_eq!(sma(&data, period).len(), data.len() - period + 1);
        }
    }

    #[test]
    #[should_panic(expected = "SMA period must be > 0")]
    fn zero_period_panics() {
        Sma::new(0);
    }
}
