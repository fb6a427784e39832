pub mod ema;
pub mod rsi;
pub mod sma;

pub use ema::{ema, Ema};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};

/// Overlay indicators the chart can show, at most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
}

/// Which value scale an overlay is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Shared with the price line.
    Price,
    /// Fixed 0..=100 oscillator scale.
    Oscillator,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 3] = [IndicatorKind::Sma, IndicatorKind::Ema, IndicatorKind::Rsi];

    pub fn short_name(self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema => Axis::Price,
            IndicatorKind::Rsi => Axis::Oscillator,
        }
    }
}

/// Lookback periods for each indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPeriods {
    pub sma: usize,
    pub ema: usize,
    pub rsi: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            sma: 5,
            ema: 5,
            rsi: 14,
        }
    }
}

impl IndicatorPeriods {
    pub fn period_of(&self, kind: IndicatorKind) -> usize {
        match kind {
            IndicatorKind::Sma => self.sma,
            IndicatorKind::Ema => self.ema,
            IndicatorKind::Rsi => self.rsi,
        }
    }

    /// Compute `kind` over `prices`; too-short input gives an empty series.
    pub fn compute(&self, kind: IndicatorKind, prices: &[f64]) -> Vec<f64> {
        let period = self.period_of(kind);
        match kind {
            IndicatorKind::Sma => sma(prices, period),
            IndicatorKind::Ema => ema(prices, period),
            IndicatorKind::Rsi => rsi(prices, period),
        }
    }

    pub fn label(&self, kind: IndicatorKind) -> String {
        format!("{}({})", kind.short_name(), self.period_of(kind))
    }
}
