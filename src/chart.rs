//! Keeps the chart display in step with the loaded price history, the
//! active indicator overlay and the colour theme.
//!
//! [`ChartSync`] owns the unindicated series so an overlay can be switched
//! on, off or swapped without refetching. Every mutation rebuilds the
//! whole [`ChartDisplay`] from that series, so a previous overlay can never
//! survive a switch.

use chrono::{DateTime, Utc};
use ratatui::style::Color;

use crate::error::AppError;
use crate::format::format_hhmm;
use crate::indicator::{Axis, IndicatorKind, IndicatorPeriods};
use crate::model::coin::display_name;
use crate::model::price::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                text: Color::Black,
                muted: Color::DarkGray,
                grid: Color::Gray,
                up: Color::Green,
                down: Color::Red,
                sma: Color::Blue,
                ema: Color::Magenta,
                rsi: Color::Rgb(204, 120, 0),
            },
            Theme::Dark => Palette {
                text: Color::White,
                muted: Color::Gray,
                grid: Color::DarkGray,
                up: Color::LightGreen,
                down: Color::LightRed,
                sma: Color::LightBlue,
                ema: Color::LightMagenta,
                rsi: Color::Yellow,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub grid: Color,
    pub up: Color,
    pub down: Color,
    pub sma: Color,
    pub ema: Color,
    pub rsi: Color,
}

impl Palette {
    pub fn indicator(&self, kind: IndicatorKind) -> Color {
        match kind {
            IndicatorKind::Sma => self.sma,
            IndicatorKind::Ema => self.ema,
            IndicatorKind::Rsi => self.rsi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Up only when the newest price is strictly above the oldest.
    pub fn of(series: &PriceSeries) -> Self {
        match (series.first_price(), series.last_price()) {
            (Some(first), Some(last)) if last > first => Trend::Up,
            _ => Trend::Down,
        }
    }
}

/// One plotted line. `offset` is the x index of `values[0]` on the base series.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub offset: usize,
    pub axis: Axis,
    pub color: Color,
}

impl Dataset {
    /// `(x, y)` pairs in base-series coordinates.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (self.offset + i, v))
    }
}

/// What the chart widget draws. Only [`ChartSync`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDisplay {
    pub title: String,
    pub labels: Vec<String>,
    pub base: Dataset,
    pub overlay: Option<Dataset>,
    pub theme: Theme,
    pub palette: Palette,
    pub trend: Trend,
    pub revision: u64,
}

impl ChartDisplay {
    fn placeholder(theme: Theme) -> Self {
        let palette = theme.palette();
        Self {
            title: "Loading...".to_string(),
            labels: Vec::new(),
            base: Dataset {
                label: "Price (USD)".to_string(),
                values: Vec::new(),
                offset: 0,
                axis: Axis::Price,
                color: palette.down,
            },
            overlay: None,
            theme,
            palette,
            trend: Trend::Down,
            revision: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartSync {
    coin: String,
    original: PriceSeries,
    active: Option<IndicatorKind>,
    periods: IndicatorPeriods,
    no_data: bool,
    display: ChartDisplay,
}

impl ChartSync {
    pub fn new(coin: &str, periods: IndicatorPeriods, theme: Theme) -> Self {
        Self {
            coin: coin.to_string(),
            original: PriceSeries::default(),
            active: None,
            periods,
            no_data: false,
            display: ChartDisplay::placeholder(theme),
        }
    }

    pub fn coin(&self) -> &str {
        &self.coin
    }

    pub fn active(&self) -> Option<IndicatorKind> {
        self.active
    }

    pub fn original(&self) -> &PriceSeries {
        &self.original
    }

    pub fn periods(&self) -> IndicatorPeriods {
        self.periods
    }

    pub fn theme(&self) -> Theme {
        self.display.theme
    }

    pub fn display(&self) -> &ChartDisplay {
        &self.display
    }

    /// Replace the stored series for the current coin. A length mismatch is
    /// rejected and the previous display stays in place.
    pub fn set_base_series(
        &mut self,
        prices: Vec<f64>,
        timestamps: Vec<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let series = PriceSeries::new(prices, timestamps)?;
        self.original = series;
        self.no_data = false;
        self.redraw();
        Ok(())
    }

    /// Load a fetched history, switching the chart to `coin`.
    pub fn load_history(&mut self, coin: &str, series: PriceSeries) {
        self.coin = coin.to_string();
        self.original = series;
        self.no_data = false;
        self.redraw();
    }

    /// Backend had nothing for `coin`. The previous coin's series is dropped
    /// so nothing on screen belongs to another coin.
    pub fn mark_no_data(&mut self, coin: &str) {
        self.coin = coin.to_string();
        self.original = PriceSeries::default();
        self.no_data = true;
        self.redraw();
    }

    /// Show `kind`, or hide it when it is already showing.
    pub fn toggle_indicator(&mut self, kind: IndicatorKind) -> Option<IndicatorKind> {
        self.active = if self.active == Some(kind) {
            None
        } else {
            Some(kind)
        };
        self.redraw();
        self.active
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.display.theme = theme;
        self.redraw();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.display.theme.toggled());
        self.display.theme
    }

    fn redraw(&mut self) {
        let theme = self.display.theme;
        let palette = theme.palette();
        let trend = Trend::of(&self.original);
        let name = display_name(&self.coin);

        let title = if self.no_data {
            format!("{} - No data available", name)
        } else if self.original.is_empty() {
            name.clone()
        } else {
            format!("{} - Last {} prices", name, self.original.len())
        };

        let base = Dataset {
            label: format!("{} Price", name),
            values: self.original.prices().to_vec(),
            offset: 0,
            axis: Axis::Price,
            color: match trend {
                Trend::Up => palette.up,
                Trend::Down => palette.down,
            },
        };

        let overlay = self.active.map(|kind| {
            let values = self.periods.compute(kind, self.original.prices());
            Dataset {
                label: self.periods.label(kind),
                offset: self.original.len() - values.len(),
                values,
                axis: kind.axis(),
                color: palette.indicator(kind),
            }
        });

        self.display = ChartDisplay {
            title,
            labels: self.original.timestamps().iter().map(format_hhmm).collect(),
            base,
            overlay,
            theme,
            palette,
            trend,
            revision: self.display.revision + 1,
        };

        tracing::debug!(
            coin = %self.coin,
            points = self.original.len(),
            indicator = self.active.map(IndicatorKind::short_name).unwrap_or("none"),
            ?theme,
            "Chart redrawn"
        );
    }
}
