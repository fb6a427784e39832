use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::chart::{ChartDisplay, Dataset};
use crate::format::format_price;
use crate::indicator::Axis;

const BASE_MARK: &str = "•";
const OVERLAY_MARK: &str = "*";
const RSI_UPPER_GUIDE: f64 = 70.0;
const RSI_LOWER_GUIDE: f64 = 30.0;

pub struct PriceChart<'a> {
    display: &'a ChartDisplay,
}

impl<'a> PriceChart<'a> {
    pub fn new(display: &'a ChartDisplay) -> Self {
        Self { display }
    }
}

/// Row for `value` inside a band `top..top + height`, highest value on top.
fn row_for(value: f64, lo: f64, hi: f64, top: u16, height: u16) -> u16 {
    let range = hi - lo;
    let range = if range < 1e-9 { 1.0 } else { range };
    let normalized = ((value - lo) / range).clamp(0.0, 1.0);
    let steps = height.saturating_sub(1) as f64;
    top + (steps - (normalized * steps).round()) as u16
}

fn plot(
    buf: &mut Buffer,
    band: Rect,
    dataset: &Dataset,
    start: usize,
    lo: f64,
    hi: f64,
    mark: &str,
) {
    let style = Style::default().fg(dataset.color);
    for (x, value) in dataset.points() {
        if x < start || !value.is_finite() {
            continue;
        }
        let col = band.x + (x - start) as u16;
        if col >= band.x + band.width {
            break;
        }
        let row = row_for(value, lo, hi, band.y, band.height);
        buf.set_string(col, row, mark, style);
    }
}

fn value_range<'v>(values: impl Iterator<Item = &'v f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let d = self.display;
        let palette = d.palette;

        let mut title = vec![
            Span::styled(
                format!(" {} ", d.title),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("[{}] ", d.base.label), Style::default().fg(d.base.color)),
        ];
        if let Some(overlay) = &d.overlay {
            title.push(Span::styled(
                format!("[{}] ", overlay.label),
                Style::default().fg(overlay.color),
            ));
        }
        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.grid));
        let inner = block.inner(area);
        block.render(area, buf);

        if d.base.values.is_empty() || inner.height < 3 || inner.width < 8 {
            return;
        }

        // Oscillators get their own band under the price plot.
        let (price_area, osc_area) = match &d.overlay {
            Some(o) if o.axis == Axis::Oscillator && inner.height >= 8 => {
                let osc_h = inner.height / 3;
                (
                    Rect {
                        height: inner.height - osc_h,
                        ..inner
                    },
                    Some(Rect {
                        y: inner.y + inner.height - osc_h,
                        height: osc_h,
                        ..inner
                    }),
                )
            }
            _ => (inner, None),
        };

        let total = d.base.values.len();
        let visible = total.min(price_area.width as usize);
        let start = total - visible;

        // last row of the price band carries the time labels
        let plot_band = Rect {
            height: price_area.height - 1,
            ..price_area
        };

        let price_overlay = d.overlay.as_ref().filter(|o| o.axis == Axis::Price);
        let overlay_values = price_overlay
            .into_iter()
            .flat_map(|o| o.points().filter(|(x, _)| *x >= start).map(|(_, v)| v))
            .collect::<Vec<f64>>();
        let Some((lo, hi)) = value_range(d.base.values[start..].iter().chain(overlay_values.iter()))
        else {
            return;
        };

        plot(buf, plot_band, &d.base, start, lo, hi, BASE_MARK);
        if let Some(overlay) = price_overlay {
            plot(buf, plot_band, overlay, start, lo, hi, OVERLAY_MARK);
        }

        let muted = Style::default().fg(palette.muted);
        buf.set_string(plot_band.x, plot_band.y, format_price(hi), muted);
        buf.set_string(
            plot_band.x,
            plot_band.y + plot_band.height - 1,
            format_price(lo),
            muted,
        );

        let label_y = price_area.y + price_area.height - 1;
        if let Some(first) = d.labels.get(start) {
            buf.set_string(price_area.x, label_y, first, muted);
        }
        if let Some(last) = d.labels.last() {
            let x = (price_area.x + price_area.width).saturating_sub(last.chars().count() as u16);
            buf.set_string(x, label_y, last, muted);
        }

        if let (Some(band), Some(overlay)) = (osc_area, d.overlay.as_ref()) {
            render_oscillator(buf, band, overlay, start, palette.grid, muted);
        }
    }
}

fn render_oscillator(
    buf: &mut Buffer,
    band: Rect,
    overlay: &Dataset,
    start: usize,
    grid: Color,
    muted: Style,
) {
    let guide = Style::default().fg(grid);
    for level in [RSI_UPPER_GUIDE, RSI_LOWER_GUIDE] {
        let row = row_for(level, 0.0, 100.0, band.y, band.height);
        for col in band.x..band.x + band.width {
            buf.set_string(col, row, "-", guide);
        }
    }
    plot(buf, band, overlay, start, 0.0, 100.0, OVERLAY_MARK);
    buf.set_string(band.x, band.y, "100", muted);
    buf.set_string(band.x, band.y + band.height - 1, "0", muted);
}
