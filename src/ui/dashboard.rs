use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::alert::{Alert, AlertField, AlertForm};
use crate::chart::Palette;
use crate::event::ApiStatus;
use crate::format::{format_hhmm, format_usd};
use crate::model::coin::{coin_info, display_name};
use crate::model::price::PriceSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceMove {
    Up,
    Down,
    Unchanged,
}

pub struct StatusBar<'a> {
    pub api_status: ApiStatus,
    pub last_update: Option<String>,
    pub coin: &'a str,
    pub data_points: usize,
    pub indicator: Option<String>,
    pub palette: Palette,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let palette = self.palette;
        let muted = Style::default().fg(palette.muted);
        let api = match self.api_status {
            ApiStatus::Online => Span::styled("Online", Style::default().fg(palette.up)),
            ApiStatus::Offline => Span::styled(
                "Offline",
                Style::default().fg(palette.down).add_modifier(Modifier::BOLD),
            ),
            ApiStatus::Unknown => Span::styled("Connecting", Style::default().fg(Color::Yellow)),
        };
        let sep = || Span::styled(" | ", muted);

        let line = Line::from(vec![
            Span::styled(
                " coin-dashboard ",
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(display_name(self.coin), Style::default().fg(Color::Cyan)),
            sep(),
            api,
            sep(),
            Span::styled(
                match &self.last_update {
                    Some(t) => format!("Last update: {}", t),
                    None => "Last update: --:--:--".to_string(),
                },
                muted,
            ),
            sep(),
            Span::styled(
                format!("points: {}", self.data_points),
                muted,
            ),
            sep(),
            Span::styled(
                self.indicator.unwrap_or_else(|| "no indicator".to_string()),
                Style::default().fg(Color::Yellow),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct PriceCards<'a> {
    pub prices: &'a [PriceSnapshot],
    pub moves: &'a [PriceMove],
    pub selected: &'a str,
    pub palette: Palette,
}

impl Widget for PriceCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.prices.is_empty() {
            let block = Block::default()
                .title(" Prices ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow));
            Paragraph::new(
                "No price data available. Make sure the data fetcher is running!",
            )
            .style(Style::default().fg(Color::Yellow))
            .block(block)
            .render(area, buf);
            return;
        }

        let constraints = vec![Constraint::Ratio(1, self.prices.len() as u32); self.prices.len()];
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, snap) in self.prices.iter().enumerate() {
            let selected = snap.coin == self.selected;
            let price_color = match self.moves.get(i).copied().unwrap_or(PriceMove::Unchanged) {
                PriceMove::Up => self.palette.up,
                PriceMove::Down => self.palette.down,
                PriceMove::Unchanged => self.palette.text,
            };
            let border = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.palette.grid)
            };
            let block = Block::default()
                .title(format!(" {} ", display_name(&snap.coin)))
                .borders(Borders::ALL)
                .border_style(border);
            let lines = vec![
                Line::from(Span::styled(
                    format_usd(snap.price),
                    Style::default().fg(price_color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format_hhmm(&snap.timestamp),
                    Style::default().fg(self.palette.muted),
                )),
            ];
            Paragraph::new(lines).block(block).render(cells[i], buf);
        }
    }
}

pub struct CoinInfoPanel<'a> {
    pub coin: &'a str,
    pub current_price: Option<f64>,
    pub indicator_value: Option<(String, f64)>,
    pub palette: Palette,
}

impl Widget for CoinInfoPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let info = coin_info(self.coin);
        let label = Style::default().fg(self.palette.muted);
        let value = Style::default().fg(self.palette.text).add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} ({})", info.name, info.symbol),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(info.description.clone(), label)),
            Line::from(vec![
                Span::styled("Current Price:   ", label),
                Span::styled(
                    self.current_price
                        .map(format_usd)
                        .unwrap_or_else(|| "---".to_string()),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Market Cap Rank: ", label),
                Span::styled(info.rank_label(), value),
            ]),
        ];
        if let Some((name, v)) = self.indicator_value {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", name), label),
                Span::styled(format!("{:.2}", v), Style::default().fg(Color::Yellow)),
            ]));
        }

        let block = Block::default()
            .title(" Coin ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.grid));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct AlertsPanel<'a> {
    pub alerts: &'a [Alert],
    pub selected: usize,
    pub triggered_ids: &'a [i64],
    pub palette: Palette,
}

impl Widget for AlertsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Alerts ({}) ", self.alerts.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.grid));

        if self.alerts.is_empty() {
            Paragraph::new(Span::styled(
                "No alerts. Press [N] to add one.",
                Style::default().fg(self.palette.muted),
            ))
            .block(block)
            .render(area, buf);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = self.selected.saturating_sub(inner_height.saturating_sub(1));
        let lines: Vec<Line> = self
            .alerts
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(i, alert)| {
                let fired = self.triggered_ids.contains(&alert.id);
                let mut style = if fired {
                    Style::default().fg(self.palette.down).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.palette.text)
                };
                if i == self.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(
                    format!(
                        "{}#{} {} {} {} {}",
                        if fired { "! " } else { "  " },
                        alert.id,
                        coin_info(&alert.coin).symbol,
                        alert.condition,
                        format_usd(alert.price),
                        alert.email
                    ),
                    style,
                ))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Centered `width` x `height` box inside `area`, clipped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub struct AlertFormPopup<'a> {
    pub form: &'a AlertForm,
    pub palette: Palette,
}

impl Widget for AlertFormPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(56, 11, area);
        Clear.render(popup, buf);

        let fields = [
            AlertField::Email,
            AlertField::Coin,
            AlertField::Condition,
            AlertField::Price,
        ];
        let mut lines: Vec<Line> = fields
            .iter()
            .map(|&field| {
                let focused = field == self.form.focus;
                let marker = if focused { "> " } else { "  " };
                let value_style = if focused {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.palette.text)
                };
                let mut value = self.form.field_value(field);
                if focused && field != AlertField::Condition {
                    value.push('_');
                }
                Line::from(vec![
                    Span::styled(
                        format!("{}{:<10}", marker, field.label()),
                        Style::default().fg(self.palette.muted),
                    ),
                    Span::styled(value, value_style),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        match &self.form.error {
            Some(err) => lines.push(Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(self.palette.down),
            ))),
            None => lines.push(Line::from("")),
        }
        lines.push(Line::from(Span::styled(
            "[Tab] next  [Space] above/below  [Enter] save  [Esc] cancel",
            Style::default().fg(self.palette.muted),
        )));

        let block = Block::default()
            .title(" New Price Alert ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(popup, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else if msg.starts_with("[WARN]") || msg.starts_with("[ALERT]") {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
        let text = |t: &'static str| Span::styled(t, Style::default().fg(Color::DarkGray));
        let line = Line::from(vec![
            key(" [Q]"),
            text("uit  "),
            key("[1]"),
            text("SMA "),
            key("[2]"),
            text("EMA "),
            key("[3]"),
            text("RSI  "),
            key("[T]"),
            text("heme  "),
            key("[←/→]"),
            text("coin  "),
            key("[R]"),
            text("efresh  "),
            key("[N]"),
            text("ew alert  "),
            key("[J/K]"),
            text("select  "),
            key("[X]"),
            text(" delete"),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
