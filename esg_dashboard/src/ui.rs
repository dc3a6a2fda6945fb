use std::collections::VecDeque;
use std::time::{Duration, Instant};

use esg_core::dashboard_config::CelebrationConfig;
use esg_core::radar::{RadarProfile, RING_SCORES};
use esg_core::{AnalysisOutcome, DashboardConfig, Theme, Treatment};
use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::controls::{ControlId, InputPanel};

const CELEBRATION_SPARKS: [&str; 4] = ["✦", "✧", "★", "·"];

pub enum ResultPanel {
    Idle,
    Ready(Box<AnalysisOutcome>),
    Failed(String),
}

pub struct UiState {
    pub inputs: InputPanel,
    pub theme: Theme,
    pub result: ResultPanel,
    pub logs: VecDeque<String>,
    pub max_logs: usize,
    celebration: CelebrationConfig,
    celebration_until: Option<Instant>,
    frame_counter: u64,
}

impl UiState {
    pub fn new(config: &DashboardConfig, theme: Theme) -> Self {
        Self {
            inputs: InputPanel::new(config.defaults.to_input(), config.controls.clone()),
            theme,
            result: ResultPanel::Idle,
            logs: VecDeque::new(),
            max_logs: 8,
            celebration: config.celebration.clone(),
            celebration_until: None,
            frame_counter: 0,
        }
    }

    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }

    pub fn record_outcome(&mut self, outcome: AnalysisOutcome, now: Instant) {
        self.celebration_until = (outcome.presentation.celebrate && self.celebration.enabled)
            .then(|| now + Duration::from_millis(self.celebration.duration_ms));
        self.result = ResultPanel::Ready(Box::new(outcome));
    }

    pub fn record_failure<S: Into<String>>(&mut self, message: S) {
        self.celebration_until = None;
        self.result = ResultPanel::Failed(message.into());
    }

    pub fn celebrating(&self, now: Instant) -> bool {
        self.celebration_until.is_some_and(|until| now < until)
    }

    pub fn advance_frame(&mut self) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
    }
}

struct Palette {
    background: Color,
    panel: Color,
    text: Color,
    muted: Color,
    accent: Color,
    border: BorderType,
    success: Color,
    warning: Color,
    error: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Flat => Self {
                background: Color::Rgb(248, 249, 250),
                panel: Color::Rgb(232, 245, 233),
                text: Color::Rgb(33, 37, 41),
                muted: Color::Rgb(108, 117, 125),
                accent: Color::Rgb(46, 125, 50),
                border: BorderType::Plain,
                success: Color::Rgb(46, 125, 50),
                warning: Color::Rgb(230, 145, 0),
                error: Color::Rgb(198, 40, 40),
            },
            Theme::Glass => Self {
                background: Color::Rgb(18, 32, 28),
                panel: Color::Rgb(34, 52, 46),
                text: Color::Rgb(236, 245, 240),
                muted: Color::Rgb(150, 170, 160),
                accent: Color::Rgb(129, 199, 132),
                border: BorderType::Rounded,
                success: Color::LightGreen,
                warning: Color::Yellow,
                error: Color::LightRed,
            },
        }
    }

    fn treatment(&self, treatment: Treatment) -> Color {
        match treatment {
            Treatment::Success => self.success,
            Treatment::Warning => self.warning,
            Treatment::Error => self.error,
        }
    }

    fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(self.border)
            .border_style(Style::default().fg(self.accent))
            .style(Style::default().bg(self.panel).fg(self.text))
            .title(title)
    }
}

pub fn draw_ui(frame: &mut Frame, state: &UiState) {
    let palette = Palette::for_theme(state.theme);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        frame.size(),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(18),
            Constraint::Length(7),
        ])
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(15), Constraint::Length(8)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(6)])
        .split(columns[1]);

    draw_header(frame, rows[0], &palette);
    draw_controls(frame, left[0], state, &palette);
    draw_commands(frame, left[1], &palette);
    draw_radar(frame, right[0], state, &palette);
    draw_result(frame, right[1], state, &palette);
    draw_logs(frame, rows[2], state, &palette);
}

fn draw_header(frame: &mut Frame, area: Rect, palette: &Palette) {
    let block = palette.block("Corporate Sustainability Intelligence");
    let lines = vec![
        Line::from(Span::styled(
            "ESG Judge Pro",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Simulate corporate metrics to predict ESG Tiers and analyze the balance between pillars.",
            Style::default().fg(palette.muted),
        )),
    ];
    let text = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(block, area);
    frame.render_widget(
        text,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_controls(frame: &mut Frame, area: Rect, state: &UiState, palette: &Palette) {
    let block = palette.block("Simulation Controls");
    frame.render_widget(block, area);
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(ControlId::ALL.map(|_| Constraint::Length(3)))
        .split(inner);

    let input = state.inputs.current();
    for (id, slot) in ControlId::ALL.iter().zip(slots.iter()) {
        let focused = state.inputs.focus() == *id;
        let title_style = if focused {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        let marker = if focused { "▶ " } else { "  " };
        let title = Line::from(Span::styled(format!("{marker}{}", id.label()), title_style));
        let field_block = Block::default()
            .borders(Borders::ALL)
            .border_type(palette.border)
            .border_style(Style::default().fg(if focused {
                palette.accent
            } else {
                palette.muted
            }))
            .title(title);

        match id.pillar() {
            Some(pillar) => {
                let value = input.pillar(pillar);
                let gauge = Gauge::default()
                    .block(field_block)
                    .gauge_style(Style::default().fg(palette.accent).bg(palette.panel))
                    .percent(u16::from(value))
                    .label(format!("{value} / 100"));
                frame.render_widget(gauge, *slot);
            }
            None => {
                let paragraph = Paragraph::new(Line::from(Span::styled(
                    state.inputs.display_value(*id),
                    Style::default().fg(palette.text),
                )))
                .block(field_block);
                frame.render_widget(paragraph, *slot);
            }
        }
    }
}

fn draw_commands(frame: &mut Frame, area: Rect, palette: &Palette) {
    let key = Style::default().fg(palette.warning);
    let lines = vec![
        Line::from(vec![
            Span::styled("tab/↑↓", key),
            Span::raw("  move between controls"),
        ]),
        Line::from(vec![
            Span::styled("←/→", key),
            Span::raw("     adjust (pgup/pgdn coarse)"),
        ]),
        Line::from(vec![
            Span::styled("0-9 . -", key),
            Span::raw(" type impact metrics"),
        ]),
        Line::from(vec![
            Span::styled("a/enter", key),
            Span::raw(" analyze company tier"),
        ]),
        Line::from(vec![
            Span::styled("r", key),
            Span::raw("       reset · "),
            Span::styled("q", key),
            Span::raw(" exit"),
        ]),
    ];
    let block = palette.block("Commands");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_radar(frame: &mut Frame, area: Rect, state: &UiState, palette: &Palette) {
    let profile = RadarProfile::from_input(&state.inputs.current());
    let outline = profile.polygon();
    let grid_color = palette.muted;
    let profile_color = palette.accent;
    let text_color = palette.text;

    let canvas = Canvas::default()
        .block(palette.block("Live Sustainability Profile"))
        .background_color(palette.panel)
        .marker(Marker::Braille)
        .x_bounds([-1.4, 1.4])
        .y_bounds([-1.25, 1.25])
        .paint(move |ctx| {
            for score in RING_SCORES {
                let ring = RadarProfile::ring(score);
                for ((x1, y1), (x2, y2)) in RadarProfile::segments(&ring) {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: grid_color,
                    });
                }
            }
            for axis in profile.axes() {
                let (x2, y2) = esg_core::radar::axis_point(axis.pillar, 100.0);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2,
                    y2,
                    color: grid_color,
                });
            }
            ctx.layer();
            for ((x1, y1), (x2, y2)) in RadarProfile::segments(&outline) {
                ctx.draw(&CanvasLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: profile_color,
                });
            }
            for axis in profile.axes() {
                let (x, y) = esg_core::radar::axis_point(axis.pillar, 112.0);
                ctx.print(
                    x - 0.2,
                    y,
                    Span::styled(
                        format!("{} {}", axis.pillar.label(), axis.score),
                        Style::default().fg(text_color),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_result(frame: &mut Frame, area: Rect, state: &UiState, palette: &Palette) {
    let now = Instant::now();
    let lines: Vec<Line> = match &state.result {
        ResultPanel::Idle => vec![Line::from(Span::styled(
            "Press a or enter to analyze the company tier.",
            Style::default().fg(palette.muted),
        ))],
        ResultPanel::Ready(outcome) => {
            let color = palette.treatment(outcome.presentation.treatment);
            let mut lines = vec![Line::from(vec![
                Span::raw("Result: "),
                Span::styled(
                    outcome.prediction.label.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])];
            if state.celebrating(now) {
                lines.push(celebration_line(state.frame_counter, area.width, palette));
            }
            lines
        }
        ResultPanel::Failed(message) => vec![
            Line::from(Span::styled(
                "Analysis failed",
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(message.clone(), Style::default().fg(palette.error))),
        ],
    };

    let block = palette.block("ESG Tier");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn celebration_line(frame_counter: u64, width: u16, palette: &Palette) -> Line<'static> {
    let colors = [palette.success, palette.warning, palette.accent];
    let spans: Vec<Span> = (0..width.saturating_sub(2) as u64)
        .map(|col| {
            let idx = ((col + frame_counter) % CELEBRATION_SPARKS.len() as u64) as usize;
            let color = colors[((col / 2 + frame_counter) % colors.len() as u64) as usize];
            Span::styled(CELEBRATION_SPARKS[idx], Style::default().fg(color))
        })
        .collect();
    Line::from(spans)
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState, palette: &Palette) {
    let block = palette.block("Logs");
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|entry| Line::from(Span::styled(entry.as_str(), Style::default().fg(palette.muted))))
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}
