//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing which two percentiles are
//! given and editing their values, then renders the fitted density with the
//! three resolved points marked.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::RunOutput;
use crate::cli::FitArgs;
use crate::domain::{FitConfig, Observation, Percentile};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::DensityChart;

/// Start the TUI.
pub fn run(args: FitArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which two of the three percentiles the user supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GivenPair {
    TypicalSerious,
    TypicalExtreme,
    SeriousExtreme,
}

impl GivenPair {
    fn percentiles(self) -> (Percentile, Percentile) {
        match self {
            GivenPair::TypicalSerious => (Percentile::P50, Percentile::P80),
            GivenPair::TypicalExtreme => (Percentile::P50, Percentile::P95),
            GivenPair::SeriousExtreme => (Percentile::P80, Percentile::P95),
        }
    }

    fn from_percentiles(a: Percentile, b: Percentile) -> Option<Self> {
        let mut pair = [a, b];
        pair.sort();
        match pair {
            [Percentile::P50, Percentile::P80] => Some(GivenPair::TypicalSerious),
            [Percentile::P50, Percentile::P95] => Some(GivenPair::TypicalExtreme),
            [Percentile::P80, Percentile::P95] => Some(GivenPair::SeriousExtreme),
            _ => None,
        }
    }

    fn next(self) -> Self {
        match self {
            GivenPair::TypicalSerious => GivenPair::TypicalExtreme,
            GivenPair::TypicalExtreme => GivenPair::SeriousExtreme,
            GivenPair::SeriousExtreme => GivenPair::TypicalSerious,
        }
    }

    fn prev(self) -> Self {
        match self {
            GivenPair::TypicalSerious => GivenPair::SeriousExtreme,
            GivenPair::TypicalExtreme => GivenPair::TypicalSerious,
            GivenPair::SeriousExtreme => GivenPair::TypicalExtreme,
        }
    }

    fn label(self) -> String {
        let (a, b) = self.percentiles();
        format!("{} + {}", a.display_name(), b.display_name())
    }
}

struct App {
    pair: GivenPair,
    /// Raw text inputs for the two given values (parsed on every recompute).
    value_inputs: [String; 2],
    selected_field: usize,
    editing_value: bool,
    status: String,
    samples: usize,
    run: Option<RunOutput>,
}

impl App {
    fn new(args: &FitArgs) -> Self {
        // Seed from CLI flags when the user supplied a valid pair; otherwise
        // start from a small worked example so the chart renders immediately.
        let seeded = crate::app::observations_from_args(args)
            .ok()
            .and_then(|(a, b)| {
                GivenPair::from_percentiles(a.percentile, b.percentile).map(|pair| (pair, a, b))
            });

        let (pair, v1, v2) = match seeded {
            Some((pair, a, b)) => (pair, fmt_value(a.value), fmt_value(b.value)),
            None => (GivenPair::TypicalSerious, "100".to_string(), "150".to_string()),
        };

        let mut app = Self {
            pair,
            value_inputs: [v1, v2],
            selected_field: 0,
            editing_value: false,
            status: String::new(),
            samples: args.samples.max(2),
            run: None,
        };
        app.recompute();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_value {
            self.handle_value_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field >= 1 {
                    self.editing_value = true;
                    self.status = "Editing value (digits and '.'). Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('s') => self.save_fit(),
            _ => {}
        }

        false
    }

    fn handle_value_edit(&mut self, code: KeyCode) {
        let idx = self.selected_field - 1;
        match code {
            KeyCode::Esc => {
                self.editing_value = false;
                self.status = "Value edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_value = false;
                self.recompute();
            }
            KeyCode::Backspace => {
                self.value_inputs[idx].pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' {
                    self.value_inputs[idx].push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                self.pair = if delta >= 0 { self.pair.next() } else { self.pair.prev() };
                self.recompute();
            }
            1 | 2 => {
                let idx = self.selected_field - 1;
                // Multiplicative steps keep the value positive.
                if let Ok(v) = self.value_inputs[idx].trim().parse::<f64>() {
                    let stepped = if delta >= 0 { v * 1.05 } else { v / 1.05 };
                    self.value_inputs[idx] = fmt_value(stepped);
                }
                self.recompute();
            }
            _ => {}
        }
    }

    fn save_fit(&mut self) {
        let Some(run) = &self.run else {
            self.status = "Nothing to save - fix the inputs first.".to_string();
            return;
        };

        let path = Path::new("lnp_fit.json");
        match crate::io::fit_file::write_fit_json(path, &run.resolution, &run.grid) {
            Ok(()) => self.status = format!("Wrote fit JSON: {}", path.display()),
            Err(err) => self.status = format!("Fit JSON write failed: {err}"),
        }
    }

    /// Rebuild the whole resolution from the current inputs.
    ///
    /// Everything downstream of the inputs is recomputed from scratch: there
    /// is no cached fit state to invalidate.
    fn recompute(&mut self) {
        self.run = None;

        let (pa, pb) = self.pair.percentiles();
        let mut parsed = [0.0_f64; 2];
        for i in 0..2 {
            let raw = self.value_inputs[i].trim().to_string();
            match raw.parse::<f64>() {
                Ok(v) => parsed[i] = v,
                Err(_) => {
                    self.status = format!("'{raw}' is not a number.");
                    return;
                }
            }
        }

        let config = FitConfig {
            obs1: Observation::new(pa, parsed[0]),
            obs2: Observation::new(pb, parsed[1]),
            grid_points: self.samples,
            plot: false,
            plot_width: 0,
            plot_height: 0,
            export_results: None,
            export_fit: None,
        };

        match crate::app::pipeline::run_fit(&config) {
            Ok(run) => {
                self.status = if run.resolution.fit.inconsistent {
                    "Inconsistent inputs - see caution above.".to_string()
                } else {
                    "Fit updated.".to_string()
                };
                self.run = Some(run);
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("lnp", Style::default().fg(Color::Cyan)),
            Span::raw(" — log-normal distribution from two percentiles"),
        ]));

        match &self.run {
            Some(run) => {
                let params = run.resolution.fit.params;
                let derived = run.resolution.derived_point();
                lines.push(Line::from(Span::styled(
                    format!(
                        "mu={:.5} | sigma={:.5} | {}: {}",
                        params.mu,
                        params.sigma,
                        derived.percentile.display_name(),
                        fmt_value(derived.value),
                    ),
                    Style::default().fg(Color::Gray),
                )));

                if run.resolution.fit.inconsistent {
                    lines.push(Line::from(Span::styled(
                        "CAUTION: sigma <= 0 - the higher percentile should have the larger value.",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                }
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "No fit - enter two positive values.",
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Density").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for valid inputs...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (curve, markers, x_bounds, y_bounds) = chart_series(run);
        let widget = DensityChart {
            curve: &curve,
            markers: &markers,
            x_bounds,
            y_bounds,
            x_label: "x",
            y_label: "pdf",
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };

        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (pa, pb) = self.pair.percentiles();

        let mut items = Vec::new();
        items.push(ListItem::new(format!("Given: {}", self.pair.label())));
        items.push(ListItem::new(format!(
            "Value for {}: {}",
            pa.display_name(),
            self.value_inputs[0]
        )));
        items.push(ListItem::new(format!(
            "Value for {}: {}",
            pb.display_name(),
            self.value_inputs[1]
        )));

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_value {
            let hint = Paragraph::new("Editing value…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit value  s save fit  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build chart series for Plotters.
fn chart_series(run: &RunOutput) -> (Vec<(f64, f64)>, Vec<(f64, RGBColor)>, [f64; 2], [f64; 2]) {
    let curve: Vec<(f64, f64)> = run
        .grid
        .x
        .iter()
        .zip(run.grid.pdf.iter())
        .map(|(&x, &y)| (x, y))
        .collect();

    let markers: Vec<(f64, RGBColor)> = run
        .resolution
        .points
        .iter()
        .map(|p| (p.value, marker_color(p.percentile)))
        .collect();

    let mut x0 = f64::INFINITY;
    let mut x1 = f64::NEG_INFINITY;
    let mut y0 = 0.0_f64;
    let mut y1 = f64::NEG_INFINITY;
    for &(x, y) in &curve {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }

    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        x0 = 1e-3;
        x1 = 1.0;
    }
    if !y1.is_finite() || y1 <= y0 {
        y1 = y0 + 1.0;
    }

    let pad = ((y1 - y0).abs() * 0.05).max(1e-12);
    let y_bounds = [y0, y1 + pad];

    (curve, markers, [x0, x1], y_bounds)
}

/// Per-percentile marker colors (blue / orange / green), kept high-contrast
/// for terminal rendering.
fn marker_color(p: Percentile) -> RGBColor {
    match p {
        Percentile::P50 => RGBColor(0, 128, 255),
        Percentile::P80 => RGBColor(255, 165, 0),
        Percentile::P95 => RGBColor(0, 255, 0),
    }
}

fn fmt_value(v: f64) -> String {
    // Trim trailing zeros so edited values stay pleasant to read.
    let s = format!("{v:.5}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.1}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.4}")
}
