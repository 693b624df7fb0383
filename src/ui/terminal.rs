//! Full-screen terminal lyrics renderer
//!
//! Three stacked areas: a "Now Playing" header, the scrolling lyrics and a
//! progress gauge. Lyric layout works in pixels like the sync engine does;
//! one terminal row is `row_height` pixels tall, so a line that wraps onto
//! two rows reports twice the height.

use std::io;

use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};

use crate::features::lyrics::LyricLine;
use crate::features::lyrics::engine::SyncEffect;
use crate::features::lyrics::engine::layout::{lyrics_viewport_height, visible_range};
use crate::utils::{format_time, progress_percent};

use super::LyricsRenderer;

/// Rows taken by the bordered header
const HEADER_ROWS: u16 = 3;
/// Rows taken by the bordered progress gauge
const FOOTER_ROWS: u16 = 3;
/// Columns taken by the active-line marker
const MARKER_COLUMNS: u16 = 2;

/// Layout parameters for the terminal renderer
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalRendererConfig {
    /// Pixel height of one terminal row
    pub row_height: f32,
    /// Draw the progress gauge
    pub show_progress: bool,
}

impl Default for TerminalRendererConfig {
    fn default() -> Self {
        Self {
            row_height: 32.0,
            show_progress: true,
        }
    }
}

/// What is currently on screen
#[derive(Debug, Default)]
struct LyricsView {
    title: String,
    /// Wrapped rows of every bound line
    rows: Vec<Vec<String>>,
    /// Laid-out pixel height of every line
    heights: Vec<f32>,
    active: Option<usize>,
    offset: f32,
    status: String,
    /// Last sampled (current, duration)
    progress: Option<(f64, Option<f64>)>,
    /// Duration the footer is pinned to once playback finished
    completed: Option<f64>,
}

/// Renderer drawing on a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    config: TerminalRendererConfig,
    view: LyricsView,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>, config: TerminalRendererConfig) -> Self {
        Self {
            terminal,
            config,
            view: LyricsView {
                status: "stopped".to_string(),
                ..Default::default()
            },
        }
    }

    fn footer_rows(&self) -> u16 {
        if self.config.show_progress {
            FOOTER_ROWS
        } else {
            0
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let row_height = self.config.row_height.max(1.0);
        let footer_rows = self.footer_rows();
        let view = &self.view;

        self.terminal.draw(|frame| {
            render(frame, view, row_height, footer_rows);
        })?;
        Ok(())
    }
}

impl<B: Backend> LyricsRenderer for TerminalRenderer<B> {
    fn bind(&mut self, title: &str, lines: &[LyricLine]) -> io::Result<Vec<f32>> {
        let size = self.terminal.size()?;
        let columns = usize::from(size.width.saturating_sub(MARKER_COLUMNS).max(1));
        let row_height = self.config.row_height.max(1.0);

        self.view.title = title.to_string();
        self.view.rows = lines
            .iter()
            .map(|line| wrap_columns(&line.text, columns))
            .collect();
        self.view.heights = self
            .view
            .rows
            .iter()
            .map(|rows| rows.len() as f32 * row_height)
            .collect();
        self.view.active = None;
        self.view.offset = 0.0;
        self.view.completed = None;
        self.view.progress = self.view.progress.map(|(_, duration)| (0.0, duration));

        self.draw()?;
        Ok(self.view.heights.clone())
    }

    fn apply(&mut self, effects: &[SyncEffect]) -> io::Result<()> {
        for effect in effects {
            match *effect {
                SyncEffect::ActiveLineChanged { index, .. } => self.view.active = Some(index),
                SyncEffect::ScrollChanged { offset } => self.view.offset = offset,
                SyncEffect::Completed { duration } => self.view.completed = Some(duration),
            }
        }
        self.draw()
    }

    fn show_progress(&mut self, current: f64, duration: Option<f64>) -> io::Result<()> {
        self.view.progress = Some((current, duration));
        self.draw()
    }

    fn show_status(&mut self, status: &str) -> io::Result<()> {
        self.view.status = status.to_string();
        self.draw()
    }
}

/// Split text into rows of at most `columns` characters; never returns no rows
fn wrap_columns(text: &str, columns: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(columns.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn render(frame: &mut Frame, view: &LyricsView, row_height: f32, footer_rows: u16) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_ROWS),
        Constraint::Min(0),
        Constraint::Length(footer_rows),
    ])
    .split(area);

    render_header(frame, view, chunks[0]);

    let viewport = lyrics_viewport_height(
        f32::from(area.height) * row_height,
        f32::from(HEADER_ROWS) * row_height,
        f32::from(footer_rows) * row_height,
        row_height,
    );
    render_lyrics(frame, view, chunks[1], viewport, row_height);

    if footer_rows > 0 {
        render_progress(frame, view, chunks[2]);
    }
}

fn render_header(frame: &mut Frame, view: &LyricsView, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", view.status),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(view.title.as_str(), Style::default().fg(Color::White)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Now Playing "),
    );
    frame.render_widget(header, area);
}

fn render_lyrics(frame: &mut Frame, view: &LyricsView, area: Rect, viewport: f32, row_height: f32) {
    if view.rows.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  (no lyrics)",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(empty, area);
        return;
    }

    let range = visible_range(&view.heights, view.offset, viewport);

    // A partly scrolled-off first line is clipped by whole rows
    let top = view.offset + view.heights[..range.start].iter().sum::<f32>();
    let skip_rows = if top < 0.0 {
        (-top / row_height).round() as u16
    } else {
        0
    };

    let mut text = Vec::new();
    for idx in range {
        let active = view.active == Some(idx);
        let style = if active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        for (row_idx, row) in view.rows[idx].iter().enumerate() {
            let marker = if active && row_idx == 0 { "> " } else { "  " };
            text.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(row.as_str(), style),
            ]));
        }
    }

    let visible_rows = ((viewport / row_height).floor() as u16).min(area.height);
    let lyrics_area = Rect {
        height: visible_rows,
        ..area
    };
    frame.render_widget(Paragraph::new(text).scroll((skip_rows, 0)), lyrics_area);
}

fn render_progress(frame: &mut Frame, view: &LyricsView, area: Rect) {
    let (current, duration) = match (view.completed, view.progress) {
        // Pinned to the end once playback finished
        (Some(duration), _) => (duration, Some(duration)),
        (None, Some(progress)) => progress,
        (None, None) => (0.0, None),
    };

    let label = match duration {
        Some(duration) => format!("{} / {}", format_time(current), format_time(duration)),
        None => format!("{} / --:--", format_time(current)),
    };
    let percent = duration.map_or(0.0, |d| progress_percent(current, d));

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Progress "),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lyrics::parse_lyrics;
    use ratatui::backend::TestBackend;

    /// 30x12 terminal, 10px rows: 3 header rows, 6 lyric rows, 3 footer rows
    fn renderer(show_progress: bool) -> TerminalRenderer<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(30, 12)).unwrap();
        TerminalRenderer::new(
            terminal,
            TerminalRendererConfig {
                row_height: 10.0,
                show_progress,
            },
        )
    }

    fn screen(renderer: &TerminalRenderer<TestBackend>) -> Vec<String> {
        let buffer = renderer.terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn numbered_lyrics(count: usize) -> Vec<LyricLine> {
        let raw: String = (0..count)
            .map(|i| format!("[00:{:02}.00]line {}\n", i + 1, i))
            .collect();
        parse_lyrics(&raw)
    }

    #[test]
    fn test_wrap_columns() {
        assert_eq!(wrap_columns("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_columns("", 3), vec![""]);
    }

    #[test]
    fn test_bind_reports_wrapped_heights() {
        let mut r = renderer(true);
        let long = "x".repeat(40);
        let lines = parse_lyrics(&format!("[00:01.00]abc\n[00:02.00]{}", long));

        // 28 text columns after the marker
        let heights = r.bind("Song", &lines).unwrap();
        assert_eq!(heights, vec![10.0, 20.0]);

        let rows = screen(&r);
        assert!(rows[1].contains("Song"));
        assert!(rows[3].starts_with("  abc"));
        assert_eq!(rows[4].trim_end(), format!("  {}", "x".repeat(28)));
        assert_eq!(rows[5].trim_end(), format!("  {}", "x".repeat(12)));
    }

    #[test]
    fn test_bind_empty() {
        let mut r = renderer(true);
        assert!(r.bind("Song", &[]).unwrap().is_empty());
        assert!(screen(&r).iter().any(|row| row.contains("(no lyrics)")));
    }

    #[test]
    fn test_active_line_and_scroll() {
        let mut r = renderer(true);
        r.bind("Song", &numbered_lyrics(8)).unwrap();

        r.apply(&[
            SyncEffect::ActiveLineChanged {
                index: 6,
                previous: Some(5),
            },
            SyncEffect::ScrollChanged { offset: -20.0 },
        ])
        .unwrap();

        // 120px window - 30 header - 30 footer - 4 gap = 56px, 5 rows
        let rows = screen(&r);
        assert!(rows[3].starts_with("  line 2"));
        assert!(rows[7].starts_with("> line 6"));
        assert!(rows[8].trim().is_empty());
        assert!(!rows.iter().any(|row| row.contains("line 1")));
    }

    #[test]
    fn test_partial_scroll_clips_first_line() {
        let mut r = renderer(true);
        let long = "y".repeat(40);
        let lines = parse_lyrics(&format!("[00:01.00]{}\n[00:02.00]after", long));
        r.bind("Song", &lines).unwrap();

        r.apply(&[SyncEffect::ScrollChanged { offset: -10.0 }]).unwrap();

        let rows = screen(&r);
        assert_eq!(rows[3].trim_end(), format!("  {}", "y".repeat(12)));
        assert!(rows[4].starts_with("  after"));
    }

    #[test]
    fn test_completion_pins_footer() {
        let mut r = renderer(true);
        r.show_progress(30.0, Some(125.4)).unwrap();
        assert!(screen(&r)[10].contains("00:30 / 02:05"));

        r.apply(&[SyncEffect::Completed { duration: 125.4 }]).unwrap();
        assert!(screen(&r)[10].contains("02:05 / 02:05"));
    }

    #[test]
    fn test_progress_without_duration() {
        let mut r = renderer(true);
        r.show_progress(5.0, None).unwrap();
        assert!(screen(&r)[10].contains("00:05 / --:--"));
    }

    #[test]
    fn test_progress_hidden() {
        let mut r = renderer(false);
        r.bind("Song", &numbered_lyrics(12)).unwrap();
        r.show_progress(30.0, Some(120.0)).unwrap();

        let rows = screen(&r);
        assert!(!rows.iter().any(|row| row.contains("Progress")));
        // 120 - 30 - 4 = 86px: 8 lyric rows
        assert!(rows[10].starts_with("  line 7"));
        assert!(rows[11].trim().is_empty());
    }

    #[test]
    fn test_status_in_header() {
        let mut r = renderer(true);
        r.show_status("paused").unwrap();
        assert!(screen(&r)[1].contains(" paused "));
    }
}
