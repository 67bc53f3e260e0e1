mod app;

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use sharp_scanner::config::Config;
use sharp_scanner::scorer::table::{cell, format_matchup_time};
use sharp_scanner::state::{Session, SessionStatus};
use sharp_scanner::types::{Column, ConfidenceLabel, DecisionLabel, SignalRow, Sport};

use app::{truncate, App, Control};

const TABLE_COLUMNS: [Column; 11] = [
    Column::MatchupTime,
    Column::Matchup,
    Column::Team,
    Column::BettingCategory,
    Column::DecisionLogic,
    Column::ConfidenceScoreLabel,
    Column::RelativeDifferential,
    Column::BetsPct,
    Column::MoneyPct,
    Column::ActualDiffPct,
    Column::SpreadLine,
];

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let cfg = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    // Only log when asked to; stderr output would tear the alternate screen.
    if std::env::var("LOG_LEVEL").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&cfg.log_level))
            .with_writer(io::stderr)
            .init();
    }

    let session = Session::new(&cfg).map_err(|e| io::Error::other(e.to_string()))?;
    let mut app = App::new(session, &cfg);

    // Initial fetch before rendering
    app.sync().await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key.code) == Control::Quit {
                    return Ok(());
                }
            }
        }

        if app.needs_sync() {
            // Show the pending state before the blocking cycle.
            terminal.draw(|f| render(f, app))?;
            app.sync().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Outer vertical split: header | tabs | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // sport tabs
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_tabs(f, app, chunks[1]);
    render_picks_table(f, app, chunks[2]);
    render_footer(f, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let (status_text, status_color) = if app.needs_sync() {
        ("◌ loading".to_string(), Color::Yellow)
    } else {
        match app.status() {
            SessionStatus::Ready => ("● ready".to_string(), Color::Green),
            SessionStatus::NoGames => ("○ no games today".to_string(), Color::DarkGray),
            SessionStatus::Idle => ("◌ idle".to_string(), Color::Yellow),
            SessionStatus::Error(e) => (format!("✗ {}", truncate(e, 50)), Color::Red),
        }
    };

    let fetched = app
        .fetched_at()
        .map_or("—".to_string(), |t| format_matchup_time(&t.with_timezone(&app.tz)));

    let mut spans = vec![
        Span::styled(
            " Sharp Money Scanner  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(format!("next {}h", app.hours), Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(format!("{} rows", app.total_rows()), Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(format!("fetched {fetched}"), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(warning) = app.warning() {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(format!("⚠ {warning}"), Style::default().fg(Color::Yellow)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));

    f.render_widget(paragraph, area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let selected = Sport::ALL.iter().position(|s| *s == app.sport).unwrap_or(0);
    let tabs = Tabs::new(Sport::ALL.iter().map(|s| s.as_str()))
        .select(selected)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    f.render_widget(tabs, area);
}

fn render_picks_table(f: &mut Frame, app: &mut App, area: Rect) {
    let header_cells = TABLE_COLUMNS
        .iter()
        .map(|c| Cell::from(c.header()).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let visible = app.visible_rows(Utc::now());
    let title = format!(" {} ({}) ", app.view.title().to_uppercase(), visible.len());

    let rows: Vec<Row> = visible.into_iter().map(picks_row).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(13), // time
            Constraint::Min(12),    // matchup
            Constraint::Length(12), // team
            Constraint::Length(9),  // category
            Constraint::Length(18), // decision
            Constraint::Length(20), // confidence
            Constraint::Length(8),  // rel diff
            Constraint::Length(6),  // bets
            Constraint::Length(6),  // money
            Constraint::Length(7),  // diff
            Constraint::Length(13), // line
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn picks_row(row: &SignalRow) -> Row<'static> {
    let decision_color = match row.decision_label {
        DecisionLabel::SharpMoneyPlay => Color::Green,
        DecisionLabel::PublicTrap => Color::Red,
        DecisionLabel::NoSignal => Color::DarkGray,
        DecisionLabel::Neutral => Color::White,
    };
    let confidence_color = match row.confidence_label {
        ConfidenceLabel::VerifiedSharp | ConfidenceLabel::StrongSharp => Color::Green,
        ConfidenceLabel::LeanSharp | ConfidenceLabel::SlightSharp => Color::LightGreen,
        ConfidenceLabel::PublicLean | ConfidenceLabel::SlightPublic => Color::Yellow,
        ConfidenceLabel::PublicTrap => Color::Red,
        ConfidenceLabel::Neutral | ConfidenceLabel::Unbanded => Color::DarkGray,
    };

    let cells = TABLE_COLUMNS.iter().map(|col| {
        let text = cell(row, *col).unwrap_or_else(|| "—".to_string());
        let style = match col {
            Column::MatchupTime => Style::default().fg(Color::DarkGray),
            Column::DecisionLogic => Style::default().fg(decision_color),
            Column::ConfidenceScoreLabel => Style::default().fg(confidence_color),
            Column::Team => Style::default().fg(Color::Cyan),
            _ => Style::default(),
        };
        Cell::from(truncate(&text, 24)).style(style)
    });

    Row::new(cells.collect::<Vec<_>>())
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("[←→] ", Style::default().fg(Color::Yellow)),
        Span::raw("sport  "),
        Span::styled("[+/-] ", Style::default().fg(Color::Yellow)),
        Span::raw("window  "),
        Span::styled("[v] ", Style::default().fg(Color::Yellow)),
        Span::raw("view  "),
        Span::styled("[↑↓ / j k] ", Style::default().fg(Color::Yellow)),
        Span::raw("scroll"),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
