use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::KeyCode;
use ratatui::widgets::TableState;

use sharp_scanner::config::{Config, MAX_WINDOW_HOURS, MIN_WINDOW_HOURS};
use sharp_scanner::fetcher::{PageFetcher, PageSource};
use sharp_scanner::scorer::{TimeWindow, View};
use sharp_scanner::state::{Session, SessionStatus};
use sharp_scanner::types::{SignalRow, Sport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Dashboard selections plus the session they drive.
pub struct App<S = PageFetcher> {
    session: Session<S>,
    pub sport: Sport,
    pub hours: u32,
    pub view: View,
    pub tz: Tz,
    pub table_state: TableState,
}

impl<S: PageSource> App<S> {
    pub fn new(session: Session<S>, cfg: &Config) -> Self {
        Self {
            session,
            sport: cfg.default_sport,
            hours: cfg.time_window_hours,
            view: View::All,
            tz: cfg.target_tz,
            table_state: TableState::default(),
        }
    }

    pub fn needs_sync(&self) -> bool {
        self.session.needs_cycle(self.sport)
    }

    /// Run a cycle if the sport changed or a refresh is pending.
    pub async fn sync(&mut self) {
        if self.session.needs_cycle(self.sport) {
            self.session.ensure(self.sport).await;
            self.table_state.select(None);
        }
    }

    pub fn on_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => self.session.request_refresh(),
            KeyCode::Right | KeyCode::Char('l') => self.sport = step(&Sport::ALL, self.sport, true),
            KeyCode::Left | KeyCode::Char('h') => self.sport = step(&Sport::ALL, self.sport, false),
            KeyCode::Char('v') | KeyCode::Tab => {
                self.view = step(&View::ALL, self.view, true);
                self.table_state.select(None);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.hours = (self.hours + 1).min(MAX_WINDOW_HOURS);
            }
            KeyCode::Char('-') => {
                self.hours = self.hours.saturating_sub(1).max(MIN_WINDOW_HOURS);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.visible_rows(Utc::now()).len().saturating_sub(1);
                let next = self.table_state.selected().map_or(0, |i| (i + 1).min(max));
                self.table_state.select(Some(next));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
                self.table_state.select(Some(prev));
            }
            _ => {}
        }
        Control::Continue
    }

    /// Rows for the current view inside `[now, now + hours]`.
    pub fn visible_rows(&self, now: DateTime<Utc>) -> Vec<&SignalRow> {
        let window = TimeWindow::next_hours(now, self.hours, &self.tz);
        self.session.table().view(self.view, Some(&window))
    }

    pub fn total_rows(&self) -> usize {
        self.session.table().rows().len()
    }

    pub fn status(&self) -> &SessionStatus {
        self.session.status()
    }

    pub fn warning(&self) -> Option<&str> {
        self.session.table().warning()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.session.fetched_at()
    }
}

/// Neighbour of `current` in `items`, wrapping at both ends.
fn step<T: Copy + PartialEq>(items: &[T], current: T, forward: bool) -> T {
    let len = items.len();
    let idx = items.iter().position(|x| *x == current).unwrap_or(0);
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    items[next]
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use sharp_scanner::error::Result;
    use sharp_scanner::types::BetCategory;

    const NO_GAMES: &str = "<p>There are no games scheduled today.</p>";

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    impl PageSource for CountingSource {
        async fn fetch(&self, _sport: Sport) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NO_GAMES.to_string())
        }
    }

    fn app(source: CountingSource) -> App<CountingSource> {
        let cfg = Config::default();
        App::new(Session::with_source(source, &cfg).unwrap(), &cfg)
    }

    #[test]
    fn sport_tabs_wrap() {
        let mut app = app(CountingSource::default());
        assert_eq!(app.sport, Sport::Nba);
        app.on_key(KeyCode::Left);
        assert_eq!(app.sport, Sport::Ncaab);
        app.on_key(KeyCode::Right);
        app.on_key(KeyCode::Right);
        assert_eq!(app.sport, Sport::Nfl);
    }

    #[test]
    fn window_hours_clamped() {
        let mut app = app(CountingSource::default());
        app.on_key(KeyCode::Char('-'));
        assert_eq!(app.hours, MIN_WINDOW_HOURS);
        app.hours = MAX_WINDOW_HOURS;
        app.on_key(KeyCode::Char('+'));
        assert_eq!(app.hours, MAX_WINDOW_HOURS);
    }

    #[test]
    fn view_cycles_through_all() {
        let mut app = app(CountingSource::default());
        app.on_key(KeyCode::Char('v'));
        assert_eq!(app.view, View::Category(BetCategory::Moneyline));
        for _ in 1..View::ALL.len() {
            app.on_key(KeyCode::Char('v'));
        }
        assert_eq!(app.view, View::All);
        assert_eq!(app.on_key(KeyCode::Char('q')), Control::Quit);
    }

    #[tokio::test]
    async fn sync_fetches_on_sport_change_and_refresh_only() {
        let source = CountingSource::default();
        let mut app = app(source.clone());

        app.sync().await;
        app.sync().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.status(), &SessionStatus::NoGames);

        app.on_key(KeyCode::Right);
        app.sync().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        app.on_key(KeyCode::Char('r'));
        app.sync().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("Over 221.5", 20), "Over 221.5");
        assert_eq!(truncate("Verified Sharp Play", 9), "Verified…");
    }
}
