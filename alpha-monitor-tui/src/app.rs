use alpha_monitor::{
    Column, PollerCommand, REFRESH_INTERVAL_PRESETS, SortField, TokenId, ViewIntent, ViewState,
    reduce,
};
use crossterm::event::KeyCode;

/// Input mode of the dashboard.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Normal,
    /// Keys edit the search text.
    Search,
    /// Digit keys toggle columns.
    Columns,
}

/// What a key press asks for, before it is applied to the [`App`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Action {
    Quit,
    Intent(ViewIntent),
    SetMode(Mode),
    MoveCursor(isize),
    /// Select the token under the cursor.
    OpenDetail,
    /// Cycle to the next refresh interval preset.
    NextInterval,
    SearchPush(char),
    SearchPop,
    Ignore,
}

/// Outcome of handling a key press, for the event loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Continue,
    Command(PollerCommand),
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct App {
    pub view: ViewState,
    pub mode: Mode,
    pub cursor: usize,
}

impl App {
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            mode: Mode::Normal,
            cursor: 0,
        }
    }

    pub fn detail_open(&self) -> bool {
        self.view.selected.is_some()
    }

    /// Map a key to an [`Action`] given the current mode.
    pub fn action(&self, code: KeyCode) -> Action {
        match self.mode {
            Mode::Search => match code {
                KeyCode::Enter | KeyCode::Esc => Action::SetMode(Mode::Normal),
                KeyCode::Backspace => Action::SearchPop,
                KeyCode::Char(ch) => Action::SearchPush(ch),
                _ => Action::Ignore,
            },
            Mode::Columns => match code {
                KeyCode::Char('c') | KeyCode::Esc | KeyCode::Enter => Action::SetMode(Mode::Normal),
                KeyCode::Char(ch) => digit(ch)
                    .and_then(|n| Column::ALL.get(n))
                    .map(|column| Action::Intent(ViewIntent::ToggleColumn(*column)))
                    .unwrap_or(Action::Ignore),
                _ => Action::Ignore,
            },
            Mode::Normal if self.detail_open() => match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
                    Action::Intent(ViewIntent::ClearSelection)
                }
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('r') => Action::Intent(ViewIntent::Refresh),
                _ => Action::Ignore,
            },
            Mode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('/') => Action::SetMode(Mode::Search),
                KeyCode::Char('c') => Action::SetMode(Mode::Columns),
                KeyCode::Char('r') => Action::Intent(ViewIntent::Refresh),
                KeyCode::Char('i') => Action::NextInterval,
                KeyCode::Up | KeyCode::Char('k') => Action::MoveCursor(-1),
                KeyCode::Down | KeyCode::Char('j') => Action::MoveCursor(1),
                KeyCode::PageUp => Action::MoveCursor(-10),
                KeyCode::PageDown => Action::MoveCursor(10),
                KeyCode::Enter => Action::OpenDetail,
                KeyCode::Char(ch) => digit(ch)
                    .and_then(|n| SortField::ALL.get(n))
                    .map(|field| Action::Intent(ViewIntent::SortBy(*field)))
                    .unwrap_or(Action::Ignore),
                _ => Action::Ignore,
            },
        }
    }

    /// Handle one key press against the currently visible token ids.
    pub fn handle_key(&mut self, code: KeyCode, visible: &[TokenId]) -> Outcome {
        let action = self.action(code);
        self.apply(action, visible)
    }

    pub fn apply(&mut self, action: Action, visible: &[TokenId]) -> Outcome {
        match action {
            Action::Quit => Outcome::Quit,
            Action::Intent(intent) => self.dispatch(intent),
            Action::SetMode(mode) => {
                self.mode = mode;
                Outcome::Continue
            }
            Action::MoveCursor(delta) => {
                self.cursor = self.cursor.saturating_add_signed(delta);
                self.clamp_cursor(visible.len());
                Outcome::Continue
            }
            Action::OpenDetail => match visible.get(self.cursor) {
                Some(id) => self.dispatch(ViewIntent::Select(id.clone())),
                None => Outcome::Continue,
            },
            Action::NextInterval => {
                let next = next_interval(self.view.refresh_interval);
                self.dispatch(ViewIntent::SetRefreshInterval(next))
            }
            Action::SearchPush(ch) => {
                let mut search = self.view.search.clone();
                search.push(ch);
                self.cursor = 0;
                self.dispatch(ViewIntent::Search(search))
            }
            Action::SearchPop => {
                let mut search = self.view.search.clone();
                search.pop();
                self.cursor = 0;
                self.dispatch(ViewIntent::Search(search))
            }
            Action::Ignore => Outcome::Continue,
        }
    }

    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Drop the detail selection once its token has left the snapshot, so input goes back to
    /// the table.
    pub fn retain_selection(&mut self, exists: impl Fn(&TokenId) -> bool) {
        if self.view.selected.as_ref().is_some_and(|id| !exists(id)) {
            self.dispatch(ViewIntent::ClearSelection);
        }
    }

    fn dispatch(&mut self, intent: ViewIntent) -> Outcome {
        let transition = reduce(&self.view, intent);
        self.view = transition.state;
        transition
            .command
            .map(Outcome::Command)
            .unwrap_or(Outcome::Continue)
    }
}

fn next_interval(current: std::time::Duration) -> std::time::Duration {
    REFRESH_INTERVAL_PRESETS
        .iter()
        .copied()
        .find(|preset| *preset > current)
        .unwrap_or(REFRESH_INTERVAL_PRESETS[0])
}

/// `'1'..='9'` as a zero based index.
fn digit(ch: char) -> Option<usize> {
    ch.to_digit(10)
        .filter(|n| *n > 0)
        .map(|n| n as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_monitor::SortDirection;
    use std::time::Duration;

    fn ids(raw: &[&str]) -> Vec<TokenId> {
        raw.iter().map(|id| TokenId::new(id)).collect()
    }

    #[test]
    fn test_key_actions() {
        struct TestCase {
            app: App,
            input: KeyCode,
            expected: Action,
        }

        let detail = App::new(ViewState {
            selected: Some(TokenId::new("A")),
            ..ViewState::default()
        });
        let search = App {
            mode: Mode::Search,
            ..App::default()
        };
        let columns = App {
            mode: Mode::Columns,
            ..App::default()
        };

        let tests = vec![
            TestCase {
                // TC0: quit
                app: App::default(),
                input: KeyCode::Char('q'),
                expected: Action::Quit,
            },
            TestCase {
                // TC1: digit sorts by the matching field
                app: App::default(),
                input: KeyCode::Char('3'),
                expected: Action::Intent(ViewIntent::SortBy(SortField::Holders)),
            },
            TestCase {
                // TC2: digit without a field
                app: App::default(),
                input: KeyCode::Char('9'),
                expected: Action::Ignore,
            },
            TestCase {
                // TC3: manual refresh
                app: App::default(),
                input: KeyCode::Char('r'),
                expected: Action::Intent(ViewIntent::Refresh),
            },
            TestCase {
                // TC4: search mode captures letters that are bindings in normal mode
                app: search.clone(),
                input: KeyCode::Char('q'),
                expected: Action::SearchPush('q'),
            },
            TestCase {
                // TC5: leaving search mode
                app: search,
                input: KeyCode::Esc,
                expected: Action::SetMode(Mode::Normal),
            },
            TestCase {
                // TC6: column mode toggles by digit
                app: columns.clone(),
                input: KeyCode::Char('9'),
                expected: Action::Intent(ViewIntent::ToggleColumn(Column::ListingTime)),
            },
            TestCase {
                // TC7: zero is not a column
                app: columns,
                input: KeyCode::Char('0'),
                expected: Action::Ignore,
            },
            TestCase {
                // TC8: escape closes detail before it quits
                app: detail.clone(),
                input: KeyCode::Esc,
                expected: Action::Intent(ViewIntent::ClearSelection),
            },
            TestCase {
                // TC9: cursor keys inert while detail is open
                app: detail,
                input: KeyCode::Down,
                expected: Action::Ignore,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.app.action(test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_search_typing_updates_view() {
        let mut app = App::default();
        let visible = ids(&["A", "B"]);

        app.handle_key(KeyCode::Char('/'), &visible);
        for ch in "btcx".chars() {
            app.handle_key(KeyCode::Char(ch), &visible);
        }
        app.handle_key(KeyCode::Backspace, &visible);
        app.handle_key(KeyCode::Enter, &visible);

        assert_eq!(app.view.search, "btc");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_sort_key_twice_flips_direction() {
        let mut app = App::default();
        app.handle_key(KeyCode::Char('3'), &[]);
        assert_eq!(app.view.sort_field, SortField::Holders);
        assert_eq!(app.view.sort_direction, SortDirection::Descending);

        app.handle_key(KeyCode::Char('3'), &[]);
        assert_eq!(app.view.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn test_interval_cycles_presets_and_reschedules() {
        let mut app = App::default();
        assert_eq!(app.view.refresh_interval, Duration::from_secs(300));

        let expected = [600, 1800, 60, 300];
        for (index, secs) in expected.into_iter().enumerate() {
            let outcome = app.handle_key(KeyCode::Char('i'), &[]);
            assert_eq!(
                outcome,
                Outcome::Command(PollerCommand::Reschedule(Duration::from_secs(secs))),
                "TC{} failed",
                index
            );
            assert_eq!(app.view.refresh_interval, Duration::from_secs(secs), "TC{} failed", index);
        }
    }

    #[test]
    fn test_cursor_and_detail_selection() {
        let mut app = App::default();
        let visible = ids(&["A", "B", "C"]);

        app.handle_key(KeyCode::Down, &visible);
        app.handle_key(KeyCode::PageDown, &visible);
        assert_eq!(app.cursor, 2);

        app.handle_key(KeyCode::Up, &visible);
        assert_eq!(
            app.handle_key(KeyCode::Enter, &visible),
            Outcome::Continue
        );
        assert_eq!(app.view.selected, Some(TokenId::new("B")));

        app.handle_key(KeyCode::Esc, &visible);
        assert_eq!(app.view.selected, None);

        // Enter on an empty table selects nothing
        let mut empty = App::default();
        empty.handle_key(KeyCode::Enter, &[]);
        assert_eq!(empty.view.selected, None);
    }

    #[test]
    fn test_selection_dropped_with_its_token() {
        let mut app = App::new(ViewState {
            selected: Some(TokenId::new("X")),
            ..ViewState::default()
        });
        let visible = ids(&["A", "B"]);

        // Selection still present keeps the detail open
        app.retain_selection(|id| id.as_str() == "X");
        assert!(app.detail_open());

        app.retain_selection(|id| visible.contains(id));
        assert!(!app.detail_open());

        assert_eq!(
            app.action(KeyCode::Char('/')),
            Action::SetMode(Mode::Search)
        );
        assert_eq!(app.handle_key(KeyCode::Esc, &visible), Outcome::Quit);
    }

    #[test]
    fn test_refresh_emits_command() {
        let mut app = App::default();
        assert_eq!(
            app.handle_key(KeyCode::Char('r'), &[]),
            Outcome::Command(PollerCommand::RefreshNow)
        );
        assert_eq!(app.handle_key(KeyCode::Char('q'), &[]), Outcome::Quit);
    }
}
