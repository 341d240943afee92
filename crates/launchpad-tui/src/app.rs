//! TUI state and key handling.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use launchpad_core::registry::RegistrySnapshot;
use launchpad_core::types::{ClientRecord, InstallStatus};
use launchpad_core::view::Tab;

/// Work requested by the user, executed off the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Quit,
    LoadInitial,
    Scan,
    RefreshInstalled,
    Install(ClientRecord),
    Launch(ClientRecord),
    Search(String),
}

/// One-line feedback shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct App {
    pub tab: Tab,
    selected: [usize; Tab::ALL.len()],
    /// Search text being edited; `None` when not editing.
    pub input: Option<String>,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected row on the current tab, clamped to `len` rows.
    pub fn selected(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.selected[self.tab.index()].min(len - 1))
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent, snapshot: &RegistrySnapshot) -> Option<Intent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Intent::Quit);
        }
        if self.is_editing() {
            return self.handle_input_key(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Quit),
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.previous()),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[index])
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1, snapshot);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1, snapshot);
                None
            }
            KeyCode::Char('r') => match self.tab {
                Tab::Clients => Some(Intent::Scan),
                Tab::Installed => Some(Intent::RefreshInstalled),
                Tab::Mods | Tab::Profiles => None,
            },
            KeyCode::Char('/') | KeyCode::Char('s') if self.tab == Tab::Mods => {
                self.input = Some(snapshot.search.last_query.clone().unwrap_or_default());
                None
            }
            KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('l') => self.activate(snapshot),
            _ => None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Intent> {
        let input = self.input.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.input = None;
                None
            }
            KeyCode::Enter => {
                let query = self.input.take().unwrap_or_default();
                if query.trim().is_empty() {
                    None
                } else {
                    Some(Intent::Search(query))
                }
            }
            KeyCode::Backspace => {
                input.pop();
                None
            }
            KeyCode::Char(c) => {
                input.push(c);
                None
            }
            _ => None,
        }
    }

    fn switch_tab(&mut self, tab: Tab) -> Option<Intent> {
        self.tab = tab;
        self.input = None;
        None
    }

    fn move_selection(&mut self, delta: isize, snapshot: &RegistrySnapshot) {
        let len = row_count(self.tab, snapshot);
        let Some(current) = self.selected(len) else {
            return;
        };
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.selected[self.tab.index()] = next;
    }

    fn activate(&self, snapshot: &RegistrySnapshot) -> Option<Intent> {
        match self.tab {
            Tab::Clients => {
                let index = self.selected(snapshot.available.len())?;
                let client = &snapshot.available[index];
                // Install stays disabled while one is running for this name.
                if snapshot.status_of(&client.name) == Some(InstallStatus::Installing) {
                    return None;
                }
                Some(Intent::Install(client.clone()))
            }
            Tab::Installed => {
                let index = self.selected(snapshot.installed.len())?;
                Some(Intent::Launch(snapshot.installed[index].clone()))
            }
            Tab::Mods | Tab::Profiles => None,
        }
    }
}

fn row_count(tab: Tab, snapshot: &RegistrySnapshot) -> usize {
    match tab {
        Tab::Clients => snapshot.available.len(),
        Tab::Installed => snapshot.installed.len(),
        Tab::Mods => snapshot.search.results.hits().len(),
        Tab::Profiles => 0,
    }
}
