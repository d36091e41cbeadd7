use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use typeahead::{SuggestionItem, TypeaheadController, TypeaheadState};

mod text_input;
pub use text_input::TextInput;

/// What the last Enter press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A suggestion with a location was chosen.
    Opened { title: String, path: String },
    /// A query was submitted, either typed or taken from a suggestion title.
    Submitted(String),
}

pub struct App {
    pub running: bool,
    pub input: TextInput,
    /// Latest snapshot published by the controller.
    pub state: TypeaheadState,
    pub highlighted: Option<usize>,
    pub selection: Option<Selection>,
    controller: TypeaheadController,
}

impl App {
    pub fn new(mut controller: TypeaheadController) -> Self {
        // Empty query publishes the zero-term suggestions.
        controller.set_query(String::new());
        let state = controller.state();
        Self {
            running: true,
            input: TextInput::new(),
            state,
            highlighted: None,
            selection: None,
            controller,
        }
    }

    pub fn sync_state(&mut self, state: TypeaheadState) {
        if state.suggestions != self.state.suggestions {
            self.highlighted = None;
        }
        self.state = state;
    }

    pub fn dropdown_visible(&self) -> bool {
        self.state.open && !self.state.suggestions.is_empty()
    }

    pub fn highlighted_item(&self) -> Option<&SuggestionItem> {
        self.highlighted.and_then(|i| self.state.suggestions.get(i))
    }

    pub fn quit(&mut self) {
        self.running = false;
        self.controller.shutdown();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') | KeyCode::Char('C') = key.code {
                self.quit();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.escape(),
            KeyCode::Down => self.move_highlight(true),
            KeyCode::Up => self.move_highlight(false),
            KeyCode::Enter => self.confirm(),
            KeyCode::Char(c) => {
                self.input.insert(c);
                self.query_changed();
            }
            KeyCode::Backspace => {
                if self.input.backspace() {
                    self.query_changed();
                }
            }
            KeyCode::Delete => {
                if self.input.delete() {
                    self.query_changed();
                }
            }
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            _ => {}
        }
    }

    fn query_changed(&mut self) {
        self.highlighted = None;
        self.selection = None;
        self.controller.set_query(self.input.value.clone());
    }

    /// First Esc closes the dropdown, Esc on a closed dropdown quits.
    fn escape(&mut self) {
        if self.dropdown_visible() {
            self.close_dropdown();
        } else {
            self.quit();
        }
    }

    fn close_dropdown(&mut self) {
        self.controller.set_open(false);
        self.state.open = false;
        self.highlighted = None;
    }

    /// Moves the highlight one step, wrapping at both ends.
    fn move_highlight(&mut self, down: bool) {
        let count = self.state.suggestions.len();
        if count == 0 {
            return;
        }
        if !self.state.open {
            self.controller.set_open(true);
            self.state.open = true;
        }

        self.highlighted = Some(match (self.highlighted, down) {
            (Some(i), true) => (i + 1) % count,
            (None, true) => 0,
            (Some(0) | None, false) => count - 1,
            (Some(i), false) => i - 1,
        });
    }

    fn confirm(&mut self) {
        let selection = match self.highlighted_item().cloned() {
            Some(item) if item.has_path() => Selection::Opened {
                title: item.title,
                path: item.path,
            },
            Some(item) => {
                self.input.set(&item.title);
                self.controller.set_query(item.title.clone());
                Selection::Submitted(item.title)
            }
            None => {
                let query = self.input.value.trim();
                if query.is_empty() {
                    return;
                }
                Selection::Submitted(query.to_string())
            }
        };

        tracing::info!(?selection, "Suggestion confirmed");
        self.selection = Some(selection);
        self.close_dropdown();
    }

    /// One-line status shown under the search box.
    pub fn status_line(&self) -> String {
        if let Some(error) = &self.state.error {
            return format!("Error: {}", error);
        }
        if self.state.loading {
            return "Searching...".to_string();
        }
        match &self.selection {
            Some(Selection::Opened { title, path }) => format!("Opened {} ({})", title, path),
            Some(Selection::Submitted(query)) => format!("Submitted search \"{}\"", query),
            None => "↑/↓ select · Enter open · Esc close · Ctrl-C quit".to_string(),
        }
    }
}
