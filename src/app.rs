use crate::catalog::Card;
use crate::controller::{Controller, PassKind, PassOutcome, PassResult};
use crate::pagination::{Control, PageToken};
use crate::ui::CARD_WIDTH;
use chrono::{DateTime, Local};

/// What the card area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Loading,
    Cards(Vec<Card>),
    NotFound,
    Failed(String),
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Main application state.
pub struct App {
    pub controller: Controller,
    pub should_quit: bool,
    pub show_help: bool,

    pub content: Content,
    pub card_scroll: usize, // Index of the first visible card
    pub cards_per_row: usize,

    // Pagination bar
    pub controls: Vec<Control>,
    pub focused: Option<usize>,

    pub search: String,
    pub input_mode: InputMode,

    pub loaded_at: Option<DateTime<Local>>,
    pub status_msg: String,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            should_quit: false,
            show_help: false,

            content: Content::Loading,
            card_scroll: 0,
            cards_per_row: 1,

            controls: Vec::new(),
            focused: None,

            search: String::new(),
            input_mode: InputMode::Normal,

            loaded_at: None,
            status_msg: "Loading catalog...".to_string(),
        }
    }

    /// Kick off the first listing pass.
    pub fn init(&mut self) {
        self.controller.load_listing();
    }

    pub fn reload(&mut self) {
        self.status_msg = format!("Loading page {}...", self.controller.state().current_page);
        self.controller.load_listing();
    }

    /// Submit the search bar. Non-empty searches clear the bar afterwards.
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let query = std::mem::take(&mut self.search);
        if query.trim().is_empty() {
            self.status_msg = "Loading catalog...".to_string();
        } else {
            self.status_msg = format!("Searching for \"{}\"...", query.trim());
        }
        self.controller.submit_search(&query);
    }

    /// Activate the pagination control at `index`, if it is a live link.
    pub fn activate_control(&mut self, index: usize) {
        let Some(control) = self.controls.get(index).copied() else {
            return;
        };
        if self.controller.activate(&control).is_some() {
            self.focused = Some(index);
            self.status_msg = format!("Loading page {}...", self.controller.state().current_page);
        }
    }

    /// Previous/next from the keyboard, routed through the rendered bar.
    pub fn step(&mut self, token: PageToken) {
        if let Some(index) = self.controls.iter().position(|c| c.token == token) {
            self.activate_control(index);
        }
    }

    pub fn activate_focused(&mut self) {
        if let Some(index) = self.focused {
            self.activate_control(index);
        }
    }

    /// Move keyboard focus to the next link in the bar, wrapping around.
    pub fn focus_next(&mut self) {
        self.focused = self.find_link(1);
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.find_link(-1);
    }

    fn find_link(&self, direction: isize) -> Option<usize> {
        let len = self.controls.len();
        if len == 0 {
            return None;
        }
        let start = match self.focused {
            Some(i) => i as isize,
            None if direction > 0 => -1,
            None => len as isize,
        };
        (1..=len as isize)
            .map(|step| (start + step * direction).rem_euclid(len as isize) as usize)
            .find(|&i| self.controls[i].token.is_link())
    }

    /// Update the card grid width based on terminal width.
    pub fn update_columns(&mut self, terminal_width: u16) {
        let inner = terminal_width.saturating_sub(2);
        self.cards_per_row = usize::from((inner / CARD_WIDTH).max(1));
        self.card_scroll -= self.card_scroll % self.cards_per_row;
    }

    /// Scroll the card grid down one row.
    pub fn scroll_down(&mut self) {
        if let Content::Cards(cards) = &self.content {
            if self.card_scroll + self.cards_per_row < cards.len() {
                self.card_scroll += self.cards_per_row;
            }
        }
    }

    pub fn scroll_up(&mut self) {
        self.card_scroll = self.card_scroll.saturating_sub(self.cards_per_row);
    }

    /// Apply a finished pass. Superseded passes are ignored.
    pub fn apply(&mut self, result: PassResult) {
        let Some(result) = self.controller.accept(result) else {
            return;
        };
        self.loaded_at = Some(Local::now());
        self.card_scroll = 0;

        match (result.kind, result.outcome) {
            (PassKind::Listing { page }, PassOutcome::Listing(listing)) => {
                self.status_msg = format!(
                    "Page {} loaded ({} of {} entries)",
                    page,
                    listing.cards.len(),
                    listing.total_items
                );
                self.content = Content::Cards(listing.cards);
                self.rebuild_controls();
            }
            (PassKind::Search { query }, PassOutcome::Search(Some(card))) => {
                self.status_msg = format!("Found \"{}\"", query);
                self.content = Content::Cards(vec![card]);
                self.clear_controls();
            }
            (PassKind::Search { query }, PassOutcome::Search(None)) => {
                self.status_msg = format!("No entry named \"{}\"", query);
                self.content = Content::NotFound;
                self.clear_controls();
            }
            (kind, PassOutcome::Failed(e)) => {
                self.status_msg = e.user_message();
                self.content = Content::Failed(e.to_string());
                match kind {
                    PassKind::Listing { .. } => self.rebuild_controls(),
                    PassKind::Search { .. } => self.clear_controls(),
                }
            }
            (kind, outcome) => {
                tracing::warn!(?kind, ?outcome, "pass outcome does not match its kind");
            }
        }
    }

    fn rebuild_controls(&mut self) {
        self.controls = self.controller.state().controls();
        self.focused = self
            .focused
            .filter(|&i| self.controls.get(i).is_some_and(|c| c.token.is_link()));
    }

    fn clear_controls(&mut self) {
        self.controls.clear();
        self.focused = None;
    }
}
