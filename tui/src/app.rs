//! Application state for the terminal feed
//!
//! Translates key presses and resizes into stream view callbacks and keeps
//! the list selection in step with the rows being rendered.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use redstream_feed::{ContentSource, FeedRow, StreamView, Topic, Viewport};

/// Terminal rows taken by one post (title and meta line)
pub const ENTRY_HEIGHT: u32 = 2;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Typing a new topic in the footer
    EditTopic(String),
}

pub struct App<CS>
where
    CS: ContentSource + 'static,
{
    pub view: StreamView<CS>,
    pub list_state: ListState,
    pub mode: Mode,
    /// One-off message for the footer, cleared on the next key
    pub notice: Option<String>,
    /// Inner height of the list area as of the last draw
    pub list_height: u16,
    pub should_quit: bool,
    spinner_frame: usize,
    viewport_dirty: bool,
}

impl<CS> App<CS>
where
    CS: ContentSource + 'static,
{
    pub fn new(view: StreamView<CS>) -> Self {
        Self {
            view,
            list_state: ListState::default(),
            mode: Mode::Browse,
            notice: None,
            list_height: 0,
            should_quit: false,
            spinner_frame: 0,
            viewport_dirty: true,
        }
    }

    pub fn start(&mut self) {
        self.view.on_start();
    }

    pub fn stop(&mut self) {
        self.view.on_stop();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.poll();
    }

    /// Apply finished fetches. A successful page may leave the list shorter
    /// than the screen, so the viewport is checked again; a failure is not,
    /// to avoid retrying in a loop.
    pub fn poll(&mut self) {
        if self.view.poll_outcomes() {
            self.clamp_selection();
            if self.view.state().error().is_none() {
                self.viewport_dirty = true;
            }
        }
    }

    pub fn on_resize(&mut self) {
        self.viewport_dirty = true;
    }

    /// Report the viewport to the stream view if it moved since the last
    /// check. Call after drawing so the list offset and height are current.
    pub fn sync_viewport(&mut self) {
        if !self.viewport_dirty {
            return;
        }
        self.viewport_dirty = false;
        let viewport = viewport(
            &self.view.rows(),
            self.list_state.offset(),
            self.list_height,
        );
        self.view.on_viewport_scroll(viewport);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.notice = None;
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match &mut self.mode {
            Mode::Browse => self.handle_browse_key(key.code),
            Mode::EditTopic(input) => match key.code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Enter => {
                    let input = std::mem::take(input);
                    self.mode = Mode::Browse;
                    self.submit_topic(&input);
                }
                _ => {}
            },
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        let page = (self.list_height as usize / ENTRY_HEIGHT as usize).max(1);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(page as isize),
            KeyCode::PageUp => self.move_selection(-(page as isize)),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => {
                let last = self.view.rows().len().saturating_sub(1);
                self.select(last);
            }
            KeyCode::Char('/') => {
                self.mode = Mode::EditTopic(self.view.state().topic().as_str().to_string());
            }
            KeyCode::Char('s') => {
                let sort = self.view.state().sort().next();
                self.view.on_sort_change(sort);
                self.select(0);
            }
            KeyCode::Char('r') => {
                // Same sort; a topic reset would fall back to the default
                let sort = self.view.state().sort();
                self.view.on_sort_change(sort);
                self.select(0);
            }
            _ => {}
        }
    }

    fn submit_topic(&mut self, input: &str) {
        match Topic::parse(input) {
            Ok(topic) => {
                self.view.on_input_change(topic);
                self.select(0);
            }
            Err(e) => {
                tracing::debug!("Rejected topic input {:?}: {}", input, e);
                self.notice = Some(e.to_string());
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let current = self.list_state.selected().unwrap_or(0) as isize;
        self.select(current.saturating_add(delta).max(0) as usize);
    }

    fn select(&mut self, index: usize) {
        let len = self.view.rows().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(index.min(len - 1)));
        }
        self.viewport_dirty = true;
    }

    fn clamp_selection(&mut self) {
        let index = self.list_state.selected().unwrap_or(0);
        self.select(index);
    }
}

pub fn row_height(row: &FeedRow) -> u32 {
    match row {
        FeedRow::Entry(_) => ENTRY_HEIGHT,
        FeedRow::Error(_) | FeedRow::Loading | FeedRow::End => 1,
    }
}

/// Scroll geometry of the list, given the index of its first visible row
/// and the height of the area it is drawn in
pub fn viewport(rows: &[FeedRow], offset: usize, height: u16) -> Viewport {
    let scroll_height = rows.iter().map(row_height).sum();
    let scroll_top = rows.iter().take(offset).map(row_height).sum();
    Viewport {
        scroll_height,
        scroll_top,
        offset_height: u32::from(height),
    }
}
