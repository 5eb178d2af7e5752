//! Application state and event handling

pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::book::{Book, BookId, Bookshelf, SaveEvent, StorageSlot};
use crate::config::Config;
use crate::ui;
use input::{Action, browse_key_to_action};
use state::{AppState, FormField, Screen, Shelf};

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// The book collection and its storage slot
    shelf: Bookshelf,

    /// Save notifications from the storage slot
    saves: Receiver<SaveEvent>,

    /// Current application state
    state: AppState,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let mut shelf = match config.storage_dir() {
            Ok(dir) => Bookshelf::open(StorageSlot::new(dir)),
            Err(err) => {
                tracing::warn!("no data directory: {err:#}");
                Bookshelf::in_memory()
            }
        };
        let saves = shelf.subscribe_saves();

        let terminal = Self::setup_terminal()?;

        Ok(Self { config, shelf, saves, state: AppState::default(), terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        loop {
            // Draw UI
            self.terminal.draw(|frame| {
                ui::draw(frame, &self.shelf, &mut self.state, &self.config);
            })?;

            // Handle events
            if event::poll(std::time::Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code) {
                        break;
                    }
                }
            }

            // Surface completed flushes in the status line
            if self.saves.try_iter().last().is_some() {
                self.state.status.set_success("Data saved");
            }
        }

        self.restore_terminal()?;
        Ok(())
    }

    /// Handle a key press, returns true if the app should exit
    fn handle_key(&mut self, key: KeyCode) -> bool {
        // A message lives until the next interaction
        self.state.status.clear_message();

        match self.state.screen {
            Screen::Help => {
                if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.state.screen = Screen::Browse;
                }
                false
            }
            Screen::Browse => {
                if self.state.form.active {
                    self.handle_form_key(key);
                    false
                } else if self.state.status.searching {
                    self.handle_search_key(key);
                    false
                } else {
                    self.handle_browse_key(key)
                }
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyCode) -> bool {
        let Some(action) = browse_key_to_action(key, self.config.vim_mode) else {
            return false;
        };

        match action {
            Action::Down => self.move_selection(1),
            Action::Up => self.move_selection(-1),
            Action::Top => self.set_selection(0),
            Action::Bottom => {
                let len = self.visible_len(self.state.focused_shelf);
                self.set_selection(len.saturating_sub(1));
            }
            Action::FocusReading => self.state.focused_shelf = Shelf::Reading,
            Action::FocusFinished => self.state.focused_shelf = Shelf::Finished,
            Action::SwitchShelf => {
                self.state.focused_shelf = self.state.focused_shelf.other();
            }
            Action::AddBook => self.state.form.open_blank(),
            Action::EditBook => match self.selected_book().cloned() {
                Some(book) => self.state.form.open_for(&book),
                None => self.state.status.set_message("Nothing selected"),
            },
            Action::DeleteBook => match self.selected_book().map(|book| book.id) {
                Some(id) => self.remove_book(id),
                None => self.state.status.set_message("Nothing selected"),
            },
            Action::ToggleComplete => match self.selected_book().map(|book| book.id) {
                Some(id) => self.toggle_book(id),
                None => self.state.status.set_message("Nothing selected"),
            },
            Action::Search => self.state.status.begin_search(),
            Action::Help => self.state.screen = Screen::Help,
            Action::Back => {
                if !self.state.status.query.is_empty() {
                    self.state.status.clear_search();
                    self.clamp_selections();
                }
            }
            Action::Quit => return true,
        }

        false
    }

    fn handle_search_key(&mut self, key: KeyCode) {
        let status = &mut self.state.status;
        match key {
            KeyCode::Enter => status.commit_search(),
            KeyCode::Esc => {
                status.cancel_search();
                self.clamp_selections();
            }
            KeyCode::Char(c) => {
                status.query.insert_char(c);
                self.clamp_selections();
            }
            KeyCode::Backspace => {
                status.query.delete_char();
                self.clamp_selections();
            }
            KeyCode::Delete => {
                status.query.delete_char_forward();
                self.clamp_selections();
            }
            KeyCode::Left => status.query.move_left(),
            KeyCode::Right => status.query.move_right(),
            KeyCode::Home => status.query.move_start(),
            KeyCode::End => status.query.move_end(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let form = &mut self.state.form;
        match key {
            KeyCode::Esc => form.close(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Char(' ') if form.field == FormField::Complete => {
                form.complete = !form.complete;
            }
            KeyCode::Char(c) => {
                if let Some(text) = form.active_input() {
                    text.insert_char(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = form.active_input() {
                    text.delete_char();
                }
            }
            KeyCode::Delete => {
                if let Some(text) = form.active_input() {
                    text.delete_char_forward();
                }
            }
            KeyCode::Left => {
                if let Some(text) = form.active_input() {
                    text.move_left();
                }
            }
            KeyCode::Right => {
                if let Some(text) = form.active_input() {
                    text.move_right();
                }
            }
            KeyCode::Home => {
                if let Some(text) = form.active_input() {
                    text.move_start();
                }
            }
            KeyCode::End => {
                if let Some(text) = form.active_input() {
                    text.move_end();
                }
            }
            _ => {}
        }
    }

    /// Apply the open form: update the remembered book, or add a new one
    fn submit_form(&mut self) {
        let fields = match self.state.form.submission() {
            Ok(fields) => fields,
            Err(msg) => {
                self.state.form.error = Some(msg);
                return;
            }
        };

        let result = match self.state.form.editing {
            Some(id) => self.shelf.update(id, fields).map(|_| ()),
            None => self
                .shelf
                .add(fields.title, fields.author, fields.year, fields.is_complete)
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.state.form.close();
                self.clamp_selections();
            }
            Err(err) => {
                tracing::error!("save failed: {err}");
                self.state.form.error = Some(err.to_string());
            }
        }
    }

    fn remove_book(&mut self, id: BookId) {
        match self.shelf.remove(id) {
            Ok(_) => self.clamp_selections(),
            Err(err) => {
                tracing::error!("remove failed: {err}");
                self.state.status.set_error(err.to_string());
            }
        }
    }

    fn toggle_book(&mut self, id: BookId) {
        match self.shelf.toggle_complete(id) {
            Ok(_) => self.clamp_selections(),
            Err(err) => {
                tracing::error!("toggle failed: {err}");
                self.state.status.set_error(err.to_string());
            }
        }
    }

    /// The book under the cursor on the focused shelf, if any
    fn selected_book(&self) -> Option<&Book> {
        let which = self.state.focused_shelf;
        let books = self.state.visible_books(&self.shelf, which);
        books.get(self.state.shelf_view(which).selected).copied()
    }

    fn visible_len(&self, which: Shelf) -> usize {
        self.state.visible_books(&self.shelf, which).len()
    }

    fn move_selection(&mut self, delta: isize) {
        let which = self.state.focused_shelf;
        let len = self.visible_len(which);
        if len == 0 {
            return;
        }

        let view = self.state.shelf_view_mut(which);
        let moved = view.selected as isize + delta;
        view.selected = moved.clamp(0, len as isize - 1) as usize;
        view.ensure_selection_visible();
    }

    fn set_selection(&mut self, index: usize) {
        let which = self.state.focused_shelf;
        let len = self.visible_len(which);
        let view = self.state.shelf_view_mut(which);
        view.selected = index;
        view.clamp_selection(len);
        view.ensure_selection_visible();
    }

    /// Pull both selections back into range after the visible lists
    /// changed (mutation or filter edit)
    fn clamp_selections(&mut self) {
        let reading_len = self.visible_len(Shelf::Reading);
        let finished_len = self.visible_len(Shelf::Finished);
        self.state.reading.clamp_selection(reading_len);
        self.state.finished.clamp_selection(finished_len);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
