//! Application state definitions

use crate::book::{Book, BookFields, BookId, Bookshelf};

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Browse,
    Help,
}

/// Which shelf panel is currently focused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shelf {
    #[default]
    Reading,
    Finished,
}

impl Shelf {
    /// The shelf on the other side of the screen
    pub fn other(self) -> Self {
        match self {
            Shelf::Reading => Shelf::Finished,
            Shelf::Finished => Shelf::Reading,
        }
    }
}

/// Selection and scroll state for one shelf panel
#[derive(Debug, Clone, Default)]
pub struct ShelfView {
    /// Currently selected row (index into the visible books)
    pub selected: usize,
    /// Scroll offset for long shelves
    pub scroll_offset: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl ShelfView {
    /// Ensure the selected row is visible by adjusting scroll offset
    pub fn ensure_selection_visible(&mut self) {
        // Don't scroll past the selection (top)
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        // Don't let selection go below visible area (bottom)
        if self.visible_height > 0 && self.selected >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.selected - self.visible_height + 1;
        }
    }

    /// Pull the selection back into range after the shelf shrank
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// A single-line text input with a character-indexed cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position as a character index
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the contents and park the cursor at the end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Cursor position as a character index
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.value.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.value.len())
    }

    /// Get the number of characters in the input
    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.value.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.value.remove(byte_idx);
        }
    }

    /// Delete the character at the cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.value.remove(byte_idx);
        }
    }

    /// Move cursor left
    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor right
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start
    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }
}

/// Which form field has focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Author,
    Year,
    Complete,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Author,
            FormField::Author => FormField::Year,
            FormField::Year => FormField::Complete,
            FormField::Complete => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Complete,
            FormField::Author => FormField::Title,
            FormField::Year => FormField::Author,
            FormField::Complete => FormField::Year,
        }
    }
}

/// State for the add/edit form overlay
#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// Whether the form is open
    pub active: bool,
    /// Id of the book being edited; `None` means a new book
    pub editing: Option<BookId>,
    /// Focused field
    pub field: FormField,
    pub title: TextInput,
    pub author: TextInput,
    pub year: TextInput,
    pub complete: bool,
    /// Validation or save error shown inside the form
    pub error: Option<String>,
}

impl FormState {
    /// Open the form empty, for adding a new book
    pub fn open_blank(&mut self) {
        *self = Self { active: true, ..Self::default() };
    }

    /// Open the form prefilled from an existing book, remembering its id
    pub fn open_for(&mut self, book: &Book) {
        *self = Self { active: true, editing: Some(book.id), ..Self::default() };
        self.title.set_value(book.title.clone());
        self.author.set_value(book.author.clone());
        self.year.set_value(book.year.to_string());
        self.complete = book.is_complete;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn focus_next(&mut self) {
        self.field = self.field.next();
    }

    pub fn focus_prev(&mut self) {
        self.field = self.field.prev();
    }

    /// The text input under focus, if the focused field is textual
    pub fn active_input(&mut self) -> Option<&mut TextInput> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Author => Some(&mut self.author),
            FormField::Year => Some(&mut self.year),
            FormField::Complete => None,
        }
    }

    /// Coerce the form buffer into book fields. The year is the only
    /// field with a typed representation; everything else passes through
    /// as typed.
    pub fn submission(&self) -> Result<BookFields, String> {
        let year = self
            .year
            .value()
            .trim()
            .parse::<i32>()
            .map_err(|_| "year must be a whole number".to_string())?;

        Ok(BookFields {
            title: self.title.value().to_string(),
            author: self.author.value().to_string(),
            year,
            is_complete: self.complete,
        })
    }
}

/// Tone of the status line message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusTone {
    #[default]
    Neutral,
    Success,
    Error,
}

/// State for the search/status line at the bottom of the screen
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Whether the user is typing a search query
    pub searching: bool,
    /// Current query; a non-empty query filters both shelves
    pub query: TextInput,
    /// Message to display when not in search input
    pub message: Option<String>,
    pub tone: StatusTone,
}

impl StatusLine {
    /// Start search input with a fresh query
    pub fn begin_search(&mut self) {
        self.searching = true;
        self.query.clear();
        self.message = None;
    }

    /// Leave search input, keeping the query as the active filter
    pub fn commit_search(&mut self) {
        self.searching = false;
    }

    /// Leave search input and drop the filter
    pub fn cancel_search(&mut self) {
        self.searching = false;
        self.query.clear();
    }

    /// Drop a committed filter
    pub fn clear_search(&mut self) {
        self.query.clear();
    }

    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.tone = StatusTone::Neutral;
    }

    /// Drop the current message, keeping any active filter
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Set a success message
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.tone = StatusTone::Success;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.tone = StatusTone::Error;
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    /// Currently focused shelf panel
    pub focused_shelf: Shelf,

    /// Selection state for the Reading panel
    pub reading: ShelfView,

    /// Selection state for the Finished panel
    pub finished: ShelfView,

    /// Add/edit form overlay
    pub form: FormState,

    /// Search and status line
    pub status: StatusLine,
}

impl AppState {
    pub fn shelf_view(&self, shelf: Shelf) -> &ShelfView {
        match shelf {
            Shelf::Reading => &self.reading,
            Shelf::Finished => &self.finished,
        }
    }

    pub fn shelf_view_mut(&mut self, shelf: Shelf) -> &mut ShelfView {
        match shelf {
            Shelf::Reading => &mut self.reading,
            Shelf::Finished => &mut self.finished,
        }
    }

    /// Books currently visible on the given shelf panel: the search
    /// filter applied, then split by completion status, collection order
    /// preserved
    pub fn visible_books<'a>(&self, shelf: &'a Bookshelf, which: Shelf) -> Vec<&'a Book> {
        shelf
            .search(self.status.query.value())
            .filter(|book| book.is_complete == (which == Shelf::Finished))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_respect_char_boundaries() {
        let mut input = TextInput::default();
        input.insert_char('é');
        input.insert_char('b');
        assert_eq!(input.value(), "éb");

        input.move_left();
        input.delete_char();
        assert_eq!(input.value(), "b");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn delete_forward_removes_under_cursor() {
        let mut input = TextInput::default();
        input.set_value("abc");
        input.move_start();
        input.delete_char_forward();
        assert_eq!(input.value(), "bc");
    }

    #[test]
    fn set_value_parks_cursor_at_end() {
        let mut input = TextInput::default();
        input.set_value("naïve");
        assert_eq!(input.cursor(), 5);
        input.insert_char('!');
        assert_eq!(input.value(), "naïve!");
    }

    #[test]
    fn cursor_movement_stops_at_the_edges() {
        let mut input = TextInput::default();
        input.set_value("ab");
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.move_start();
        input.move_left();
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn form_fields_cycle_in_both_directions() {
        let mut field = FormField::Title;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, FormField::Title);

        assert_eq!(FormField::Title.prev(), FormField::Complete);
        assert_eq!(FormField::Complete.next(), FormField::Title);
    }

    #[test]
    fn open_for_prefills_and_remembers_the_id() {
        let mut form = FormState::default();
        form.open_for(&Book::new(42, "Solaris", "Lem", 1961, true));

        assert!(form.active);
        assert_eq!(form.editing, Some(42));
        assert_eq!(form.title.value(), "Solaris");
        assert_eq!(form.author.value(), "Lem");
        assert_eq!(form.year.value(), "1961");
        assert!(form.complete);
    }

    #[test]
    fn open_blank_resets_a_previous_edit() {
        let mut form = FormState::default();
        form.open_for(&Book::new(42, "Solaris", "Lem", 1961, true));
        form.open_blank();

        assert!(form.active);
        assert_eq!(form.editing, None);
        assert!(form.title.is_empty());
        assert!(!form.complete);
    }

    #[test]
    fn submission_coerces_the_year() {
        let mut form = FormState::default();
        form.open_blank();
        form.title.set_value("Dune");
        form.author.set_value("Herbert");
        form.year.set_value(" 1965 ");

        let fields = form.submission().unwrap();
        assert_eq!(fields.year, 1965);
        assert_eq!(fields.title, "Dune");
    }

    #[test]
    fn submission_rejects_a_non_numeric_year() {
        let mut form = FormState::default();
        form.open_blank();
        form.year.set_value("nineteen sixty-five");

        assert!(form.submission().is_err());
    }

    #[test]
    fn clamp_selection_handles_shrinking_and_empty_shelves() {
        let mut view = ShelfView { selected: 5, scroll_offset: 3, visible_height: 4 };
        view.clamp_selection(3);
        assert_eq!(view.selected, 2);

        view.clamp_selection(0);
        assert_eq!(view.selected, 0);
        assert_eq!(view.scroll_offset, 0);
    }

    #[test]
    fn ensure_selection_visible_scrolls_both_ways() {
        let mut view = ShelfView { selected: 0, scroll_offset: 4, visible_height: 3 };
        view.ensure_selection_visible();
        assert_eq!(view.scroll_offset, 0);

        view.selected = 9;
        view.ensure_selection_visible();
        assert_eq!(view.scroll_offset, 7);
    }

    #[test]
    fn visible_books_split_by_shelf_and_honor_the_filter() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("Dune", "Herbert", 1965, false).unwrap();
        shelf.add("Dune Messiah", "Herbert", 1969, true).unwrap();
        shelf.add("Hyperion", "Simmons", 1989, false).unwrap();

        let mut state = AppState::default();
        let reading: Vec<_> =
            state.visible_books(&shelf, Shelf::Reading).iter().map(|b| b.title.as_str()).collect();
        assert_eq!(reading, vec!["Dune", "Hyperion"]);

        state.status.query.set_value("dune");
        let reading: Vec<_> =
            state.visible_books(&shelf, Shelf::Reading).iter().map(|b| b.title.as_str()).collect();
        let finished: Vec<_> =
            state.visible_books(&shelf, Shelf::Finished).iter().map(|b| b.title.as_str()).collect();
        assert_eq!(reading, vec!["Dune"]);
        assert_eq!(finished, vec!["Dune Messiah"]);
    }

    #[test]
    fn search_lifecycle_keeps_or_drops_the_query() {
        let mut status = StatusLine::default();
        status.begin_search();
        status.query.set_value("dun");
        status.commit_search();
        assert!(!status.searching);
        assert_eq!(status.query.value(), "dun");

        status.begin_search();
        assert!(status.query.is_empty());
        status.query.set_value("hyp");
        status.cancel_search();
        assert!(status.query.is_empty());
    }

    #[test]
    fn shelf_other_flips_sides() {
        assert_eq!(Shelf::Reading.other(), Shelf::Finished);
        assert_eq!(Shelf::Finished.other(), Shelf::Reading);
    }
}
