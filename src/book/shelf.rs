//! The bookshelf: in-memory collection plus its mutation surface
//!
//! The shelf owns the ordered book collection and the storage slot it is
//! mirrored to. Every mutating operation flushes the whole collection
//! before returning; an operation that finds no matching record mutates
//! nothing and flushes nothing. Lookups signal "not found" with `None`
//! or `Ok(false)`, never with an error.

use std::sync::mpsc::{self, Receiver};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use super::model::{Book, BookFields, BookId};
use super::storage::{SaveEvent, StorageError, StorageSlot};

/// The book collection and its coupled storage slot.
#[derive(Debug)]
pub struct Bookshelf {
    books: Vec<Book>,
    storage: Option<StorageSlot>,
}

impl Bookshelf {
    /// Open the shelf backed by the given slot.
    ///
    /// Never fails: an unusable slot directory degrades to a memory-only
    /// session, and a malformed or unreadable slot starts empty. Both
    /// cases are logged.
    pub fn open(storage: StorageSlot) -> Self {
        if !storage.is_available() {
            warn!("storage unavailable; changes will not outlive this session");
            return Self { books: Vec::new(), storage: None };
        }

        let books = match storage.load() {
            Ok(books) => books,
            Err(StorageError::Malformed { path, source }) => {
                warn!(
                    slot = %path.display(),
                    error = %source,
                    "slot holds malformed data; starting with an empty shelf"
                );
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "could not read the slot; starting with an empty shelf");
                Vec::new()
            }
        };

        debug!(books = books.len(), "shelf loaded");
        Self { books, storage: Some(storage) }
    }

    /// A shelf with no backing slot. Used for memory-only sessions and
    /// in tests.
    pub fn in_memory() -> Self {
        Self { books: Vec::new(), storage: None }
    }

    /// Whether mutations reach a durable slot or die with the session.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Subscribe to "data saved" notifications. On a memory-only shelf
    /// the receiver simply never yields.
    pub fn subscribe_saves(&mut self) -> Receiver<SaveEvent> {
        match &mut self.storage {
            Some(slot) => slot.subscribe(),
            None => mpsc::channel().1,
        }
    }

    /// All books in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// First book with the given id, if any.
    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Position of the book with the given id, if any.
    pub fn position(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    /// Books not yet finished, in insertion order.
    pub fn reading(&self) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(|book| !book.is_complete)
    }

    /// Finished books, in insertion order.
    pub fn finished(&self) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(|book| book.is_complete)
    }

    /// Lazy case-insensitive substring search over titles, in collection
    /// order. An empty query matches every book. Each call produces a
    /// fresh iterator.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Book> + 'a {
        let needle = query.to_lowercase();
        self.books.iter().filter(move |book| book.title_contains(&needle))
    }

    /// Add a new book to the end of the collection and flush.
    ///
    /// Always succeeds apart from flush failures; there are no duplicate
    /// or validity checks on the fields.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        is_complete: bool,
    ) -> Result<BookId, StorageError> {
        let book = Book::new(self.next_id(), title, author, year, is_complete);
        let id = book.id;

        self.books.push(book);
        if let Err(err) = self.persist() {
            self.books.pop();
            return Err(err);
        }
        Ok(id)
    }

    /// Replace every field except `id` on the matching book and flush.
    /// Returns `Ok(false)` when no book matches; nothing is created in
    /// that case.
    pub fn update(&mut self, id: BookId, fields: BookFields) -> Result<bool, StorageError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let previous = BookFields::of(&self.books[index]);
        self.apply_fields(index, fields);
        if let Err(err) = self.persist() {
            self.apply_fields(index, previous);
            return Err(err);
        }
        Ok(true)
    }

    /// Flip the completion flag on the matching book and flush. Returns
    /// `Ok(false)` when no book matches.
    pub fn toggle_complete(&mut self, id: BookId) -> Result<bool, StorageError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        self.books[index].is_complete = !self.books[index].is_complete;
        if let Err(err) = self.persist() {
            self.books[index].is_complete = !self.books[index].is_complete;
            return Err(err);
        }
        Ok(true)
    }

    /// Remove the matching book and flush. Returns `Ok(false)` when no
    /// book matches; the collection is untouched in that case.
    pub fn remove(&mut self, id: BookId) -> Result<bool, StorageError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.books.remove(index);
        if let Err(err) = self.persist() {
            self.books.insert(index, removed);
            return Err(err);
        }
        Ok(true)
    }

    fn apply_fields(&mut self, index: usize, fields: BookFields) {
        let book = &mut self.books[index];
        book.title = fields.title;
        book.author = fields.author;
        book.year = fields.year;
        book.is_complete = fields.is_complete;
    }

    /// Wall-clock milliseconds, bumped past every existing id so two adds
    /// within one millisecond (or a clock that went backwards) still get
    /// distinct ids. Saturates if a slot already holds the largest id.
    fn next_id(&self) -> BookId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as i64);
        let floor =
            self.books.iter().map(|book| book.id).max().map_or(0, |max| max.saturating_add(1));
        now.max(floor)
    }

    /// Mirror the in-memory collection to the slot. Memory-only shelves
    /// succeed without writing (and without a save notification).
    fn persist(&mut self) -> Result<(), StorageError> {
        match &mut self.storage {
            Some(slot) => slot.flush(&self.books),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    fn persistent_shelf() -> (TempDir, Bookshelf) {
        let dir = TempDir::new().unwrap();
        let shelf = Bookshelf::open(StorageSlot::new(dir.path()));
        (dir, shelf)
    }

    fn fields(title: &str, author: &str, year: i32, is_complete: bool) -> BookFields {
        BookFields {
            title: title.into(),
            author: author.into(),
            year,
            is_complete,
        }
    }

    #[test]
    fn rapid_adds_get_distinct_increasing_ids() {
        let mut shelf = Bookshelf::in_memory();

        let mut ids = Vec::new();
        for n in 0..16 {
            ids.push(shelf.add(format!("Book {n}"), "Anon", 2000, false).unwrap());
        }

        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(deduped, ids);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("First", "A", 1990, false).unwrap();
        shelf.add("Second", "B", 1991, true).unwrap();

        let titles: Vec<_> = shelf.books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn find_and_position_agree() {
        let mut shelf = Bookshelf::in_memory();
        let id = shelf.add("Middlemarch", "George Eliot", 1871, false).unwrap();

        assert_eq!(shelf.find(id).unwrap().title, "Middlemarch");
        assert_eq!(shelf.position(id), Some(0));
        assert!(shelf.find(id + 1).is_none());
        assert_eq!(shelf.position(id + 1), None);
    }

    #[test]
    fn toggle_twice_restores_the_original_flag() {
        let mut shelf = Bookshelf::in_memory();
        let id = shelf.add("Beloved", "Toni Morrison", 1987, false).unwrap();
        let before = shelf.find(id).unwrap().clone();

        assert!(shelf.toggle_complete(id).unwrap());
        assert!(shelf.find(id).unwrap().is_complete);

        assert!(shelf.toggle_complete(id).unwrap());
        assert_eq!(shelf.find(id).unwrap(), &before);
    }

    #[test]
    fn toggle_missing_id_is_a_quiet_no_op() {
        let mut shelf = Bookshelf::in_memory();
        assert!(!shelf.toggle_complete(12345).unwrap());
        assert!(shelf.is_empty());
    }

    #[test]
    fn update_replaces_all_fields_but_keeps_the_id() {
        let mut shelf = Bookshelf::in_memory();
        let id = shelf.add("Drft", "Unknwn", 0, false).unwrap();

        assert!(shelf.update(id, fields("Draft", "Known", 2001, true)).unwrap());

        let book = shelf.find(id).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.title, "Draft");
        assert_eq!(book.author, "Known");
        assert_eq!(book.year, 2001);
        assert!(book.is_complete);
    }

    #[test]
    fn update_missing_id_does_not_upsert() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("Only", "One", 1999, false).unwrap();

        assert!(!shelf.update(777, fields("Ghost", "Nobody", 0, false)).unwrap());
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf.books()[0].title, "Only");
    }

    #[test]
    fn remove_deletes_exactly_one_record() {
        let mut shelf = Bookshelf::in_memory();
        let a = shelf.add("A", "a", 1, false).unwrap();
        let b = shelf.add("B", "b", 2, true).unwrap();
        let c = shelf.add("C", "c", 3, false).unwrap();

        let before: Vec<_> =
            shelf.books().iter().filter(|book| book.id != b).cloned().collect();

        assert!(shelf.remove(b).unwrap());
        assert_eq!(shelf.len(), 2);
        assert_eq!(shelf.books(), before.as_slice());
        assert!(shelf.find(a).is_some());
        assert!(shelf.find(c).is_some());
    }

    #[test]
    fn remove_missing_id_changes_nothing() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("Keeper", "K", 2020, false).unwrap();
        let before: Vec<_> = shelf.books().to_vec();

        assert!(!shelf.remove(31337).unwrap());
        assert_eq!(shelf.books(), before.as_slice());
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("Dune", "Frank Herbert", 1965, false).unwrap();
        shelf.add("Dune Messiah", "Frank Herbert", 1969, false).unwrap();
        shelf.add("Hyperion", "Dan Simmons", 1989, true).unwrap();

        let hits: Vec<_> = shelf.search("DUNE").map(|b| b.title.as_str()).collect();
        assert_eq!(hits, vec!["Dune", "Dune Messiah"]);
    }

    #[test]
    fn empty_query_matches_every_book() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("One", "1", 1, false).unwrap();
        shelf.add("Two", "2", 2, true).unwrap();

        assert_eq!(shelf.search("").count(), 2);
    }

    #[test]
    fn search_is_restartable() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("Ubik", "Philip K. Dick", 1969, false).unwrap();

        assert_eq!(shelf.search("ubik").count(), 1);
        assert_eq!(shelf.search("ubik").count(), 1);
    }

    #[test]
    fn shelf_views_split_by_completion() {
        let mut shelf = Bookshelf::in_memory();
        shelf.add("Open", "x", 1, false).unwrap();
        shelf.add("Done", "y", 2, true).unwrap();
        shelf.add("Also open", "z", 3, false).unwrap();

        let reading: Vec<_> = shelf.reading().map(|b| b.title.as_str()).collect();
        let finished: Vec<_> = shelf.finished().map(|b| b.title.as_str()).collect();
        assert_eq!(reading, vec!["Open", "Also open"]);
        assert_eq!(finished, vec!["Done"]);
    }

    #[test]
    fn mutations_survive_a_reopen() {
        let dir = TempDir::new().unwrap();

        let first_id = {
            let mut shelf = Bookshelf::open(StorageSlot::new(dir.path()));
            let id = shelf.add("Persisted", "P", 2024, false).unwrap();
            shelf.toggle_complete(id).unwrap();
            id
        };

        let shelf = Bookshelf::open(StorageSlot::new(dir.path()));
        assert_eq!(shelf.len(), 1);
        let book = shelf.find(first_id).unwrap();
        assert_eq!(book.title, "Persisted");
        assert!(book.is_complete);
    }

    #[test]
    fn reopened_shelf_never_reissues_an_existing_id() {
        let dir = TempDir::new().unwrap();

        let first = {
            let mut shelf = Bookshelf::open(StorageSlot::new(dir.path()));
            shelf.add("Earlier", "E", 2023, false).unwrap()
        };

        let mut shelf = Bookshelf::open(StorageSlot::new(dir.path()));
        let second = shelf.add("Later", "L", 2024, false).unwrap();
        assert!(second > first);
    }

    #[test]
    fn malformed_slot_degrades_to_an_empty_shelf() {
        let dir = TempDir::new().unwrap();
        let slot = StorageSlot::new(dir.path());
        std::fs::write(slot.slot_path(), "definitely not json").unwrap();

        let shelf = Bookshelf::open(slot);
        assert!(shelf.is_empty());
        assert!(shelf.is_persistent());
    }

    #[test]
    fn unavailable_directory_degrades_to_memory_only() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file in the way").unwrap();

        let mut shelf = Bookshelf::open(StorageSlot::new(blocker.join("sub")));
        assert!(!shelf.is_persistent());

        // Still usable for the session.
        let id = shelf.add("Ephemeral", "E", 2024, false).unwrap();
        assert!(shelf.find(id).is_some());
    }

    #[test]
    fn every_successful_mutation_emits_one_save_event() {
        let (_dir, mut shelf) = persistent_shelf();
        let saves = shelf.subscribe_saves();

        let id = shelf.add("Tracked", "T", 2024, false).unwrap();
        assert_eq!(saves.try_iter().count(), 1);

        shelf.toggle_complete(id).unwrap();
        assert_eq!(saves.try_iter().count(), 1);

        shelf.update(id, fields("Tracked", "T", 2024, true)).unwrap();
        assert_eq!(saves.try_iter().count(), 1);

        shelf.remove(id).unwrap();
        assert_eq!(saves.try_iter().count(), 1);
    }

    #[test]
    fn not_found_mutations_emit_no_save_event() {
        let (_dir, mut shelf) = persistent_shelf();
        let saves = shelf.subscribe_saves();

        assert!(!shelf.toggle_complete(1).unwrap());
        assert!(!shelf.remove(1).unwrap());
        assert!(!shelf.update(1, fields("X", "Y", 0, false)).unwrap());

        assert_eq!(saves.try_iter().count(), 0);
    }

    #[test]
    fn memory_only_shelf_emits_no_save_events() {
        let mut shelf = Bookshelf::in_memory();
        let saves = shelf.subscribe_saves();

        shelf.add("Quiet", "Q", 2024, false).unwrap();
        assert_eq!(saves.try_iter().count(), 0);
    }

    #[test]
    fn dune_scenario_end_to_end() {
        let (dir, mut shelf) = persistent_shelf();
        assert!(shelf.is_empty());

        let id = shelf.add("Dune", "Herbert", 1965, false).unwrap();
        assert_eq!(shelf.len(), 1);
        assert!(!shelf.find(id).unwrap().is_complete);

        assert!(shelf.toggle_complete(id).unwrap());
        assert!(shelf.find(id).unwrap().is_complete);

        let hits: Vec<_> = shelf.search("dun").collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);

        assert!(shelf.remove(id).unwrap());
        assert!(shelf.is_empty());

        let reopened = Bookshelf::open(StorageSlot::new(dir.path()));
        assert!(reopened.is_empty());
    }

    #[test]
    fn failed_flush_rolls_back_the_mutation() {
        let dir = TempDir::new().unwrap();
        let mut shelf = Bookshelf::open(StorageSlot::new(dir.path()));
        let saves = shelf.subscribe_saves();
        let first = shelf.add("Kept", "K", 2020, false).unwrap();
        shelf.add("Also kept", "A", 2021, true).unwrap();
        assert_eq!(saves.try_iter().count(), 2);

        // Turn the slot file into a directory so every flush now fails.
        let slot_file = StorageSlot::new(dir.path()).slot_path();
        std::fs::remove_file(&slot_file).unwrap();
        std::fs::create_dir(&slot_file).unwrap();

        let before = shelf.books().to_vec();

        assert!(shelf.add("Dropped", "D", 2022, false).is_err());
        assert_eq!(shelf.books(), before.as_slice());

        assert!(shelf.toggle_complete(first).is_err());
        assert_eq!(shelf.books(), before.as_slice());

        assert!(shelf.update(first, fields("Renamed", "R", 1999, true)).is_err());
        assert_eq!(shelf.books(), before.as_slice());

        assert!(shelf.remove(first).is_err());
        assert_eq!(shelf.books(), before.as_slice());

        assert_eq!(saves.try_iter().count(), 0);
    }

    #[test]
    fn add_survives_a_slot_already_at_the_largest_id() {
        let dir = TempDir::new().unwrap();
        let slot = StorageSlot::new(dir.path());
        std::fs::write(
            slot.slot_path(),
            r#"[{"id":9223372036854775807,"title":"Edge","author":"E","year":2024,"isComplete":false}]"#,
        )
        .unwrap();

        let mut shelf = Bookshelf::open(slot);
        let id = shelf.add("After", "A", 2024, false).unwrap();
        assert_eq!(id, i64::MAX);
        assert_eq!(shelf.len(), 2);
    }

    fn arb_books() -> impl Strategy<Value = Vec<Book>> {
        prop::collection::vec(
            ("[a-zA-Z0-9 ]{0,24}", "[a-zA-Z ]{0,16}", 0..3000i32, any::<bool>()),
            0..8,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(n, (title, author, year, is_complete))| {
                    Book::new(n as BookId + 1, title, author, year, is_complete)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_search_matches_the_lowercase_contains_oracle(
            books in arb_books(),
            needle in "[a-zA-Z0-9 ]{0,6}",
        ) {
            let mut shelf = Bookshelf::in_memory();
            for book in &books {
                shelf.add(book.title.clone(), book.author.clone(), book.year, book.is_complete)
                    .unwrap();
            }

            let expected: Vec<String> = shelf
                .books()
                .iter()
                .filter(|book| book.title.to_lowercase().contains(&needle.to_lowercase()))
                .map(|book| book.title.clone())
                .collect();
            let found: Vec<String> =
                shelf.search(&needle).map(|book| book.title.clone()).collect();

            prop_assert_eq!(found, expected);
        }

        #[test]
        fn prop_collection_round_trips_through_the_slot_encoding(books in arb_books()) {
            let encoded = serde_json::to_string(&books).unwrap();
            let decoded: Vec<Book> = serde_json::from_str(&encoded).unwrap();
            prop_assert_eq!(decoded, books);
        }
    }
}
