//! Book records, the shelf that holds them, and the storage slot behind it

pub mod model;
pub mod shelf;
pub mod storage;

pub use model::{Book, BookFields, BookId};
pub use shelf::Bookshelf;
pub use storage::{SaveEvent, StorageError, StorageSlot, STORAGE_KEY};
