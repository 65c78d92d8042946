pub mod book_list_loader;

pub use book_list_loader::{load_book_list, BookEntry, BookList};
