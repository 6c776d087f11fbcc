//! Persistence for the single `books` table, split into connection setup and
//! the CRUD queries.

mod books;
mod connection;

pub use books::{count_books, create_book, delete_book, fetch_books, search_books, update_book};
pub use connection::{ensure_schema, open_catalog, open_in_memory};
