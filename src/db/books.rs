use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection, Row};

use crate::models::{Book, BookFields};

/// `year` lives in an INTEGER-affinity column, so SQLite may hand back an
/// integer or a text value. Casting keeps the read side uniformly textual.
const SELECT_BOOKS: &str = "SELECT id, title, author, CAST(year AS TEXT), category FROM books";

fn row_to_book(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        category: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

/// Insert a new book and return the row as stored, so the id and any value
/// SQLite coerced (numeric `year` text) match what a later fetch sees.
pub fn create_book(conn: &Connection, fields: &BookFields) -> Result<Book> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;
    tx.execute(
        "INSERT INTO books (title, author, year, category) VALUES (?1, ?2, ?3, ?4)",
        params![fields.title, fields.author, fields.year, fields.category],
    )
    .context("failed to insert book")?;
    let id = tx.last_insert_rowid();
    let book = tx
        .query_row(&format!("{SELECT_BOOKS} WHERE id = ?1"), [id], row_to_book)
        .context("failed to read back new book")?;
    tx.commit().context("failed to commit new book")?;

    debug!("inserted book {id}");
    Ok(book)
}

/// Every book in storage order (rowid, which follows insertion).
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare(SELECT_BOOKS)
        .context("failed to prepare book query")?;

    let books = stmt
        .query_map([], row_to_book)
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    Ok(books)
}

/// Match `query` as a substring of title, author, or category. `LIKE` is
/// case-insensitive for ASCII; an empty query matches every row. Wildcards in
/// the query are passed through untouched.
pub fn search_books(conn: &Connection, query: &str) -> Result<Vec<Book>> {
    let pattern = format!("%{query}%");
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_BOOKS} WHERE title LIKE ?1 OR author LIKE ?1 OR category LIKE ?1"
        ))
        .context("failed to prepare search query")?;

    let books = stmt
        .query_map([&pattern], row_to_book)
        .context("failed to search books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect search results")?;

    debug!("search {query:?} matched {} book(s)", books.len());
    Ok(books)
}

/// Replace all editable fields of book `id`. A missing id is not an error;
/// the returned count tells whether anything changed.
pub fn update_book(conn: &Connection, id: i64, fields: &BookFields) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;
    let updated = tx
        .execute(
            "UPDATE books SET title = ?1, author = ?2, year = ?3, category = ?4 WHERE id = ?5",
            params![fields.title, fields.author, fields.year, fields.category, id],
        )
        .context("failed to update book")?;
    tx.commit().context("failed to commit book update")?;

    debug!("update of book {id} touched {updated} row(s)");
    Ok(updated)
}

/// Remove book `id`. Deleting an id that is already gone is a no-op.
pub fn delete_book(conn: &Connection, id: i64) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;
    let deleted = tx
        .execute("DELETE FROM books WHERE id = ?1", params![id])
        .context("failed to delete book")?;
    tx.commit().context("failed to commit book deletion")?;

    debug!("delete of book {id} touched {deleted} row(s)");
    Ok(deleted)
}

pub fn count_books(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
        .context("failed to count books")
}
