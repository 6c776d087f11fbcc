//! Domain models that mirror the `books` table. They stay plain data holders so
//! the persistence layer and the form controller can pass them around freely.

use std::fmt;

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Primary key assigned by SQLite on insert. Never changes afterwards.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Free-form text. The column is INTEGER-typed but any input is accepted.
    pub year: String,
    pub category: String,
}

impl Book {
    /// Attach a store-assigned id to a set of field values.
    pub fn from_fields(id: i64, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            year: fields.year,
            category: fields.category,
        }
    }

    /// The editable part of the record.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year.clone(),
            category: self.category.clone(),
        }
    }

    /// Values in display-column order: id, title, author, year, category.
    pub fn row_values(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.title.clone(),
            self.author.clone(),
            self.year.clone(),
            self.category.clone(),
        ]
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} ({})", self.title, self.author, self.year)
    }
}

/// The four user-editable values of a book, without an id. This is what the
/// form hands to `create_book` and `update_book`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year: String,
    pub category: String,
}

impl BookFields {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: year.into(),
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_values_follow_column_order() {
        let book = Book::from_fields(7, BookFields::new("Dune", "Herbert", "1965", "SciFi"));
        assert_eq!(
            book.row_values(),
            ["7", "Dune", "Herbert", "1965", "SciFi"].map(String::from)
        );
        assert_eq!(book.to_string(), "Dune by Herbert (1965)");
    }
}
