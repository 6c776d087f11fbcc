use crate::models::Book;

use super::CatalogError;

/// Column headings of the record table, in display order.
pub const COLUMNS: [&str; 5] = ["ID", "Title", "Author", "Year", "Category"];

/// Display surface: the rows currently shown and a cursor over them. Rows are
/// kept as display strings, the same way a widget toolkit would hold them.
#[derive(Clone, Debug, Default)]
pub struct RecordTable {
    rows: Vec<[String; 5]>,
    cursor: usize,
}

impl RecordTable {
    pub fn clear_rows(&mut self) {
        self.rows.clear();
        self.cursor = 0;
    }

    pub fn append_row(&mut self, values: [String; 5]) {
        self.rows.push(values);
    }

    /// Replace the contents with `books`, keeping the cursor in bounds.
    pub fn show(&mut self, books: &[Book]) {
        let cursor = self.cursor;
        self.clear_rows();
        for book in books {
            self.append_row(book.row_values());
        }
        self.cursor = cursor.min(self.rows.len().saturating_sub(1));
    }

    pub fn rows(&self) -> &[[String; 5]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, offset: isize) {
        if self.rows.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.rows.len() as isize - 1;
        self.cursor = (self.cursor as isize + offset).clamp(0, max) as usize;
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    /// Values of the row under the cursor, if any row is shown.
    pub fn selected_values(&self) -> Option<&[String]> {
        self.rows.get(self.cursor).map(|row| row.as_slice())
    }
}

/// Turn a displayed row back into a record. Anything other than five values
/// with an integer id in front is rejected.
pub fn parse_row(values: &[String]) -> Result<Book, CatalogError> {
    let [id, title, author, year, category] = values else {
        return Err(CatalogError::SelectionParse(format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            values.len()
        )));
    };
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| CatalogError::SelectionParse(format!("invalid id {id:?}")))?;

    Ok(Book {
        id,
        title: title.clone(),
        author: author.clone(),
        year: year.clone(),
        category: category.clone(),
    })
}
