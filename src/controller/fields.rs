use crate::models::{Book, BookFields};

use super::CatalogError;

/// The four labelled inputs of the form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Title,
    Author,
    Year,
    Category,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Author, Field::Year, Field::Category];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Year => "Year",
            Field::Category => "Category",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Title => Field::Author,
            Field::Author => Field::Year,
            Field::Year => Field::Category,
            Field::Category => Field::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Title => Field::Category,
            Field::Author => Field::Title,
            Field::Year => Field::Author,
            Field::Category => Field::Year,
        }
    }
}

/// Input surface: raw text of every field plus which one has focus.
#[derive(Clone, Debug, Default)]
pub struct FormFields {
    title: String,
    author: String,
    year: String,
    category: String,
    active: Field,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Year => &self.year,
            Field::Category => &self.category,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    pub fn clear(&mut self, field: Field) {
        self.slot(field).clear();
    }

    /// Empty every field and put focus back on the title.
    pub fn clear_all(&mut self) {
        for field in Field::ALL {
            self.clear(field);
        }
        self.active = Field::Title;
    }

    /// Copy a record's values into the inputs.
    pub fn fill_from(&mut self, book: &Book) {
        self.title = book.title.clone();
        self.author = book.author.clone();
        self.year = book.year.clone();
        self.category = book.category.clone();
    }

    pub fn active(&self) -> Field {
        self.active
    }

    pub fn focus(&mut self, field: Field) {
        self.active = field;
    }

    pub fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the focused field. Control characters are refused.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.slot(field).push(ch);
        true
    }

    pub fn backspace(&mut self) {
        let field = self.active;
        self.slot(field).pop();
    }

    pub fn value_len(&self, field: Field) -> usize {
        self.get(field).chars().count()
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).trim().is_empty())
    }

    /// Validate that all four inputs carry something other than whitespace and
    /// return them trimmed, ready for the store.
    pub fn parse_inputs(&self) -> Result<BookFields, CatalogError> {
        if Field::ALL
            .iter()
            .any(|field| self.get(*field).trim().is_empty())
        {
            return Err(CatalogError::MissingFields);
        }
        Ok(BookFields::new(
            self.title.trim(),
            self.author.trim(),
            self.year.trim(),
            self.category.trim(),
        ))
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Year => &mut self.year,
            Field::Category => &mut self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormFields {
        let mut form = FormFields::default();
        form.set(Field::Title, " Dune ");
        form.set(Field::Author, "Herbert");
        form.set(Field::Year, "1965");
        form.set(Field::Category, "SciFi");
        form
    }

    #[test]
    fn parse_inputs_trims_values() {
        let fields = filled().parse_inputs().unwrap();
        assert_eq!(fields, BookFields::new("Dune", "Herbert", "1965", "SciFi"));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut form = filled();
        form.set(Field::Year, "   ");
        assert!(matches!(
            form.parse_inputs(),
            Err(CatalogError::MissingFields)
        ));
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = FormFields::default();
        form.focus_next();
        assert!(form.push_char('L'));
        assert!(form.push_char('e'));
        assert!(!form.push_char('\n'));
        form.backspace();
        assert_eq!(form.get(Field::Author), "L");
        assert_eq!(form.get(Field::Title), "");

        form.focus_previous();
        form.focus_previous();
        assert_eq!(form.active(), Field::Category);
    }

    #[test]
    fn clear_all_resets_focus() {
        let mut form = filled();
        form.focus(Field::Year);
        form.clear_all();
        assert!(form.is_blank());
        assert_eq!(form.active(), Field::Title);
    }
}
