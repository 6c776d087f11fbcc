//! Form controller: the toolkit-independent half of the application. It owns
//! the input fields, the displayed rows, and the selection state, and turns
//! named actions into store calls. Nothing here knows about terminals, so the
//! whole add/update/delete/search workflow can be driven from tests.
//!
//! The connection is borrowed per call rather than stored, which keeps the
//! controller a plain value and leaves ownership of the database with the
//! caller.

mod error;
mod fields;
mod table;

use std::fmt;

use log::{error, info, warn};
use rusqlite::Connection;

use crate::db::{create_book, delete_book, fetch_books, search_books, update_book};
use crate::models::Book;

pub use error::CatalogError;
pub use fields::{Field, FormFields};
pub use table::{parse_row, RecordTable, COLUMNS};

/// Named commands the form understands. `ALL` and `from_name` form the table front
/// ends map their buttons or keys onto.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Delete,
    Search,
    Clear,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Add,
        Action::Update,
        Action::Delete,
        Action::Search,
        Action::Clear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Search => "search",
            Action::Clear => "clear",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which record, if any, the form is editing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Editing(i64),
}

impl Selection {
    pub fn id(self) -> Option<i64> {
        match self {
            Selection::Idle => None,
            Selection::Editing(id) => Some(id),
        }
    }
}

/// Severity of a notice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// What the user should be told after an action. Blocking notices are meant
/// for a dialog the user dismisses; the rest fit in a status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub blocking: bool,
}

impl Notice {
    pub fn status(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: String::new(),
            message: message.into(),
            blocking: false,
        }
    }

    pub fn dialog(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
            blocking: true,
        }
    }
}

impl From<CatalogError> for Notice {
    fn from(err: CatalogError) -> Self {
        let kind = if err.is_user_error() {
            NoticeKind::Warning
        } else {
            NoticeKind::Error
        };
        Self {
            kind,
            title: err.title().to_string(),
            message: err.to_string(),
            blocking: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FormController {
    fields: FormFields,
    table: RecordTable,
    selection: Selection,
    query: String,
}

impl FormController {
    /// Build a controller with the table already showing every record.
    pub fn load(conn: &Connection) -> Result<Self, CatalogError> {
        let mut controller = Self::default();
        controller.reload(conn)?;
        Ok(controller)
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RecordTable {
        &mut self.table
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Run a named action and convert the outcome, success or failure, into a
    /// notice. Errors stop here.
    pub fn dispatch(&mut self, conn: &Connection, action: Action) -> Notice {
        let result = match action {
            Action::Add => self.add(conn),
            Action::Update => self.update(conn),
            Action::Delete => self.delete(conn),
            Action::Search => {
                let query = self.query.clone();
                self.search(conn, &query)
            }
            Action::Clear => Ok(self.clear_form()),
        };

        result.unwrap_or_else(|err| {
            if err.is_user_error() {
                warn!("{action} rejected: {err}");
            } else {
                error!("{action} failed: {err}");
            }
            Notice::from(err)
        })
    }

    /// Same as `dispatch`, looked up by action name.
    pub fn dispatch_named(&mut self, conn: &Connection, name: &str) -> Option<Notice> {
        Action::from_name(name).map(|action| self.dispatch(conn, action))
    }

    /// Put a record into the form and start editing it.
    pub fn select_record(&mut self, book: &Book) {
        self.fields.fill_from(book);
        self.selection = Selection::Editing(book.id);
    }

    /// Row-activated event: select the row under the table cursor. A row that
    /// cannot be parsed leaves the form idle.
    pub fn activate_selected_row(&mut self) -> Result<Book, CatalogError> {
        let values = self
            .table
            .selected_values()
            .ok_or(CatalogError::NothingSelected)?;
        match parse_row(values) {
            Ok(book) => {
                self.select_record(&book);
                Ok(book)
            }
            Err(err) => {
                self.selection = Selection::Idle;
                Err(err)
            }
        }
    }

    pub fn add(&mut self, conn: &Connection) -> Result<Notice, CatalogError> {
        let fields = self.fields.parse_inputs()?;
        let book = create_book(conn, &fields)?;
        info!("added book {}: {}", book.id, book.title);

        self.finish_mutation(conn)?;
        Ok(Notice::status(format!("Added \"{}\".", book.title)))
    }

    pub fn update(&mut self, conn: &Connection) -> Result<Notice, CatalogError> {
        let id = self.selection.id().ok_or(CatalogError::NoSelection {
            action: Action::Update,
        })?;
        let fields = self.fields.parse_inputs()?;
        update_book(conn, id, &fields)?;
        info!("updated book {id}");

        self.finish_mutation(conn)?;
        Ok(Notice::dialog("Success", "Book updated successfully."))
    }

    pub fn delete(&mut self, conn: &Connection) -> Result<Notice, CatalogError> {
        let id = self.selection.id().ok_or(CatalogError::NoSelection {
            action: Action::Delete,
        })?;
        delete_book(conn, id)?;
        info!("deleted book {id}");

        self.finish_mutation(conn)?;
        Ok(Notice::dialog("Success", "Book deleted successfully."))
    }

    /// Show only the records matching `query`. Selection and fields are left
    /// alone.
    pub fn search(&mut self, conn: &Connection, query: &str) -> Result<Notice, CatalogError> {
        let books = search_books(conn, query)?;
        self.table.show(&books);

        let message = match books.len() {
            1 => "1 book found.".to_string(),
            n => format!("{n} books found."),
        };
        Ok(Notice::status(message))
    }

    /// Empty the inputs and drop the selection. The store is not touched.
    pub fn clear_form(&mut self) -> Notice {
        self.fields.clear_all();
        self.selection = Selection::Idle;
        Notice::status("Form cleared.")
    }

    /// Refill the table with every stored record.
    pub fn reload(&mut self, conn: &Connection) -> Result<(), CatalogError> {
        let books = fetch_books(conn)?;
        self.table.show(&books);
        Ok(())
    }

    /// A mutation ends any search: the form resets and every record is shown.
    fn finish_mutation(&mut self, conn: &Connection) -> Result<(), CatalogError> {
        self.clear_form();
        self.query.clear();
        self.reload(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{count_books, open_in_memory};

    fn fill(controller: &mut FormController, values: [&str; 4]) {
        for (field, value) in Field::ALL.into_iter().zip(values) {
            controller.fields_mut().set(field, value);
        }
    }

    #[test]
    fn action_names_resolve_both_ways() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name(" Delete "), Some(Action::Delete));
        assert_eq!(Action::from_name("undo"), None);
    }

    #[test]
    fn add_with_empty_field_is_a_warning_and_writes_nothing() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        fill(&mut controller, ["Dune", "", "1965", "SciFi"]);

        let notice = controller.dispatch(&conn, Action::Add);
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert!(notice.blocking);
        assert_eq!(count_books(&conn).unwrap(), 0);
        assert_eq!(controller.fields().get(Field::Title), "Dune");
    }

    #[test]
    fn update_and_delete_need_a_selection() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        fill(&mut controller, ["Dune", "Herbert", "1965", "SciFi"]);

        for action in [Action::Update, Action::Delete] {
            let notice = controller.dispatch(&conn, action);
            assert_eq!(notice.kind, NoticeKind::Warning);
            assert_eq!(notice.message, format!("Select a book to {action} first."));
        }
        assert_eq!(count_books(&conn).unwrap(), 0);
    }

    #[test]
    fn activating_a_row_enters_editing() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        fill(&mut controller, ["Dune", "Herbert", "1965", "SciFi"]);
        controller.dispatch(&conn, Action::Add);
        assert_eq!(controller.selection(), Selection::Idle);
        assert!(controller.fields().is_blank());

        let book = controller.activate_selected_row().unwrap();
        assert_eq!(controller.selection(), Selection::Editing(book.id));
        assert_eq!(controller.fields().get(Field::Author), "Herbert");

        controller.dispatch(&conn, Action::Clear);
        assert_eq!(controller.selection(), Selection::Idle);
        assert_eq!(count_books(&conn).unwrap(), 1);
    }

    #[test]
    fn activating_with_no_rows_reports_nothing_selected() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        assert!(matches!(
            controller.activate_selected_row(),
            Err(CatalogError::NothingSelected)
        ));
    }

    #[test]
    fn malformed_row_leaves_selection_idle() {
        let mut controller = FormController::default();
        controller.select_record(&Book::from_fields(
            9,
            crate::models::BookFields::new("a", "b", "c", "d"),
        ));
        controller.table_mut().append_row(
            ["nine", "a", "b", "c", "d"].map(String::from),
        );

        let err = controller.activate_selected_row().unwrap_err();
        assert!(matches!(err, CatalogError::SelectionParse(_)));
        assert_eq!(controller.selection(), Selection::Idle);
        assert_eq!(Notice::from(err).kind, NoticeKind::Warning);
    }

    #[test]
    fn search_keeps_selection_and_store() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        fill(&mut controller, ["Dune", "Herbert", "1965", "SciFi"]);
        controller.dispatch(&conn, Action::Add);
        fill(&mut controller, ["Emma", "Austen", "1815", "Novel"]);
        controller.dispatch(&conn, Action::Add);
        controller.activate_selected_row().unwrap();

        controller.set_query("austen");
        let notice = controller.dispatch(&conn, Action::Search);
        assert_eq!(notice.message, "1 book found.");
        assert_eq!(controller.table().len(), 1);
        assert_eq!(controller.selection(), Selection::Editing(1));
        assert_eq!(count_books(&conn).unwrap(), 2);
    }

    #[test]
    fn mutation_after_search_drops_the_query() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        fill(&mut controller, ["Dune", "Herbert", "1965", "SciFi"]);
        controller.dispatch(&conn, Action::Add);

        controller.set_query("xyz");
        controller.dispatch(&conn, Action::Search);
        assert!(controller.table().is_empty());

        fill(&mut controller, ["Emma", "Austen", "1815", "Novel"]);
        controller.dispatch(&conn, Action::Add);
        assert_eq!(controller.query(), "");
        assert_eq!(controller.table().len(), 2);
    }

    #[test]
    fn storage_failure_becomes_an_error_notice() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        conn.execute("DROP TABLE books", []).unwrap();
        fill(&mut controller, ["Dune", "Herbert", "1965", "SciFi"]);

        let notice = controller.dispatch(&conn, Action::Add);
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title, "Error");
        assert!(notice.message.contains("no such table"));
        assert!(!controller.fields().is_blank());
    }

    #[test]
    fn dispatch_named_ignores_unknown_names() {
        let conn = open_in_memory().unwrap();
        let mut controller = FormController::load(&conn).unwrap();
        assert!(controller.dispatch_named(&conn, "frobnicate").is_none());
        assert_eq!(
            controller.dispatch_named(&conn, "clear"),
            Some(Notice::status("Form cleared."))
        );
    }
}
