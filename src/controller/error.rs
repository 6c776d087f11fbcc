use thiserror::Error;

use super::Action;

/// Everything that can stop a form action. Only `Storage` comes from below the
/// controller; the rest are user errors the form detects itself.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("All fields must be filled in.")]
    MissingFields,

    #[error("Select a book to {} first.", .action.name())]
    NoSelection { action: Action },

    #[error("No book is selected.")]
    NothingSelected,

    #[error("Could not read the selected row: {0}")]
    SelectionParse(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl CatalogError {
    /// Short heading used as the dialog title.
    pub fn title(&self) -> &'static str {
        match self {
            CatalogError::MissingFields => "Input Error",
            CatalogError::NoSelection { action: Action::Update } => "Update Error",
            CatalogError::NoSelection { action: Action::Delete } => "Delete Error",
            CatalogError::NoSelection { .. } => "Selection Error",
            CatalogError::NothingSelected | CatalogError::SelectionParse(_) => "Selection Error",
            CatalogError::Storage(_) => "Error",
        }
    }

    /// Whether the user can fix this by changing their input.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, CatalogError::Storage(_))
    }
}
