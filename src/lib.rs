//! Core library surface for the book catalog terminal application.
//!
//! `db` holds the SQLite store, `controller` the toolkit-independent form
//! workflow, and `ui` the Ratatui front-end that drives it.
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

/// Opening the catalog is all `main.rs` needs from the persistence layer.
pub use db::open_catalog;

pub use config::AppPaths;
pub use controller::{Action, CatalogError, FormController, Notice, NoticeKind, Selection};
pub use models::{Book, BookFields};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
