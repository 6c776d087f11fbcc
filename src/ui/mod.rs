//! Ratatui front-end: a four-field form above the record table, a footer with
//! status and key hints, and modal overlays for search, confirmation, and
//! notices. All catalog logic lives in the controller; this module only maps
//! keys to actions and draws the result.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
