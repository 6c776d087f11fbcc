//! Binary entry point: resolve the data directory, start logging, open the
//! catalog, and hand control to the terminal UI until the user quits.
use book_catalog::{logging, open_catalog, run_app, App, AppPaths};

/// Startup failures (no home directory, unreadable database, no terminal)
/// bubble out of `main`. Once the UI runs, errors are shown inside it.
fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    logging::init(&paths.log_path)?;

    let conn = open_catalog(&paths.db_path)?;
    let mut app = App::new(conn)?;
    run_app(&mut app)
}
