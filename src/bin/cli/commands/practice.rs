use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};

use pauker_lib::cloze::ClozeSession;

use crate::app::App;

/// Reveal an example in the terminal: Enter advances, `q` quits
pub fn run(app: &App, db_path: &Path, example_id: Option<&str>) -> Result<()> {
    let store = app.open_store(db_path)?;
    let example = match example_id {
        Some(id) => store.get_example(id)?,
        None => store.latest_example()?,
    }
    .context("No example found. Generate one with `pauker-cli story`.")?;

    let mut session = ClozeSession::from_markup(&example.body)
        .with_context(|| format!("Example {} is not valid cloze markup", example.id))?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    loop {
        println!("{}\n", session.render_text());
        if session.is_complete() {
            break;
        }

        print!("[Enter] reveal, [q] quit: ");
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        if line?.trim().eq_ignore_ascii_case("q") {
            break;
        }
        session.advance();
    }

    Ok(())
}
