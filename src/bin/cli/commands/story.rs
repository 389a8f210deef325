use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use pauker_lib::cloze::render_html_page;
use pauker_lib::story::{generate_story, TextGenerator};

use crate::app::App;

pub fn run(app: &App, db_path: &Path, out_dir: Option<&Path>) -> Result<()> {
    let generator = app.generator()?;
    generate_and_render(app, db_path, &generator, out_dir)
}

/// Generate a dialog, store it and write its cloze page
pub fn generate_and_render(
    app: &App,
    db_path: &Path,
    generator: &dyn TextGenerator,
    out_dir: Option<&Path>,
) -> Result<()> {
    let store = app.open_store(db_path)?;
    let example = generate_story(&store, generator, &app.config.story)
        .context("Failed to generate example story")?;

    let page = render_html_page(&example.body).context("Generated dialog is not valid cloze markup")?;
    let page_path = app.page_path(out_dir, &example.id);
    if let Some(parent) = page_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&page_path, page)
        .with_context(|| format!("Failed to write {}", page_path.display()))?;

    println!("{}\n", example.body);
    println!("Stored example {} and wrote {}", example.id, page_path.display());
    Ok(())
}
