use std::path::Path;

use anyhow::{anyhow, Result};

use pauker_lib::import::import_file;
use pauker_lib::story::StoryError;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, input: &Path, output: &Path, example: bool, format: &OutputFormat) -> Result<()> {
    let summary = import_file(input, output, &app.config.import)
        .map_err(|e| anyhow!("import failed at {} stage: {}", e.stage(), e))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => println!(
            "Imported {} into {}: {} batches, {} cards inserted, {} duplicates skipped",
            input.display(),
            output.display(),
            summary.batches,
            summary.inserted,
            summary.skipped
        ),
    }

    if example {
        match app.generator() {
            Ok(generator) => super::story::generate_and_render(app, output, &generator, None)?,
            Err(e) if is_missing_key(&e) => {
                log::warn!("Skipping example story generation: {:#}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn is_missing_key(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<StoryError>(), Some(StoryError::MissingApiKey(_)))
}
