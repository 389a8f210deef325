use std::path::Path;

use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, db_path: &Path, batch: Option<i64>, format: &OutputFormat) -> Result<()> {
    let store = app.open_store(db_path)?;
    let cards = store.list_cards(batch)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards found.");
                return Ok(());
            }

            let front_w = cards
                .iter()
                .map(|c| c.front_text.chars().count())
                .max()
                .unwrap_or(5)
                .clamp(5, 40);

            println!("{:<5} {:<front_w$} {}", "Batch", "Front", "Back", front_w = front_w);
            println!(
                "{} {} {}",
                "\u{2500}".repeat(5),
                "\u{2500}".repeat(front_w),
                "\u{2500}".repeat(20)
            );

            for card in &cards {
                println!(
                    "{:<5} {:<front_w$} {}",
                    card.batch_number,
                    shorten(&card.front_text, front_w),
                    shorten(&card.back_text, 60),
                    front_w = front_w
                );
            }

            if batch.is_none() {
                let counts = store.batch_counts()?;
                let summary: Vec<String> = counts
                    .iter()
                    .map(|c| format!("{}: {}", c.batch_number, c.card_count))
                    .collect();
                println!("\n{} cards ({})", cards.len(), summary.join(", "));
            } else {
                println!("\n{} cards", cards.len());
            }
        }
    }

    Ok(())
}

/// One display line, cut at `max` characters
fn shorten(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
