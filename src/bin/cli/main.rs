mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pauker_lib::config::{Provider, DEFAULT_DATABASE};

#[derive(Parser)]
#[command(name = "pauker-cli", about = "Convert Pauker lessons to SQLite and practice with cloze dialogs", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Model {
    Openai,
    Gemini,
}

impl From<Model> for Provider {
    fn from(model: Model) -> Self {
        match model {
            Model::Openai => Provider::OpenAi,
            Model::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Import a Pauker .pau.gz lesson into a SQLite database
    Import {
        /// Input Pauker .pau.gz file
        #[arg(short, long)]
        input: PathBuf,
        /// Output SQLite database file
        #[arg(short, long, default_value = DEFAULT_DATABASE)]
        output: PathBuf,
        /// Generate an example dialog from cards outside the first batch
        #[arg(long)]
        example: bool,
        /// Model provider for the example dialog
        #[arg(long)]
        model: Option<Model>,
        /// Output format for the import summary
        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },

    /// Generate a practice dialog and write its cloze page
    Story {
        /// SQLite database file
        #[arg(short, long, default_value = DEFAULT_DATABASE)]
        output: PathBuf,
        /// Model provider
        #[arg(long)]
        model: Option<Model>,
        /// Directory for the HTML page
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Reveal a stored dialog step by step in the terminal
    Practice {
        /// SQLite database file
        #[arg(short, long, default_value = DEFAULT_DATABASE)]
        output: PathBuf,
        /// Example id (defaults to the most recent)
        #[arg(long)]
        id: Option<String>,
    },

    /// List imported cards
    List {
        /// SQLite database file
        #[arg(short, long, default_value = DEFAULT_DATABASE)]
        output: PathBuf,
        /// Only show one batch
        #[arg(long)]
        batch: Option<i64>,
        /// Output format
        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Import { input, output, example, model, format } => {
            if let Some(model) = model {
                app.config.story.provider = model.into();
            }
            commands::import::run(&app, &input, &output, example, &format)?;
        }
        Command::Story { output, model, out_dir } => {
            if let Some(model) = model {
                app.config.story.provider = model.into();
            }
            commands::story::run(&app, &output, out_dir.as_deref())?;
        }
        Command::Practice { output, id } => {
            commands::practice::run(&app, &output, id.as_deref())?;
        }
        Command::List { output, batch, format } => {
            commands::list::run(&app, &output, batch, &format)?;
        }
    }

    Ok(())
}
