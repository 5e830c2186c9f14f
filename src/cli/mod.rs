pub mod ask;
pub mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

#[derive(Parser)]
#[command(name = "studymate")]
#[command(author, version, about = "A multimodal exam-prep Q&A assistant")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question and optionally save the answer to Notion
    Ask(ask::AskArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Ask(ask::AskArgs::default())
    }
}

/// Yes/no prompt. Ctrl-C and Ctrl-D read as "no".
pub(crate) fn confirm(rl: &mut DefaultEditor, prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let line = match rl.readline(&format!("{prompt} {hint} ")) {
        Ok(line) => line,
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    Ok(match line.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}
