use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rustyline::DefaultEditor;
use std::fs;

use studymate::config::Settings;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the secrets file location
    Path,

    /// Create the secrets file if missing and open it in $EDITOR
    Init,

    /// Delete the secrets file
    Clean,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!(
                "Configuration file location: {}",
                Settings::config_path()?.display()
            );
            Ok(())
        }
        ConfigCommands::Init => init(),
        ConfigCommands::Clean => clean(),
    }
}

fn init() -> Result<()> {
    let path = Settings::config_path()?;

    if !path.exists() {
        Settings::write_template()?;
        println!("✅ Created config template at {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string());

    println!("📝 Opening {} with {editor}", path.display());
    println!("💡 Tip: wrap API keys in double quotes.");

    let status = std::process::Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch editor: {editor}"))?;

    if status.success() {
        println!("✅ Configuration saved.");
    } else {
        eprintln!("⚠️  Editor exited abnormally; check {} by hand.", path.display());
    }

    Ok(())
}

fn clean() -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    if !crate::cli::confirm(&mut rl, "Really delete the configuration?", false)? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let path = Settings::config_path()?;
    fs::remove_file(&path)
        .with_context(|| format!("Failed to delete {}", path.display()))?;
    println!("✅ Deleted {}", path.display());

    Ok(())
}
