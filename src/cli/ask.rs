use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

use studymate::capabilities::supports_vision;
use studymate::config::Settings;
use studymate::images::{validate_image_path, MAX_IMAGES};
use studymate::llm::dispatch;
use studymate::qna::{self, StructuredAnswer};
use studymate::notion;

#[derive(Args, Default)]
pub struct AskArgs {
    /// The question to ask; opens $EDITOR when omitted
    pub question: Option<String>,

    /// Model to use (overrides the configured default)
    #[arg(short, long)]
    pub model: Option<String>,
}

pub async fn run(args: AskArgs) -> Result<()> {
    let settings = Settings::load();
    let model_name = args
        .model
        .unwrap_or_else(|| settings.default_model.clone());

    let session_label = Local::now().format("%Y-%m-%d-%H:%M").to_string();
    println!("🔗 Session: {session_label}");

    let question = match args.question {
        Some(question) => question,
        None => match edit_question()? {
            Some(question) => question,
            None => {
                println!("❌ No question entered.");
                return Ok(());
            }
        },
    };

    let mut rl = DefaultEditor::new()?;

    let mut image_paths: Vec<PathBuf> = Vec::new();
    if crate::cli::confirm(&mut rl, "📸 Add images?", false)? {
        if !supports_vision(&model_name) {
            println!("⚠️  Model {model_name} does not accept image input; continuing with text only.");
        } else if !collect_image_paths(&mut rl, &mut image_paths)? {
            println!("👋 Question cancelled.");
            return Ok(());
        }
    }

    // Unknown model names fail here, before any network call
    let model = dispatch(&model_name, &settings)?;

    println!("🔥 Generating an answer with {model_name}...");
    let answer = qna::answer_question(model.as_ref(), &question, &image_paths).await?;

    print_answer(&answer);

    if crate::cli::confirm(&mut rl, "💾 Save to Notion?", true)? {
        notion::export(&settings, &answer, &session_label, &image_paths).await?;
        println!("✅ Saved to Notion!");
    } else {
        println!("👋 Not saved.");
    }

    Ok(())
}

/// Prompt for up to MAX_IMAGES paths. Invalid entries are reported and
/// skipped; an empty line ends entry. Returns false when the user cancels
/// the whole question.
fn collect_image_paths(rl: &mut DefaultEditor, image_paths: &mut Vec<PathBuf>) -> Result<bool> {
    println!("💡 Add image paths (max {MAX_IMAGES}, Enter to finish, q to cancel)\n");

    for i in 0..MAX_IMAGES {
        let line = match rl.readline(&format!("Image path ({}/{}): ", i + 1, MAX_IMAGES)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();

        if line.is_empty() {
            break;
        }
        if matches!(line.to_lowercase().as_str(), "q" | "quit" | "cancel" | "exit") {
            return Ok(false);
        }

        let path = PathBuf::from(shellexpand::tilde(line).to_string());
        match validate_image_path(&path) {
            Ok(()) => {
                println!("✅ Added: {}", path.display());
                image_paths.push(path);
            }
            Err(e) => println!("❌ {e}"),
        }
    }

    Ok(true)
}

/// Open $EDITOR on a scratch file and return its trimmed content, or None
/// when the user saved nothing.
fn edit_question() -> Result<Option<String>> {
    println!("💡 Enter your question in the editor, then save and close.");

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string());

    let file = tempfile::Builder::new().suffix(".md").tempfile()?;
    let status = std::process::Command::new(&editor)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to launch editor: {editor}"))?;
    if !status.success() {
        anyhow::bail!("Editor exited abnormally ({status})");
    }

    let content = std::fs::read_to_string(file.path())?;
    let trimmed = content.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn print_answer(answer: &StructuredAnswer) {
    let rule = "=".repeat(60);
    println!("\n{rule}");
    println!("📌 {}", answer.title);
    println!("{rule}\n");
    println!("💡 Answer:\n\n{}\n", answer.answer);
    println!("📝 Exam tips:");
    for tip in &answer.exam_tips {
        println!("  {tip}");
    }
    println!("\n⚠️  Common traps:");
    for trap in &answer.common_traps {
        println!("  {trap}");
    }
    println!("\n🏷️  Tags: {}\n", answer.tags.join(", "));
    println!("{rule}\n");
}
