//! Answer requester: builds the prompt, invokes the dispatched model once,
//! and parses the output strictly into a `StructuredAnswer`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::images::inline_part;
use crate::llm::{ChatModel, Prompt};

/// Fixed-shape parsed output of one question. Immutable once returned;
/// `question` always holds the verbatim user input, never the model's echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub question: String,
    pub title: String,
    pub answer: String,
    pub exam_tips: Vec<String>,
    pub common_traps: Vec<String>,
    pub tags: Vec<String>,
}

/// System instruction: assistant role plus the exact output shape. The
/// model must answer in the question's language and return bare JSON.
const SYSTEM_PROMPT: &str = r#"You are a helpful study assistant that answers exam-preparation questions.

Provide clear, structured, and detailed explanations in the same language as the question. Include practical examples and important considerations when relevant. Format list entries as markdown-friendly bullet lines starting with "- ".

Respond with a single JSON object and nothing else, with exactly these keys:
{
  "question": "the user's original question",
  "title": "a concise title summarizing the answer (used as the note page title)",
  "answer": "the detailed answer",
  "exam_tips": ["tips that help answer this kind of question under exam conditions"],
  "common_traps": ["mistakes and misconceptions commonly tested against"],
  "tags": ["3-7 short tags naming the key services, technologies, or concepts"]
}"#;

/// Build the request body: plain text without images, one multimodal
/// message otherwise, question text first and images in input order.
pub fn build_prompt(question: &str, image_paths: &[PathBuf]) -> Result<Prompt> {
    if image_paths.is_empty() {
        return Ok(Prompt::Text(question.to_string()));
    }

    let images = image_paths
        .iter()
        .map(|path| inline_part(path))
        .collect::<Result<Vec<_>>>()?;

    Ok(Prompt::Multimodal {
        text: question.to_string(),
        images,
    })
}

/// Ask one question. Exactly one model invocation; the provider's own
/// transient retry count is the only retry policy. A response that does not
/// parse into the structured shape is fatal to this call.
pub async fn answer_question(
    model: &dyn ChatModel,
    question: &str,
    image_paths: &[PathBuf],
) -> Result<StructuredAnswer> {
    let prompt = build_prompt(question, image_paths)?;

    tracing::debug!("Sending question to {}", model.model());
    let raw = model
        .complete(SYSTEM_PROMPT, &prompt)
        .await
        .context("answer generation failed")?;

    let mut answer = parse_structured(&raw).context("answer generation failed")?;

    // The model is not trusted to echo the question verbatim
    answer.question = question.to_string();

    Ok(answer)
}

/// Strict parse of the raw model output. Tolerates a surrounding markdown
/// code fence, nothing else; no salvage of partially valid output.
pub fn parse_structured(raw: &str) -> Result<StructuredAnswer> {
    let stripped = strip_code_fence(raw.trim());
    serde_json::from_str(stripped)
        .with_context(|| format!("model output did not match the expected shape: {stripped}"))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.split_once('\n').map(|(_, body)| body) else {
        return text;
    };
    rest.rsplit_once("```").map(|(body, _)| body.trim()).unwrap_or(text)
}
