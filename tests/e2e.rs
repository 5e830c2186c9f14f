use async_trait::async_trait;

use studymate::capabilities::supports_vision;
use studymate::config::Settings;
use studymate::llm::{dispatch, ChatModel, LlmError, Prompt};
use studymate::notion::blocks;
use studymate::qna::{self, StructuredAnswer};

/// A model that answers with a fixed JSON payload, paraphrasing the
/// question the way real models sometimes do.
struct ParaphrasingModel;

#[async_trait]
impl ChatModel for ParaphrasingModel {
    fn model(&self) -> &str {
        "gpt-4o"
    }

    async fn complete(&self, _system: &str, _prompt: &Prompt) -> Result<String, LlmError> {
        Ok(r#"{
            "question": "Explain the S3 Intelligent-Tiering storage class.",
            "title": "S3 Intelligent-Tiering",
            "answer": "A storage class that moves objects between access tiers based on usage.",
            "exam_tips": ["- Remember the per-object monitoring charge"],
            "common_traps": ["- It is not the same as lifecycle transitions"],
            "tags": ["S3", "Storage", "Cost Optimization"]
        }"#
        .to_string())
    }
}

#[tokio::test]
async fn test_ask_flow_keeps_question_verbatim() {
    let question = "What is S3 Intelligent-Tiering?";

    let answer = qna::answer_question(&ParaphrasingModel, question, &[])
        .await
        .unwrap();

    assert_eq!(answer.question, question);
    assert_eq!(answer.title, "S3 Intelligent-Tiering");
    assert_eq!(answer.tags.len(), 3);
}

#[tokio::test]
async fn test_answer_feeds_export_block_assembly() {
    let answer = qna::answer_question(&ParaphrasingModel, "q", &[]).await.unwrap();

    let page = blocks::assemble(&answer, Vec::new());
    let dividers = page.iter().filter(|b| b["type"] == "divider").count();
    assert_eq!(dividers, 4);
    assert_eq!(page[0]["code"]["rich_text"][0]["text"]["content"], "q");
}

#[test]
fn test_unknown_model_fails_before_any_network_call() {
    // No API keys configured, yet the error is about the name, not the keys
    let settings = Settings::default();
    let err = dispatch("mistral-large", &settings).err().unwrap();
    assert_eq!(err.to_string(), "Unknown model: mistral-large");
}

#[test]
fn test_every_documented_family_dispatches_with_a_key() {
    let settings = Settings {
        anthropic_api_key: "a".to_string(),
        openai_api_key: "b".to_string(),
        google_api_key: "c".to_string(),
        ..Default::default()
    };

    for model in ["claude-3-haiku-20240307", "gpt-4o", "o1-mini", "gemini-1.5-flash"] {
        assert!(dispatch(model, &settings).is_ok(), "dispatch failed for {model}");
    }
}

#[test]
fn test_vision_gate_matches_dispatchable_models() {
    // Dispatchable but text-only: the ask flow must refuse image input
    assert!(!supports_vision("gpt-3.5-turbo"));
    assert!(!supports_vision("o1-mini"));
    // Multimodal across all three families
    assert!(supports_vision("gpt-4o"));
    assert!(supports_vision("claude-3-opus-20240229"));
    assert!(supports_vision("gemini-pro-vision"));
}

#[test]
fn test_structured_answer_round_trips_through_serde() {
    let answer = StructuredAnswer {
        question: "q".to_string(),
        title: "t".to_string(),
        answer: "a".to_string(),
        exam_tips: vec!["tip".to_string()],
        common_traps: vec![],
        tags: vec!["Tag".to_string()],
    };

    let json = serde_json::to_string(&answer).unwrap();
    let parsed = qna::parse_structured(&json).unwrap();
    assert_eq!(parsed.title, "t");
    assert!(parsed.common_traps.is_empty());
}
