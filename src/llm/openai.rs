use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{send_with_retry, ChatModel, LlmError, ModelParams, Prompt};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiModel {
    client: reqwest::Client,
    model: String,
    api_key: String,
    params: ModelParams,
}

impl OpenAiModel {
    pub fn new(model: &str, api_key: String, params: ModelParams) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.to_string(),
            api_key,
            params,
        }
    }

    fn body(&self, system: &str, prompt: &Prompt) -> Value {
        let user_content = match prompt {
            Prompt::Text(text) => json!(text),
            Prompt::Multimodal { text, images } => {
                let mut parts = vec![json!({ "type": "text", "text": text })];
                for image in images {
                    parts.push(json!({
                        "type": "image_url",
                        "image_url": { "url": image.data_uri() },
                    }));
                }
                json!(parts)
            }
        };

        let mut body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user_content },
            ],
        });
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &Prompt) -> Result<String, LlmError> {
        let body = self.body(system, prompt);
        let response = send_with_retry(
            || self.client.post(API_URL).bearer_auth(&self.api_key).json(&body),
            self.params.max_retries,
            &self.model,
        )
        .await?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::MalformedResponse(
                    "missing choices[0].message.content in OpenAI reply".into(),
                )
            })
    }
}
