use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{send_with_retry, ChatModel, LlmError, ModelParams, Prompt};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct AnthropicModel {
    client: reqwest::Client,
    model: String,
    api_key: String,
    params: ModelParams,
}

impl AnthropicModel {
    pub fn new(model: &str, api_key: String, params: ModelParams) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.to_string(),
            api_key,
            params,
        }
    }

    fn body(&self, system: &str, prompt: &Prompt) -> Value {
        let mut content = vec![json!({ "type": "text", "text": prompt.text() })];
        for image in prompt.images() {
            content.push(json!({
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": image.media_type,
                    "data": image.data,
                },
            }));
        }

        let mut body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system,
            "messages": [{ "role": "user", "content": content }],
        });
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }
}

#[async_trait]
impl ChatModel for AnthropicModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &Prompt) -> Result<String, LlmError> {
        let body = self.body(system, prompt);
        let response = send_with_retry(
            || {
                self.client
                    .post(API_URL)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", API_VERSION)
                    .json(&body)
            },
            self.params.max_retries,
            &self.model,
        )
        .await?;

        response["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing content[0].text in Anthropic reply".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ImagePart;

    #[test]
    fn test_body_text_only() {
        let model = AnthropicModel::new(
            "claude-3-5-sonnet-20241022",
            "key".into(),
            ModelParams {
                temperature: Some(0.0),
                max_retries: 3,
            },
        );
        let body = model.body("sys", &Prompt::Text("What is a VPC?".into()));

        assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(body["system"], "sys");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["content"][0]["text"], "What is a VPC?");
    }

    #[test]
    fn test_body_preserves_image_order() {
        let model = AnthropicModel::new(
            "claude-3-opus-20240229",
            "key".into(),
            ModelParams {
                temperature: Some(0.0),
                max_retries: 3,
            },
        );
        let prompt = Prompt::Multimodal {
            text: "q".into(),
            images: vec![
                ImagePart {
                    media_type: "image/png".into(),
                    data: "first".into(),
                },
                ImagePart {
                    media_type: "image/jpeg".into(),
                    data: "second".into(),
                },
            ],
        };
        let content = &model.body("sys", &prompt)["messages"][0]["content"];

        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["source"]["data"], "first");
        assert_eq!(content[2]["source"]["data"], "second");
        assert_eq!(content[2]["source"]["media_type"], "image/jpeg");
    }
}
