use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{send_with_retry, ChatModel, LlmError, ModelParams, Prompt};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiModel {
    client: reqwest::Client,
    model: String,
    api_key: String,
    params: ModelParams,
}

impl GeminiModel {
    pub fn new(model: &str, api_key: String, params: ModelParams) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.to_string(),
            api_key,
            params,
        }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", API_BASE_URL, self.model)
    }

    fn body(&self, system: &str, prompt: &Prompt) -> Value {
        let mut parts = vec![json!({ "text": prompt.text() })];
        for image in prompt.images() {
            parts.push(json!({
                "inline_data": {
                    "mime_type": image.media_type,
                    "data": image.data,
                },
            }));
        }

        let mut generation_config = json!({ "response_mime_type": "application/json" });
        if let Some(temperature) = self.params.temperature {
            generation_config["temperature"] = json!(temperature);
        }

        json!({
            "system_instruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": generation_config,
        })
    }
}

#[async_trait]
impl ChatModel for GeminiModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &Prompt) -> Result<String, LlmError> {
        let body = self.body(system, prompt);
        let response = send_with_retry(
            || {
                self.client
                    .post(self.url())
                    .query(&[("key", &self.api_key)])
                    .json(&body)
            },
            self.params.max_retries,
            &self.model,
        )
        .await?;

        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::MalformedResponse(
                    "missing candidates[0].content.parts[0].text in Gemini reply".into(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ImagePart;

    #[test]
    fn test_url_embeds_model_id() {
        let model = GeminiModel::new(
            "gemini-1.5-flash",
            "key".into(),
            ModelParams {
                temperature: Some(0.0),
                max_retries: 3,
            },
        );
        assert_eq!(
            model.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_body_inline_data_and_json_mode() {
        let model = GeminiModel::new(
            "gemini-1.5-pro",
            "key".into(),
            ModelParams {
                temperature: Some(0.0),
                max_retries: 3,
            },
        );
        let prompt = Prompt::Multimodal {
            text: "q".into(),
            images: vec![ImagePart {
                media_type: "image/webp".into(),
                data: "ZGF0YQ==".into(),
            }],
        };
        let body = model.body("sys", &prompt);

        assert_eq!(body["system_instruction"]["parts"][0]["text"], "sys");
        assert_eq!(
            body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/webp"
        );
        assert_eq!(
            body["generationConfig"]["response_mime_type"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
    }
}
