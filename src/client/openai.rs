//! OpenAI client for chat completions and image generation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::{ChatRequest, GenerativeApi, GeneratedImage, ImageRequest, check_status};
use crate::config::Config;
use crate::error::{ApiError, Result};

/// OpenAI API client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    /// Client used for chat completions
    text_http: HttpClient,
    /// Separate client so image generation can run with a longer timeout
    image_http: HttpClient,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ImageGenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

impl OpenAiClient {
    /// Create a client from runtime configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            text_http: build_http(config.timeouts.text())?,
            image_http: build_http(config.timeouts.image())?,
            base_url: config.openai_url.trim_end_matches('/').to_string(),
            api_key,
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }
}

fn build_http(timeout: Duration) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::Network(e.to_string()).into())
}

#[async_trait]
impl GenerativeApi for OpenAiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }

        #[derive(Deserialize)]
        struct ChatCompletionResponse {
            choices: Vec<Choice>,
        }

        let body = ChatCompletionBody {
            model: &self.text_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        log::debug!("Chat completion with model {}", self.text_model);

        let response = self
            .text_http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = check_status(response).await?;
        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse chat completion: {}", e))
        })?;

        // A missing message body is treated as an empty reply
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        #[derive(Deserialize)]
        struct ImageResponse {
            #[serde(default)]
            data: Vec<GeneratedImage>,
        }

        let body = ImageGenerationBody {
            model: &self.image_model,
            prompt: &request.prompt,
            size: &request.size,
            n: 1,
        };

        let url = format!("{}/images/generations", self.base_url);
        log::debug!("Image generation with model {}", self.image_model);

        let response = self
            .image_http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = check_status(response).await?;
        let images: ImageResponse = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse image response: {}", e))
        })?;

        Ok(images.data.into_iter().next().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mockito::Matcher;

    fn client(url: &str) -> OpenAiClient {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            openai_url: url.to_string(),
            ..Config::default()
        };
        OpenAiClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let result = OpenAiClient::from_config(&Config::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_chat_sends_messages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 100,
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "hi there"}}]}"#)
            .create_async()
            .await;

        let request = ChatRequest {
            system: "be brief".to_string(),
            user: "hello".to_string(),
            max_tokens: 100,
            temperature: None,
        };
        let text = client(&server.url()).chat(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "hi there");
    }

    #[tokio::test]
    async fn test_chat_null_content_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": null}}]}"#)
            .create_async()
            .await;

        let request = ChatRequest {
            system: String::new(),
            user: String::new(),
            max_tokens: 10,
            temperature: Some(0.4),
        };
        let text = client(&server.url()).chat(&request).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_chat_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .create_async()
            .await;

        let request = ChatRequest {
            system: String::new(),
            user: String::new(),
            max_tokens: 10,
            temperature: None,
        };
        let result = client(&server.url()).chat(&request).await;
        assert!(matches!(result, Err(Error::Api(ApiError::Unauthorized))));
    }

    #[tokio::test]
    async fn test_generate_image_returns_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/images/generations")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-image-1",
                "size": "1024x1024",
                "n": 1
            })))
            .with_status(200)
            .with_body(r#"{"created": 1, "data": [{"b64_json": "aGVsbG8="}]}"#)
            .create_async()
            .await;

        let request = ImageRequest {
            prompt: "a badge".to_string(),
            size: "1024x1024".to_string(),
        };
        let image = client(&server.url()).generate_image(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(image.b64_json.as_deref(), Some("aGVsbG8="));
        assert!(image.url.is_none());
    }

    #[tokio::test]
    async fn test_generate_image_empty_data() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/images/generations")
            .with_status(200)
            .with_body(r#"{"created": 1, "data": []}"#)
            .create_async()
            .await;

        let request = ImageRequest {
            prompt: "a badge".to_string(),
            size: "1024x1024".to_string(),
        };
        let image = client(&server.url()).generate_image(&request).await.unwrap();
        assert_eq!(image, GeneratedImage::default());
    }
}
