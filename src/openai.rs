use crate::consts::{CHAT_MODEL, WHISPER_MODEL};
use crate::error::AppError;
use crate::openai_types::{
    OpenAIBatchResponse, OpenAIErrorResponse, OpenAIMessage, OpenAIPayload, WhisperResponse,
};
use crate::summarize::ChatCompletion;
use crate::transcription::SpeechToText;

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the two OpenAI backends the bot uses: whisper transcriptions
/// and chat completions.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(http_client: reqwest::Client, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Point at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Map a non-2xx OpenAI body to its inner error message when the body
    /// has the documented shape, otherwise keep the raw body.
    async fn error_message(resp: reqwest::Response) -> String {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<OpenAIErrorResponse>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => format!("OpenAI returned {status}: {body}"),
        }
    }
}

#[async_trait]
impl SpeechToText for OpenAiClient {
    async fn transcribe_file(&self, path: &Path) -> Result<String, AppError> {
        let bytes = fs::read(path).await.map_err(|e| {
            error!(path=%path.display(), error=%e, "failed to read audio file");
            AppError::Io(e)
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());
        let file_part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", WHISPER_MODEL)
            .text("response_format", "json");

        let url = format!("{}/audio/transcriptions", self.base_url);
        let resp = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error=%e, "failed to send transcription request");
                AppError::Transcription(e.to_string())
            })?;
        if !resp.status().is_success() {
            let message = Self::error_message(resp).await;
            error!(message=%message, "whisper rejected the audio payload");
            return Err(AppError::Transcription(message));
        }

        let whisper = resp.json::<WhisperResponse>().await.map_err(|e| {
            error!(error=%e, "failed to deserialize whisper response");
            AppError::Transcription(e.to_string())
        })?;
        debug!("got whisper transcript");
        Ok(whisper.text)
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, messages: Vec<OpenAIMessage>) -> Result<String, AppError> {
        let payload = OpenAIPayload {
            model: CHAT_MODEL.to_string(),
            messages,
            ..Default::default()
        };
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error=%e, "failed to send request to OpenAI");
                AppError::Completion(e.to_string())
            })?;
        if !resp.status().is_success() {
            let message = Self::error_message(resp).await;
            error!(message=%message, "chat completion request failed");
            return Err(AppError::Completion(message));
        }

        let resp = resp.json::<OpenAIBatchResponse>().await.map_err(|e| {
            error!(error=%e, "failed to deserialize openai completion response");
            AppError::Completion(e.to_string())
        })?;
        resp.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Completion("no choices in completion response".to_string()))
    }
}
