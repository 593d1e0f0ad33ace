use super::credentials::CredentialGate;
use super::error::GeminiError;
use super::types::{api_error_message, Content, GenerateContentRequest, Part};
use crate::capture::EncodedFrame;
use crate::config::GeminiConfig;
use base64::Engine;
use std::sync::Arc;
use tracing::info;

/// Fixed instruction packaged with every frame sequence
const TRANSCRIBE_INSTRUCTION: &str = "You are an expert Indian Sign Language (ISL) interpreter. \
    The context is a job interview. Analyze these sequential video frames and transcribe the \
    sign language into a single, coherent English sentence. Be concise and accurate.";

/// Remote capability: ordered frame sequence → one English sentence
#[async_trait::async_trait]
pub trait SignTranscriber: Send + Sync {
    async fn transcribe(&self, frames: &[EncodedFrame]) -> Result<String, GeminiError>;
}

/// `SignTranscriber` backed by the Gemini generateContent endpoint
pub struct GeminiTranscriber {
    http: reqwest::Client,
    config: GeminiConfig,
    credentials: Arc<CredentialGate>,
}

impl GeminiTranscriber {
    pub fn new(http: reqwest::Client, config: GeminiConfig, credentials: Arc<CredentialGate>) -> Self {
        Self {
            http,
            config,
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl SignTranscriber for GeminiTranscriber {
    async fn transcribe(&self, frames: &[EncodedFrame]) -> Result<String, GeminiError> {
        let key = self
            .credentials
            .key()
            .await
            .ok_or(GeminiError::MissingKey)?;

        let mut parts = Vec::with_capacity(frames.len() + 1);
        parts.push(Part::text(TRANSCRIBE_INSTRUCTION));
        for frame in frames {
            let data = base64::engine::general_purpose::STANDARD.encode(&frame.data);
            parts.push(Part::inline_data(frame.mime_type.clone(), data));
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.transcription_model
        );

        info!(
            "Transcribing {} frames with {}",
            frames.len(),
            self.config.transcription_model
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api(api_error_message(status.as_u16(), &body)));
        }

        let parsed = response
            .json::<super::types::GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::Api(format!("Failed to parse model response: {}", e)))?;

        let text = parsed
            .text()
            .ok_or_else(|| GeminiError::Api("Model returned no text".to_string()))?;

        info!("Transcription successful: {} chars", text.len());

        Ok(text)
    }
}
