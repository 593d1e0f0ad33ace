use super::credentials::CredentialGate;
use super::error::{classify_api_error, GeminiError};
use super::types::{
    api_error_message, GenerateVideosRequest, Operation, VideoInstance, VideoParameters,
};
use crate::config::GeminiConfig;
use crate::media::{MediaRef, MediaStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Fixed rendering parameters for every generated video
const VIDEO_COUNT: u32 = 1;
const RESOLUTION: &str = "720p";
const ASPECT_RATIO: &str = "16:9";

/// Progress lines rotated through while the remote operation runs
const LOADING_MESSAGES: [&str; 5] = [
    "Initializing video generation...",
    "Animating the signs...",
    "Rendering the video sequence...",
    "Applying final touches...",
    "Almost ready, preparing the video stream...",
];

fn generation_prompt(text: &str) -> String {
    format!(
        "Generate a short, animated video of a person performing Indian Sign Language (ISL) \
         for the following phrase: \"{}\". The background should be a solid, neutral gray \
         color. The animation should be clear and easy for a deaf person to understand.",
        text
    )
}

/// Remote capability: sentence → locally dereferenceable video reference
#[async_trait::async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> Result<MediaRef, GeminiError>;
}

/// `VideoGenerator` backed by the Veo predictLongRunning endpoint
///
/// Generation is asynchronous server-side: the submit call returns an
/// operation handle that is re-fetched on a fixed backoff until it reports
/// completion. There is deliberately no polling timeout; the wait is bounded
/// only by the remote side.
pub struct GeminiGenerator {
    http: reqwest::Client,
    config: GeminiConfig,
    credentials: Arc<CredentialGate>,
    media: Arc<MediaStore>,
}

impl GeminiGenerator {
    pub fn new(
        http: reqwest::Client,
        config: GeminiConfig,
        credentials: Arc<CredentialGate>,
        media: Arc<MediaStore>,
    ) -> Self {
        Self {
            http,
            config,
            credentials,
            media,
        }
    }

    async fn submit(&self, prompt: String, key: &str) -> Result<Operation, GeminiError> {
        let request = GenerateVideosRequest {
            instances: vec![VideoInstance { prompt }],
            parameters: VideoParameters {
                number_of_videos: VIDEO_COUNT,
                resolution: RESOLUTION.to_string(),
                aspect_ratio: ASPECT_RATIO.to_string(),
            },
        };

        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.config.api_base, self.config.generation_model
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(api_error_message(status.as_u16(), &body)));
        }

        response
            .json::<Operation>()
            .await
            .map_err(|e| GeminiError::Api(format!("Failed to parse operation: {}", e)))
    }

    async fn fetch_operation(&self, name: &str, key: &str) -> Result<Operation, GeminiError> {
        let url = format!("{}/{}", self.config.api_base, name);

        let response = self
            .http
            .get(&url)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(api_error_message(status.as_u16(), &body)));
        }

        response
            .json::<Operation>()
            .await
            .map_err(|e| GeminiError::Api(format!("Failed to parse operation: {}", e)))
    }

    async fn download(&self, uri: &str, key: &str) -> Result<Vec<u8>, GeminiError> {
        // The credential must be appended to the locator to authenticate the
        // fetch
        let separator = if uri.contains('?') { '&' } else { '?' };
        let authenticated = format!("{}{}key={}", uri, separator, key);

        let response = self
            .http
            .get(&authenticated)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(format!(
                "Failed to fetch video file: ({}) {}",
                status.as_u16(),
                body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl VideoGenerator for GeminiGenerator {
    async fn generate(&self, text: &str) -> Result<MediaRef, GeminiError> {
        let key = self
            .credentials
            .key()
            .await
            .ok_or(GeminiError::MissingKey)?;

        let prompt = generation_prompt(text);
        info!("Generating video with prompt: {}", prompt);

        let mut operation = self.submit(prompt, &key).await?;

        let backoff = Duration::from_secs(self.config.poll_interval_secs);
        let mut polls = 0usize;

        while !operation.done {
            info!("{}", LOADING_MESSAGES[polls % LOADING_MESSAGES.len()]);
            tokio::time::sleep(backoff).await;
            operation = self.fetch_operation(&operation.name, &key).await?;
            polls += 1;
        }

        if let Some(error) = operation.error {
            return Err(classify_api_error(format!(
                "Video generation failed: {}",
                error.message
            )));
        }

        let uri = operation.download_uri().ok_or_else(|| {
            GeminiError::Api("Video generation completed, but no download link was found.".to_string())
        })?;

        let bytes = self.download(uri, &key).await?;

        let media_ref = self.media.insert(bytes, "video/mp4").await;
        info!("Stored generated video as {}", media_ref);

        Ok(media_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_phrase_verbatim() {
        let prompt = generation_prompt("Tell me about yourself");
        assert!(prompt.contains("\"Tell me about yourself\""));
        assert!(prompt.contains("Indian Sign Language"));
    }
}
